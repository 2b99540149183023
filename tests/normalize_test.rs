use plexsync::matching::normalize::*;

#[test]
fn test_normalize_title_drops_periods() {
    assert_eq!(normalize_title("T.N.T"), "tnt");
    assert_eq!(normalize_title("Mr. Brightside"), "mr brightside");
}

#[test]
fn test_normalize_title_replaces_symbols_and_collapses_whitespace() {
    assert_eq!(normalize_title("  Hello,   World!  "), "hello world");
    assert_eq!(normalize_title("AC/DC"), "ac dc");
    // hyphens survive
    assert_eq!(normalize_title("Rock-n-Roll"), "rock-n-roll");
}

#[test]
fn test_normalize_title_is_idempotent() {
    let inputs = [
        "T.N.T",
        "Don't Stop Me Now",
        "Song (feat. Someone) - Radio Edit",
        "  Beyoncé  &  JAY-Z ",
        "AC/DC",
        "",
    ];

    for input in inputs {
        let once = normalize_title(input);
        assert_eq!(normalize_title(&once), once, "input: {:?}", input);
    }
}

#[test]
fn test_normalize_optional_absent_is_empty() {
    assert_eq!(normalize_optional(None), "");
    assert_eq!(normalize_optional(Some("T.N.T")), "tnt");
}

#[test]
fn test_normalize_featuring() {
    assert_eq!(normalize_featuring("Song (feat. Someone)"), "Song feat Someone)");
    assert_eq!(normalize_featuring("Song ft. Someone"), "Song feat Someone");
    assert_eq!(normalize_featuring("Song FEATURING Someone"), "Song feat Someone");
    assert_eq!(normalize_featuring("Song Feat Someone"), "Song feat Someone");

    // only whole words are rewritten
    assert_eq!(normalize_featuring("Left Behind"), "Left Behind");
    assert_eq!(normalize_featuring("Gift of Love"), "Gift of Love");
}

#[test]
fn test_normalize_remix_title_keeps_mix_qualifier() {
    assert_eq!(normalize_remix_title("Song - Club Mix"), "song club mix");
    assert_eq!(normalize_remix_title("Song - Remix"), "song remix");
}

#[test]
fn test_normalize_remix_title_drops_release_qualifier() {
    assert_eq!(normalize_remix_title("Song - Radio Edit"), "song edit");
    assert_eq!(normalize_remix_title("Song - Album Version"), "song version");
    assert_eq!(normalize_remix_title("Song - Single Version"), "song version");
    assert_eq!(normalize_remix_title("Song - Edit"), "song edit");
    assert_eq!(normalize_remix_title("Song Edit"), "song edit");
}

#[test]
fn test_normalize_remix_title_keeps_recording_qualifier() {
    assert_eq!(
        normalize_remix_title("Creep - Acoustic Version"),
        "creep acoustic version"
    );
    assert_eq!(normalize_remix_title("Creep - Live Version"), "creep live version");
    assert_ne!(
        normalize_remix_title("Song - Acoustic Version"),
        normalize_remix_title("Song - Live Version")
    );
    assert_eq!(normalize_remix_title("Song - Tiësto Edit"), "song tiësto edit");
    assert_ne!(
        normalize_remix_title("Song - Tiësto Edit"),
        normalize_remix_title("Song - Radio Edit")
    );
}

#[test]
fn test_normalize_remix_title_strips_parentheses() {
    assert_eq!(normalize_remix_title("Song (Remix)"), "song remix");
    assert_eq!(normalize_remix_title("Plain Song"), "plain song");
}

#[test]
fn test_is_live_version() {
    assert!(is_live_version("Song (Live)"));
    assert!(is_live_version("Song (Live at Wembley)"));
    assert!(is_live_version("Song - Live in Paris"));
    assert!(is_live_version("Song (Recorded Live 1999)"));

    assert!(!is_live_version("Alive"));
    assert!(!is_live_version("Live Forever"));
    assert!(!is_live_version("Song"));
}

#[test]
fn test_query_derivations() {
    assert_eq!(letters_only("T.N.T."), "TNT");
    assert_eq!(letters_only("Back in Black"), "BackinBlack");

    assert_eq!(first_word("  Hello World"), "Hello");
    assert_eq!(first_word(""), "");

    assert_eq!(strip_symbols("Don't Stop!"), "Dont Stop");

    assert_eq!(truncate_at_delimiter("Song - Radio Edit"), "Song");
    assert_eq!(truncate_at_delimiter("Song (Live)"), "Song");
    assert_eq!(truncate_at_delimiter("Song–Mix"), "Song");
    assert_eq!(truncate_at_delimiter("Rock-n-Roll"), "Rock-n-Roll");
    assert_eq!(truncate_at_delimiter("Plain"), "Plain");
}

#[test]
fn test_title_forms() {
    let forms = TitleForms::new("Song (feat. X) - Radio Edit");

    assert_eq!(forms.raw, "Song (feat. X) - Radio Edit");
    assert_eq!(forms.plain, "song feat x - radio edit");
    assert_eq!(forms.remix, "song feat x edit");
}
