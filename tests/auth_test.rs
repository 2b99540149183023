use plexsync::{SyncError, management::refreshed_token, types::Token};
use serde_json::json;

fn cached() -> Token {
    Token {
        access_token: "old-access".to_string(),
        refresh_token: "old-refresh".to_string(),
        scope: "playlist-read-private".to_string(),
        expires_in: 3600,
        obtained_at: 1_700_000_000,
    }
}

#[test]
fn test_refresh_keeps_unrotated_fields() {
    let response = json!({ "access_token": "new-access", "expires_in": 1800 });

    let token = refreshed_token(&cached(), &response, 1_700_003_000).unwrap();

    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.refresh_token, "old-refresh");
    assert_eq!(token.scope, "playlist-read-private");
    assert_eq!(token.expires_in, 1800);
    assert_eq!(token.obtained_at, 1_700_003_000);
}

#[test]
fn test_refresh_takes_rotated_refresh_token() {
    let response = json!({
        "access_token": "new-access",
        "refresh_token": "new-refresh",
        "scope": "playlist-read-private user-library-read"
    });

    let token = refreshed_token(&cached(), &response, 1_700_003_000).unwrap();

    assert_eq!(token.refresh_token, "new-refresh");
    assert_eq!(token.scope, "playlist-read-private user-library-read");
    assert_eq!(token.expires_in, 3600);
}

#[test]
fn test_refresh_without_access_token_is_an_error() {
    let missing = json!({ "token_type": "Bearer", "expires_in": 3600 });
    let empty = json!({ "access_token": "", "expires_in": 3600 });

    assert!(matches!(
        refreshed_token(&cached(), &missing, 1_700_003_000),
        Err(SyncError::Source(_))
    ));
    assert!(matches!(
        refreshed_token(&cached(), &empty, 1_700_003_000),
        Err(SyncError::Source(_))
    ));
}
