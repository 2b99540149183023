use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use plexsync::{cli, config, error, logging};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print candidate comparisons and search details
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List Spotify playlists that can be synced
    Playlists(PlaylistsOptions),

    /// Sync Spotify playlists into Plex
    Sync(SyncArgs),

    /// Resolve a single track against the Plex library
    Resolve(ResolveOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Only show playlists whose name contains this text
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncArgs {
    /// Sync every playlist of the Spotify account
    #[clap(long, conflicts_with = "playlist")]
    pub all: bool,

    /// Name of a playlist to sync; can be repeated
    #[clap(long, action = ArgAction::Append, required_unless_present = "all")]
    pub playlist: Vec<String>,

    /// Report progress with the historical per-playlist formula
    #[clap(long)]
    pub legacy_progress: bool,

    /// Continue with the next playlist when one cannot be written to Plex
    #[clap(long)]
    pub keep_going: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ResolveOptions {
    /// Track title as shown on Spotify
    #[clap(long)]
    pub title: String,

    /// Artist name; can be repeated
    #[clap(long, action = ArgAction::Append, required = true)]
    pub artist: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    logging::set_verbose(cli.verbose);

    match cli.command {
        Command::Playlists(opt) => cli::playlists(opt.search).await,
        Command::Sync(opt) => {
            cli::sync(cli::SyncOptions {
                all: opt.all,
                playlists: opt.playlist,
                legacy_progress: opt.legacy_progress,
                keep_going: opt.keep_going,
            })
            .await
        }
        Command::Resolve(opt) => cli::resolve(opt.title, opt.artist).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
