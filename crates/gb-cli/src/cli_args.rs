use clap::{Args, Parser, Subcommand};
use gb_core::MAX_BRANCHES;

#[derive(Debug, Parser)]
#[command(name = "gamebook")]
#[command(about = "Gamebook script player CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Resolve(ResolveArgs),
    Agent(AgentArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ResolveArgs {
    #[arg(long = "script", env = "GAMEBOOK_SCRIPT")]
    pub(crate) script: String,
    #[arg(long = "label")]
    pub(crate) label: String,
    #[arg(long = "reference")]
    pub(crate) reference: bool,
    #[command(flatten)]
    pub(crate) parse: ParseArgs,
}

#[derive(Debug, Args)]
pub(crate) struct ParseArgs {
    #[arg(long = "strict")]
    pub(crate) strict: bool,
    #[arg(long = "max-branches", default_value_t = MAX_BRANCHES)]
    pub(crate) max_branches: usize,
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Follow(FollowArgs),
    Message(MessageArgs),
    Postback(PostbackArgs),
}

#[derive(Debug, Args)]
pub(crate) struct FollowArgs {
    #[arg(long = "user")]
    pub(crate) user: String,
    #[command(flatten)]
    pub(crate) player: PlayerArgs,
}

#[derive(Debug, Args)]
pub(crate) struct MessageArgs {
    #[arg(long = "user")]
    pub(crate) user: String,
    #[arg(long = "text")]
    pub(crate) text: String,
    #[command(flatten)]
    pub(crate) player: PlayerArgs,
}

#[derive(Debug, Args)]
pub(crate) struct PostbackArgs {
    #[arg(long = "user")]
    pub(crate) user: String,
    #[arg(long = "data")]
    pub(crate) data: String,
    #[command(flatten)]
    pub(crate) player: PlayerArgs,
}

#[derive(Debug, Args)]
pub(crate) struct PlayerArgs {
    #[arg(long = "script", env = "GAMEBOOK_SCRIPT")]
    pub(crate) script: String,
    #[arg(long = "state-dir", env = "GAMEBOOK_STATE_DIR", default_value = ".gamebook")]
    pub(crate) state_dir: String,
    #[arg(long = "start-label", env = "GAMEBOOK_START_LABEL", default_value = "*start")]
    pub(crate) start_label: String,
    #[arg(long = "start-keyword", env = "GAMEBOOK_START_KEYWORD", default_value = "start")]
    pub(crate) start_keyword: String,
    #[command(flatten)]
    pub(crate) parse: ParseArgs,
}
