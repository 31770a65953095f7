use std::ffi::OsString;
use std::io::{self, Write};

use clap::Parser;
use gb_core::GamebookError;
use tracing_subscriber::EnvFilter;

mod agent;
mod cli_args;
mod config;
mod delivery;
mod error_map;
mod messaging;
mod models;
mod resolve_cmd;
mod session;
mod state_store;

pub(crate) use cli_args::{
    AgentArgs, AgentCommand, Cli, Mode, ParseArgs, PlayerArgs, ResolveArgs,
};
pub use config::{load_env_file, PlayerConfig};
pub use delivery::{parse_duration, plan_delivery, typing_delay};
pub(crate) use error_map::{
    emit_error, map_cli_encode, map_cli_io, map_cli_state_invalid, map_cli_state_read,
    map_cli_state_write,
};
pub use messaging::{MessagingClient, StdoutClient};
pub use models::{
    DispatchOutcome, InboundEvent, OutboundMessage, PostbackAction, ScheduledMessage, UserState,
    USER_STATE_SCHEMA,
};
pub use session::dispatch_event;
pub(crate) use state_store::{load_user_state, save_user_state};

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .try_init();
}

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    run_cli_with_writer(args, &mut io::stdout())
}

pub fn run_cli_with_writer<I, T, W>(args: I, out: &mut W) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli, out) {
        Ok(code) => code,
        Err(error) => emit_error(out, error),
    }
}

fn run<W: Write>(cli: Cli, out: &mut W) -> Result<i32, GamebookError> {
    match cli.command {
        Mode::Resolve(args) => resolve_cmd::run_resolve(args, out),
        Mode::Agent(args) => agent::run_agent(args, out),
    }
}
