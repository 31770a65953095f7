use std::io::Write;

use gb_core::GamebookError;

use crate::{
    dispatch_event, map_cli_io, AgentArgs, AgentCommand, DispatchOutcome, InboundEvent,
    PlayerArgs, PlayerConfig, StdoutClient,
};

pub(super) fn run_agent<W: Write>(args: AgentArgs, out: &mut W) -> Result<i32, GamebookError> {
    let (user, player, event) = match args.command {
        AgentCommand::Follow(args) => (args.user, args.player, InboundEvent::Follow),
        AgentCommand::Message(args) => (
            args.user,
            args.player,
            InboundEvent::Message { text: args.text },
        ),
        AgentCommand::Postback(args) => (
            args.user,
            args.player,
            InboundEvent::Postback { data: args.data },
        ),
    };
    run_event(&player, &user, &event, out)
}

fn run_event<W: Write>(
    player: &PlayerArgs,
    user: &str,
    event: &InboundEvent,
    out: &mut W,
) -> Result<i32, GamebookError> {
    let config = PlayerConfig::from_args(player);
    let mut client = StdoutClient::with_writer(Vec::new());
    let outcome = dispatch_event(&config, &mut client, user, event)?;
    emit_outcome(out, outcome, &client.into_inner())
}

fn emit_outcome<W: Write>(
    out: &mut W,
    outcome: DispatchOutcome,
    pushed: &[u8],
) -> Result<i32, GamebookError> {
    writeln!(out, "RESULT:OK").map_err(map_cli_io)?;
    match outcome {
        DispatchOutcome::Delivered { tappable, .. } => {
            writeln!(out, "EVENT:DELIVERED").map_err(map_cli_io)?;
            out.write_all(pushed).map_err(map_cli_io)?;
            for label in tappable {
                writeln!(out, "TAPPABLE:{}", label).map_err(map_cli_io)?;
            }
        }
        DispatchOutcome::Ignored { reason } => {
            writeln!(out, "EVENT:IGNORED").map_err(map_cli_io)?;
            writeln!(out, "REASON:{}", reason).map_err(map_cli_io)?;
        }
    }
    Ok(0)
}
