use gb_core::GamebookError;
use std::fmt::Display;
use std::io::Write;

fn map_error(code: &'static str, error: impl Display) -> GamebookError {
    GamebookError::new(code, error.to_string())
}

pub(crate) fn emit_error(out: &mut impl Write, error: GamebookError) -> i32 {
    let message_json =
        serde_json::to_string(&error.message).unwrap_or_else(|_| "\"\"".to_string());
    // Nothing left to report to if the output itself is gone.
    let _ = writeln!(out, "RESULT:ERROR");
    let _ = writeln!(out, "ERROR_CODE:{}", error.code);
    let _ = writeln!(out, "ERROR_MSG_JSON:{}", message_json);
    1
}

pub(crate) fn map_cli_io(error: std::io::Error) -> GamebookError {
    map_error("CLI_IO", error)
}

pub(crate) fn map_cli_encode(error: serde_json::Error) -> GamebookError {
    map_error("CLI_ENCODE", error)
}

pub(crate) fn map_cli_state_write(error: std::io::Error) -> GamebookError {
    map_error("CLI_STATE_WRITE", error)
}

pub(crate) fn map_cli_state_read(error: std::io::Error) -> GamebookError {
    map_error("CLI_STATE_READ", error)
}

pub(crate) fn map_cli_state_invalid(error: serde_json::Error) -> GamebookError {
    map_error("CLI_STATE_INVALID", error)
}
