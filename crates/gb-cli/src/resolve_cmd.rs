use std::io::Write;
use std::path::Path;

use gb_api::{load_script_file, resolve_file, resolve_reference};
use gb_core::GamebookError;

use crate::{map_cli_encode, map_cli_io, ResolveArgs};

pub(super) fn run_resolve<W: Write>(args: ResolveArgs, out: &mut W) -> Result<i32, GamebookError> {
    let options = args.parse.to_options();
    let script = Path::new(&args.script);
    let statements = if args.reference {
        resolve_reference(&load_script_file(script)?, &args.label, options)?
    } else {
        resolve_file(script, &args.label, options)?
    };

    writeln!(out, "RESULT:OK").map_err(map_cli_io)?;
    writeln!(out, "EVENT:RESOLVED").map_err(map_cli_io)?;
    for statement in &statements {
        let json = serde_json::to_string(statement).map_err(map_cli_encode)?;
        writeln!(out, "STATEMENT_JSON:{}", json).map_err(map_cli_io)?;
    }
    Ok(0)
}
