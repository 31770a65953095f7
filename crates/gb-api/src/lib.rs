use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use gb_core::{GamebookError, Statement};
use gb_script::Parser;
use tracing::debug;

pub use gb_script::{ParseOptions, Strictness};

pub fn resolve(source: &str, label: &str) -> Result<Vec<Statement>, GamebookError> {
    resolve_with_options(source, label, ParseOptions::default())
}

pub fn resolve_with_options(
    source: &str,
    label: &str,
    options: ParseOptions,
) -> Result<Vec<Statement>, GamebookError> {
    let statements = Parser::new(source, options).resolve(label)?;
    debug!(label, statements = statements.len(), "resolved label");
    Ok(statements)
}

pub fn resolve_reference(
    source: &str,
    target: &str,
    options: ParseOptions,
) -> Result<Vec<Statement>, GamebookError> {
    let statements = Parser::new(source, options).resolve_reference(target)?;
    debug!(target_label = target, statements = statements.len(), "resolved reference");
    Ok(statements)
}

pub fn load_script_file(path: &Path) -> Result<String, GamebookError> {
    fs::read_to_string(path).map_err(|error| {
        let code = if error.kind() == ErrorKind::NotFound {
            "SOURCE_NOT_FOUND"
        } else {
            "SOURCE_READ"
        };
        GamebookError::new(
            code,
            format!("Failed to read script {}: {}", path.display(), error),
        )
    })
}

pub fn resolve_file(
    path: &Path,
    label: &str,
    options: ParseOptions,
) -> Result<Vec<Statement>, GamebookError> {
    let source = load_script_file(path)?;
    resolve_with_options(&source, label, options)
}
