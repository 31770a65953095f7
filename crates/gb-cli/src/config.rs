use std::path::PathBuf;

use gb_api::{ParseOptions, Strictness};
use tracing::{debug, warn};

use crate::{ParseArgs, PlayerArgs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub script_path: PathBuf,
    pub state_dir: PathBuf,
    pub start_label: String,
    pub start_keyword: String,
    pub parse_options: ParseOptions,
}

impl PlayerConfig {
    pub(crate) fn from_args(args: &PlayerArgs) -> Self {
        Self {
            script_path: PathBuf::from(&args.script),
            state_dir: PathBuf::from(&args.state_dir),
            start_label: args.start_label.clone(),
            start_keyword: args.start_keyword.clone(),
            parse_options: args.parse.to_options(),
        }
    }
}

impl ParseArgs {
    pub(crate) fn to_options(&self) -> ParseOptions {
        ParseOptions {
            max_branches: self.max_branches,
            strictness: if self.strict {
                Strictness::Strict
            } else {
                Strictness::Lenient
            },
            ..ParseOptions::default()
        }
    }
}

pub fn load_env_file() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(error) if error.not_found() => {}
        Err(error) => warn!(%error, "failed to load environment file"),
    }
}
