use std::path::PathBuf;

use lightcycle_core::{ConfigError, CoreError};

use crate::script::ScriptError;

/// Everything that can stop the host before or after a match.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to set up match: {0}")]
    Core(#[from] CoreError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode match summary: {0}")]
    Json(#[from] serde_json::Error),
}
