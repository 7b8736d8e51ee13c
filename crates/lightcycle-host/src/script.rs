use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Problems reading an input script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("script line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Key presses scheduled by tick.
///
/// One `<tick> <key> [<key>...]` entry per line, ticks counted from 1. Blank
/// lines and anything after `#` are ignored. Keys use the names understood
/// by [`map_key`](crate::input::map_key).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    presses: BTreeMap<u64, Vec<String>>,
}

impl InputScript {
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut presses: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }

            let mut words = content.split_whitespace();
            let tick_word = words.next().unwrap_or_default();
            let tick: u64 = tick_word.parse().map_err(|_| ScriptError::Parse {
                line,
                message: format!("\"{tick_word}\" is not a tick number"),
            })?;
            if tick == 0 {
                return Err(ScriptError::Parse {
                    line,
                    message: "ticks start at 1".to_string(),
                });
            }

            let keys: Vec<String> = words.map(str::to_string).collect();
            if keys.is_empty() {
                return Err(ScriptError::Parse {
                    line,
                    message: format!("no keys given for tick {tick}"),
                });
            }
            presses.entry(tick).or_default().extend(keys);
        }
        Ok(Self { presses })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Keys pressed just before `tick` is simulated.
    pub fn keys_at(&self, tick: u64) -> impl Iterator<Item = &str> {
        self.presses
            .get(&tick)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Last tick with scheduled input, if any.
    pub fn last_tick(&self) -> Option<u64> {
        self.presses.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }
}
