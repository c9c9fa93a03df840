use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

use crate::log;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// The one value that outlives a game. Read once at engine construction,
/// written whenever a new high score is reached. Failures are best-effort:
/// logged, never fatal.
pub trait HighScoreStore: Send {
    fn load(&self) -> u32;
    fn save(&mut self, value: u32);
}

pub struct FileHighScoreStore {
    file_path: String,
}

impl FileHighScoreStore {
    pub fn new(file_path: String) -> Self {
        Self { file_path }
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        let content = match std::fs::read_to_string(self.file_path.as_str()) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return 0,
            Err(err) => {
                log!("Failed to read high score file {}: {}", self.file_path, err);
                return 0;
            }
        };

        match serde_yaml_ng::from_str::<HighScoreRecord>(&content) {
            Ok(record) => record.high_score,
            Err(err) => {
                log!("Ignoring malformed high score file {}: {}", self.file_path, err);
                0
            }
        }
    }

    fn save(&mut self, value: u32) {
        let record = HighScoreRecord { high_score: value };
        let content = match serde_yaml_ng::to_string(&record) {
            Ok(content) => content,
            Err(err) => {
                log!("Failed to serialize high score: {}", err);
                return;
            }
        };

        if let Some(parent) = Path::new(self.file_path.as_str()).parent()
            && !parent.as_os_str().is_empty()
            && let Err(err) = std::fs::create_dir_all(parent)
        {
            log!("Failed to create high score directory {}: {}", parent.display(), err);
            return;
        }

        if let Err(err) = std::fs::write(self.file_path.as_str(), content) {
            log!("Failed to write high score file {}: {}", self.file_path, err);
        }
    }
}

/// Store for tests and benches; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryHighScoreStore {
    value: u32,
}

impl InMemoryHighScoreStore {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl HighScoreStore for InMemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.value
    }

    fn save(&mut self, value: u32) {
        self.value = value;
    }
}
