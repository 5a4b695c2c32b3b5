use std::path::{Path, PathBuf};

const DATA_DIR: &str = ".quicknotes";
const DATA_FILE: &str = "data.json";
const LOG_FILE: &str = "quicknotes.log";

/// Where QuickNotes keeps its files.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub data_file: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    /// `~/.quicknotes`, or `./.quicknotes` when no home directory can be resolved
    pub fn from_home() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::in_dir(home.join(DATA_DIR))
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let data_dir = dir.as_ref().to_path_buf();
        Config {
            data_file: data_dir.join(DATA_FILE),
            log_file: data_dir.join(LOG_FILE),
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_share_the_data_dir() {
        let config = Config::in_dir("/tmp/qn");
        assert_eq!(config.data_file, PathBuf::from("/tmp/qn/data.json"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/qn/quicknotes.log"));
    }

    #[test]
    fn home_layout_ends_in_quicknotes() {
        let config = Config::from_home();
        assert!(config.data_dir.ends_with(".quicknotes"));
    }
}
