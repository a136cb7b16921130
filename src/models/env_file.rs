use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ConfigError;

/// Key-value store backed by a `.env` file.
///
/// Parsing is delegated to `dotenv`; writes touch only the line of the key being
/// set, so comments and unrelated keys survive.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl EnvFile {
    /// Loads the file at `path`. A missing file is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(path = %path.display(), "env file not found, starting empty");
            return Ok(Self { path, entries: Vec::new() });
        }

        let read_err = |source| ConfigError::Read { path: path.clone(), source };
        #[allow(deprecated)]
        let entries = dotenv::from_path_iter(&path)
            .map_err(read_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last value assigned to `key` in the file.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value seen by the running process: the environment wins over the file,
    /// the same precedence `dotenv().ok()` gives.
    pub fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .or_else(|| self.get(key).map(str::to_string))
    }

    /// Persists `key=value`, replacing an existing assignment or appending one.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let original = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(ConfigError::Write { path: self.path.clone(), source });
            }
        };

        let assignment = format!("{key}={value}");
        let mut replaced = false;
        let mut lines: Vec<String> = Vec::new();
        for line in original.lines() {
            if !replaced && assigns(line, key) {
                lines.push(assignment.clone());
                replaced = true;
            } else {
                lines.push(line.to_string());
            }
        }
        if !replaced {
            lines.push(assignment);
        }

        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content)
            .map_err(|source| ConfigError::Write { path: self.path.clone(), source })?;

        self.entries.retain(|(k, _)| k != key);
        self.entries.push((key.to_string(), value.to_string()));
        info!(path = %self.path.display(), key, "env file updated");
        Ok(())
    }
}

fn assigns(line: &str, key: &str) -> bool {
    let line = line.trim_start();
    let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_is_empty() {
        let temp = assert_fs::TempDir::new().unwrap();
        let env = EnvFile::load(temp.path().join(".env")).unwrap();
        assert_eq!(env.get("TELEGRAM_BOT_TOKEN"), None);
    }

    #[test]
    fn reads_quoted_and_plain_values() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child(".env");
        file.write_str("# bot\nTELEGRAM_BOT_TOKEN=123:abc\nTARGET_URL=\"https://example.com/a b\"\n")
            .unwrap();

        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.get("TELEGRAM_BOT_TOKEN"), Some("123:abc"));
        assert_eq!(env.get("TARGET_URL"), Some("https://example.com/a b"));
    }

    #[test]
    fn set_appends_and_keeps_other_lines() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child(".env");
        file.write_str("# bot settings\nTELEGRAM_BOT_TOKEN=123:abc\nTARGET_URL=https://example.com").unwrap();

        let mut env = EnvFile::load(file.path()).unwrap();
        env.set("TELEGRAM_CHAT_ID", "4242").unwrap();

        assert_eq!(env.get("TELEGRAM_CHAT_ID"), Some("4242"));
        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            written,
            "# bot settings\nTELEGRAM_BOT_TOKEN=123:abc\nTARGET_URL=https://example.com\nTELEGRAM_CHAT_ID=4242\n"
        );

        let reloaded = EnvFile::load(file.path()).unwrap();
        assert_eq!(reloaded.get("TELEGRAM_CHAT_ID"), Some("4242"));
    }

    #[test]
    fn set_replaces_existing_assignment() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child(".env");
        file.write_str("TELEGRAM_CHAT_ID=\nTELEGRAM_CHAT_ID_OLD=1\nTARGET_URL=https://example.com\n")
            .unwrap();

        let mut env = EnvFile::load(file.path()).unwrap();
        env.set("TELEGRAM_CHAT_ID", "-100500").unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            written,
            "TELEGRAM_CHAT_ID=-100500\nTELEGRAM_CHAT_ID_OLD=1\nTARGET_URL=https://example.com\n"
        );
    }

    #[test]
    fn set_creates_missing_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child(".env");

        let mut env = EnvFile::load(file.path()).unwrap();
        env.set("TELEGRAM_CHAT_ID", "7").unwrap();

        file.assert("TELEGRAM_CHAT_ID=7\n");
    }

    #[test]
    fn assigns_matches_whole_key_only() {
        assert!(assigns("TELEGRAM_CHAT_ID=1", "TELEGRAM_CHAT_ID"));
        assert!(assigns("  export TELEGRAM_CHAT_ID = 1", "TELEGRAM_CHAT_ID"));
        assert!(!assigns("TELEGRAM_CHAT_ID_OLD=1", "TELEGRAM_CHAT_ID"));
        assert!(!assigns("# TELEGRAM_CHAT_ID=1", "TELEGRAM_CHAT_ID"));
    }
}
