//! Persisted project configuration
//!
//! Stores the project mode and the list of enabled targets in
//! `.viberules/.config.yaml`. The whole file is rewritten on every save.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::targets;

/// Config file location, relative to the project root
pub const CONFIG_FILE: &str = ".viberules/.config.yaml";

/// Larger config files are rejected before parsing
pub const MAX_CONFIG_SIZE: u64 = 1024 * 1024;

/// Whether the `.viberules` directory is tracked by git
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The whole `.viberules` directory is ignored (personal rules)
    #[default]
    Local,
    /// `.viberules/rules.md` is tracked (shared rules)
    Public,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Local => "local",
            Mode::Public => "public",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(Mode::Local),
            "public" => Ok(Mode::Public),
            other => Err(Error::InvalidMode {
                value: other.to_string(),
            }),
        }
    }
}

/// Project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub mode: Mode,
    pub targets: Vec<String>,
}

/// On-disk shape; `mode` stays a string so unknown values can be coerced.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    mode: String,
    #[serde(default)]
    targets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Local,
            targets: targets::target_names().map(String::from).collect(),
        }
    }
}

impl Config {
    /// Path of the config file under `project_root`
    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_FILE)
    }

    /// Load the configuration, falling back to defaults when no file exists.
    ///
    /// A `mode` other than `local` or `public` is read as `local`.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = Self::path(project_root);

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::io("stat config file", &path, e)),
        };

        if metadata.len() > MAX_CONFIG_SIZE {
            return Err(Error::ConfigTooLarge {
                size: metadata.len(),
                max: MAX_CONFIG_SIZE,
            });
        }

        let content =
            fs::read_to_string(&path).map_err(|e| Error::io("read config file", &path, e))?;

        Self::parse(&content).map_err(|source| Error::ConfigParse { path, source })
    }

    fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };

        let mode = raw.mode.parse::<Mode>().unwrap_or_else(|_| {
            if !raw.mode.is_empty() {
                tracing::warn!(mode = %raw.mode, "Unknown mode in config, using local");
            }
            Mode::Local
        });

        Ok(Self {
            mode,
            targets: raw.targets,
        })
    }

    /// Serialize and overwrite the config file
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let path = Self::path(project_root);
        let content = serde_yaml::to_string(self).map_err(Error::ConfigSerialize)?;

        fs::write(&path, content).map_err(|e| Error::io("write config file", &path, e))?;
        tracing::debug!(path = %path.display(), mode = %self.mode, "Saved config");

        Ok(())
    }
}

/// Enabled targets, in stored order
pub fn load_enabled_targets(project_root: &Path) -> Result<Vec<String>> {
    Ok(Config::load(project_root)?.targets)
}

/// Replace the enabled targets, keeping the stored mode
pub fn save_enabled_targets(project_root: &Path, targets: Vec<String>) -> Result<()> {
    let mut config = Config::load(project_root)?;
    config.targets = targets;
    config.save(project_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(".viberules")).unwrap();
        temp_dir
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("local".parse::<Mode>().unwrap(), Mode::Local);
        assert_eq!("public".parse::<Mode>().unwrap(), Mode::Public);
        assert_eq!(Mode::Public.to_string(), "public");

        let err = "Public".parse::<Mode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid mode: Public (must be 'public' or 'local')"
        );
    }

    #[test]
    fn test_load_without_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let config = Config::load(temp_dir.path()).unwrap();

        assert_eq!(config.mode, Mode::Local);
        assert_eq!(config.targets, vec!["claude", "amazonq", "gemini", "codex"]);
        assert!(!Config::path(temp_dir.path()).exists());
    }

    #[test]
    fn test_load_existing_file() {
        let temp_dir = project();
        fs::write(
            Config::path(temp_dir.path()),
            "mode: public\ntargets:\n  - claude\n  - gemini\n",
        )
        .unwrap();

        let config = Config::load(temp_dir.path()).unwrap();

        assert_eq!(config.mode, Mode::Public);
        assert_eq!(config.targets, vec!["claude", "gemini"]);
    }

    #[test]
    fn test_load_coerces_unknown_mode_to_local() {
        let temp_dir = project();
        fs::write(
            Config::path(temp_dir.path()),
            "mode: shared\ntargets: [codex]\n",
        )
        .unwrap();

        let config = Config::load(temp_dir.path()).unwrap();

        assert_eq!(config.mode, Mode::Local);
        assert_eq!(config.targets, vec!["codex"]);
    }

    #[test]
    fn test_load_missing_fields() {
        let temp_dir = project();

        fs::write(Config::path(temp_dir.path()), "targets: [claude]\n").unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.mode, Mode::Local);
        assert_eq!(config.targets, vec!["claude"]);

        fs::write(Config::path(temp_dir.path()), "").unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.mode, Mode::Local);
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_load_rejects_oversized_file() {
        let temp_dir = project();
        let mut content = String::from("mode: local\ntargets:\n");
        while (content.len() as u64) <= MAX_CONFIG_SIZE {
            content.push_str("  - claude\n");
        }
        fs::write(Config::path(temp_dir.path()), content).unwrap();

        let err = Config::load(temp_dir.path()).unwrap_err();

        assert!(matches!(err, Error::ConfigTooLarge { max: MAX_CONFIG_SIZE, .. }));
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let temp_dir = project();
        fs::write(Config::path(temp_dir.path()), "mode: [unclosed\n").unwrap();

        let err = Config::load(temp_dir.path()).unwrap_err();

        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp_dir = project();
        let config = Config {
            mode: Mode::Public,
            targets: vec!["gemini".into(), "claude".into()],
        };

        config.save(temp_dir.path()).unwrap();

        let content = fs::read_to_string(Config::path(temp_dir.path())).unwrap();
        assert!(content.contains("mode: public"));
        assert_eq!(Config::load(temp_dir.path()).unwrap(), config);
    }

    #[test]
    fn test_save_failure_is_io_error() {
        let temp_dir = project();
        // A directory where the file should be makes the write fail
        fs::create_dir_all(Config::path(temp_dir.path())).unwrap();

        let err = Config::default().save(temp_dir.path()).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains(".config.yaml"));
    }

    #[test]
    fn test_save_enabled_targets_preserves_mode() {
        let temp_dir = project();
        Config {
            mode: Mode::Public,
            targets: vec![],
        }
        .save(temp_dir.path())
        .unwrap();

        save_enabled_targets(temp_dir.path(), vec!["claude".into(), "gemini".into()]).unwrap();

        let content = fs::read_to_string(Config::path(temp_dir.path())).unwrap();
        assert!(content.contains("claude"));
        assert!(content.contains("gemini"));
        assert!(!content.contains("amazonq"));

        assert_eq!(
            load_enabled_targets(temp_dir.path()).unwrap(),
            vec!["claude", "gemini"]
        );
        assert_eq!(Config::load(temp_dir.path()).unwrap().mode, Mode::Public);
    }
}
