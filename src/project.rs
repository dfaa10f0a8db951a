//! Project-level operations
//!
//! Each operation loads the config, validates its input, changes the
//! filesystem through the [`Linker`] and the gitignore rewriter, and saves
//! the config last. There is no rollback: every step is idempotent, so
//! re-running a failed command is the recovery path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{self, Config, Mode};
use crate::error::{Error, Result};
use crate::gitignore;
use crate::linker::{LinkCheck, Linker};
use crate::targets::{self, RULES_FILE, Target, VIBERULES_DIR};

/// What `initialize` did with the rules file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFileState {
    Created,
    Preserved,
}

/// Outcome of `initialize`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    pub rules_file: RulesFileState,
    pub reinitialized: bool,
    pub mode: Mode,
}

/// Outcome of enabling or disabling a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetChange {
    Added,
    AlreadyEnabled,
    Removed,
    NotEnabled,
}

/// A viberules project rooted at a directory
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    linker: Linker,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let linker = Linker::new(root.clone());
        Self { root, linker }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn linker(&self) -> &Linker {
        &self.linker
    }

    pub fn rules_path(&self) -> PathBuf {
        self.root.join(RULES_FILE)
    }

    pub fn gitignore_path(&self) -> PathBuf {
        self.root.join(".gitignore")
    }

    /// A project is initialized once its rules file exists
    pub fn is_initialized(&self) -> bool {
        self.rules_path().exists()
    }

    /// Create `.viberules/`, the rules file, the ignore section and every
    /// symlink, then enable all targets.
    ///
    /// An existing `.viberules/` is refused unless `force` is set. A forced
    /// run keeps an existing rules file and the stored mode.
    pub fn initialize(&self, force: bool, rules_template: &str) -> Result<InitReport> {
        let viberules_dir = self.root.join(VIBERULES_DIR);
        let reinitialized = viberules_dir.is_dir();

        if reinitialized && !force {
            return Err(Error::AlreadyInitialized {
                path: PathBuf::from(VIBERULES_DIR),
            });
        }

        fs::create_dir_all(&viberules_dir)
            .map_err(|e| Error::io("create directory", Path::new(VIBERULES_DIR), e))?;

        let rules_file = if self.rules_path().exists() {
            RulesFileState::Preserved
        } else {
            fs::write(self.rules_path(), rules_template)
                .map_err(|e| Error::io("create", Path::new(RULES_FILE), e))?;
            tracing::debug!(path = RULES_FILE, "Created rules file");
            RulesFileState::Created
        };

        let mode = match Config::load(&self.root) {
            Ok(config) => config.mode,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read existing config, using local mode");
                Mode::Local
            }
        };

        gitignore::update_managed_section(&self.gitignore_path(), mode)?;
        self.linker.create_all_symlinks()?;

        Config {
            mode,
            targets: targets::target_names().map(String::from).collect(),
        }
        .save(&self.root)?;

        Ok(InitReport {
            rules_file,
            reinitialized,
            mode,
        })
    }

    /// Enable a target and create its symlinks.
    ///
    /// Links of an already enabled target are recreated, which repairs
    /// missing or broken ones.
    pub fn add_target(&self, name: &str) -> Result<TargetChange> {
        validate_target(name)?;
        self.require_initialized()?;

        let mut enabled = config::load_enabled_targets(&self.root)?;
        self.linker.create_target_symlinks(name)?;

        if enabled.iter().any(|t| t == name) {
            return Ok(TargetChange::AlreadyEnabled);
        }

        enabled.push(name.to_string());
        config::save_enabled_targets(&self.root, enabled)?;

        Ok(TargetChange::Added)
    }

    /// Disable a target and remove its symlinks.
    ///
    /// The links are removed even when the target was not enabled.
    pub fn remove_target(&self, name: &str) -> Result<TargetChange> {
        validate_target(name)?;
        self.require_initialized()?;

        let enabled = config::load_enabled_targets(&self.root)?;
        self.linker.remove_target_symlinks(name)?;

        if !enabled.iter().any(|t| t == name) {
            return Ok(TargetChange::NotEnabled);
        }

        let remaining = enabled.into_iter().filter(|t| t != name).collect();
        config::save_enabled_targets(&self.root, remaining)?;

        Ok(TargetChange::Removed)
    }

    pub fn enabled_targets(&self) -> Result<Vec<String>> {
        config::load_enabled_targets(&self.root)
    }

    pub fn mode(&self) -> Result<Mode> {
        Ok(Config::load(&self.root)?.mode)
    }

    /// Switch the project mode and rewrite the ignore section to match
    pub fn set_mode(&self, mode: Mode) -> Result<()> {
        self.require_initialized()?;

        let mut config = Config::load(&self.root)?;
        gitignore::update_managed_section(&self.gitignore_path(), mode)?;

        config.mode = mode;
        config.save(&self.root)
    }

    /// Status of every link of every enabled target
    pub fn verify_links(&self) -> Result<Vec<LinkCheck>> {
        let enabled = self.enabled_targets()?;

        let selected: Vec<&'static Target> = enabled
            .iter()
            .filter_map(|name| {
                let target = targets::find_target(name);
                if target.is_none() {
                    tracing::warn!(name = %name, "Ignoring unknown target in config");
                }
                target
            })
            .collect();

        Ok(self.linker.link_report(selected))
    }

    /// Remove every managed symlink; the config is left as is
    pub fn clean(&self) -> Result<()> {
        self.linker.remove_all_symlinks()
    }

    fn require_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized {
                path: PathBuf::from(RULES_FILE),
            })
        }
    }
}

/// Check a target name against the registry
pub fn validate_target(name: &str) -> Result<&'static Target> {
    targets::find_target(name).ok_or_else(|| Error::InvalidTarget {
        name: name.to_string(),
        available: targets::available_targets(),
    })
}
