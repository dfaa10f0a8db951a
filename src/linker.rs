//! Symbolic link creation and management
//!
//! Creates, validates, and removes the symlinks that expose the rules file
//! to each AI assistant. Nothing is ever deleted unless a non-following
//! stat proves it is a symlink.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::targets::{self, LinkDefinition, Target};

/// Observed state of a managed link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// Symlink pointing at the expected, reachable source
    Valid,
    /// Nothing exists at the link path
    Missing,
    /// A regular file or directory occupies the link path
    NotSymlink,
    /// Symlink whose recorded destination is not the expected source
    WrongDestination { actual: PathBuf },
    /// Symlink to the expected source, but the source does not resolve
    Dangling,
}

impl LinkStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, LinkStatus::Valid)
    }

    pub fn describe(&self) -> String {
        match self {
            LinkStatus::Valid => "ok".to_string(),
            LinkStatus::Missing => "missing".to_string(),
            LinkStatus::NotSymlink => "exists but is not a symlink".to_string(),
            LinkStatus::WrongDestination { actual } => {
                format!("points to {}", actual.display())
            }
            LinkStatus::Dangling => "broken (source does not exist)".to_string(),
        }
    }
}

/// Result of checking one link definition
#[derive(Debug, Clone)]
pub struct LinkCheck {
    pub target: &'static str,
    pub link: LinkDefinition,
    pub status: LinkStatus,
}

/// Manages the symlinks of every target under one project root
#[derive(Debug, Clone)]
pub struct Linker {
    project_root: PathBuf,
}

impl Linker {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Get the project root path
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Create a symlink at `target` (relative to the project root) whose
    /// content is `source`.
    ///
    /// Anything already at `target` goes through [`Linker::remove_symlink`]
    /// first, so a regular file or directory there aborts the operation.
    pub fn create_symlink(&self, source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<()> {
        let source = clean_path(source.as_ref());
        let target = clean_path(target.as_ref());

        self.remove_link(&target)?;

        let link = self.project_root.join(&target);
        if let Some(parent) = link.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io("create parent directory of", &target, e))?;
        }

        make_symlink(&source, &link).map_err(|e| Error::io("create symlink", &target, e))?;
        tracing::debug!(link = %target.display(), source = %source.display(), "Created symlink");

        Ok(())
    }

    /// Remove the symlink at `path` (relative to the project root).
    ///
    /// Absent paths are a no-op. Regular files and directories are refused
    /// with [`Error::NotASymlink`] and left untouched.
    pub fn remove_symlink(&self, path: impl AsRef<Path>) -> Result<()> {
        self.remove_link(&clean_path(path.as_ref()))
    }

    fn remove_link(&self, path: &Path) -> Result<()> {
        let full = self.project_root.join(path);

        let metadata = match fs::symlink_metadata(&full) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::io("stat", path, e)),
        };

        if !metadata.file_type().is_symlink() {
            tracing::warn!(path = %path.display(), "Refusing to remove a path that is not a symlink");
            return Err(Error::NotASymlink {
                path: path.to_path_buf(),
            });
        }

        fs::remove_file(&full).map_err(|e| Error::io("remove symlink", path, e))?;
        tracing::debug!(path = %path.display(), "Removed symlink");

        Ok(())
    }

    /// Inspect the link at `link_path` against the source it should record.
    pub fn link_status(
        &self,
        link_path: impl AsRef<Path>,
        expected_source: impl AsRef<Path>,
    ) -> LinkStatus {
        let link = self.project_root.join(clean_path(link_path.as_ref()));
        let expected = clean_path(expected_source.as_ref());

        match fs::symlink_metadata(&link) {
            Ok(metadata) if metadata.file_type().is_symlink() => {}
            Ok(_) => return LinkStatus::NotSymlink,
            Err(_) => return LinkStatus::Missing,
        }

        // Removed between the two calls
        let Ok(actual) = fs::read_link(&link) else {
            return LinkStatus::Missing;
        };

        let actual = clean_path(&actual);
        if actual != expected {
            return LinkStatus::WrongDestination { actual };
        }

        // Follows the link, so this fails for broken symlinks
        if fs::metadata(&link).is_err() {
            return LinkStatus::Dangling;
        }

        LinkStatus::Valid
    }

    /// True only for an existing symlink that records `expected_source`
    /// and whose destination resolves.
    pub fn is_symlink_valid(
        &self,
        link_path: impl AsRef<Path>,
        expected_source: impl AsRef<Path>,
    ) -> bool {
        self.link_status(link_path, expected_source).is_valid()
    }

    /// Create the required directories, then every link of every target.
    ///
    /// Stops at the first failure; already created links are kept.
    pub fn create_all_symlinks(&self) -> Result<()> {
        for dir in targets::required_directories() {
            self.ensure_directory(Path::new(dir))?;
        }

        for target in targets::all_targets() {
            self.create_links(target)
                .map_err(|e| e.for_target("create symlinks", target.name))?;
        }

        Ok(())
    }

    /// Remove every managed link. Stops at the first failure.
    pub fn remove_all_symlinks(&self) -> Result<()> {
        for target in targets::all_targets() {
            self.remove_links(target)
                .map_err(|e| e.for_target("remove symlinks", target.name))?;
        }

        Ok(())
    }

    /// Create the links of a single target
    pub fn create_target_symlinks(&self, name: &str) -> Result<()> {
        let target = lookup(name)?;

        for dir in targets::required_directories() {
            if target.links.iter().any(|l| Path::new(l.target).starts_with(dir)) {
                self.ensure_directory(Path::new(dir))?;
            }
        }

        self.create_links(target)
            .map_err(|e| e.for_target("create symlinks", target.name))
    }

    /// Remove the links of a single target
    pub fn remove_target_symlinks(&self, name: &str) -> Result<()> {
        let target = lookup(name)?;
        self.remove_links(target)
            .map_err(|e| e.for_target("remove symlinks", target.name))
    }

    /// Check every link in the registry.
    ///
    /// Returns whether all are valid, plus `"<link> (<target>)"` for each
    /// one that is not.
    pub fn check_all_symlinks(&self) -> (bool, Vec<String>) {
        let invalid: Vec<String> = self
            .link_report(targets::all_targets())
            .into_iter()
            .filter(|check| !check.status.is_valid())
            .map(|check| format!("{} ({})", check.link.target, check.target))
            .collect();

        (invalid.is_empty(), invalid)
    }

    /// Status of every link belonging to `targets`
    pub fn link_report<'a>(&self, targets: impl IntoIterator<Item = &'a Target>) -> Vec<LinkCheck> {
        targets
            .into_iter()
            .flat_map(|target| {
                target.links.iter().map(move |link| LinkCheck {
                    target: target.name,
                    link: *link,
                    status: self.link_status(link.target, link.source),
                })
            })
            .collect()
    }

    fn create_links(&self, target: &Target) -> Result<()> {
        for link in target.links {
            self.create_symlink(link.source, link.target)?;
        }
        Ok(())
    }

    fn remove_links(&self, target: &Target) -> Result<()> {
        for link in target.links {
            self.remove_symlink(link.target)?;
        }
        Ok(())
    }

    fn ensure_directory(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(self.project_root.join(dir))
            .map_err(|e| Error::io("create directory", dir, e))
    }
}

fn lookup(name: &str) -> Result<&'static Target> {
    targets::find_target(name).ok_or_else(|| Error::TargetNotFound {
        name: name.to_string(),
    })
}

#[cfg(unix)]
fn make_symlink(source: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(not(unix))]
fn make_symlink(_source: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symlinks are only supported on Unix-like systems",
    ))
}

/// Lexically normalize a path: drop `.` segments and fold `name/..` pairs.
///
/// Symlinks are not resolved, so leading `..` segments of a relative path
/// are kept. An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.into_iter().collect()
    }
}
