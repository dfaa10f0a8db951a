//! Supported AI assistant targets
//!
//! The catalog is closed: every target and the symlinks it needs are known
//! at compile time. Link paths are relative to the project root and use `/`
//! separators since only Unix-like systems are supported.

/// Directory holding the canonical rules file and the config store
pub const VIBERULES_DIR: &str = ".viberules";

/// The single rules file every symlink resolves to
pub const RULES_FILE: &str = ".viberules/rules.md";

/// One desired symlink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkDefinition {
    /// Symlink content, resolved from the directory containing `target`
    pub source: &'static str,
    /// Where the symlink itself lives
    pub target: &'static str,
}

/// An AI assistant integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub name: &'static str,
    pub description: &'static str,
    pub links: &'static [LinkDefinition],
}

static TARGETS: [Target; 4] = [
    Target {
        name: "claude",
        description: "Claude Code",
        links: &[LinkDefinition {
            source: ".viberules/rules.md",
            target: "CLAUDE.md",
        }],
    },
    Target {
        name: "amazonq",
        description: "Amazon Q Developer",
        links: &[LinkDefinition {
            source: "../../.viberules/rules.md",
            target: ".amazonq/rules/AMAZONQ.md",
        }],
    },
    Target {
        name: "gemini",
        description: "Gemini Code Assist",
        links: &[LinkDefinition {
            source: ".viberules/rules.md",
            target: "GEMINI.md",
        }],
    },
    Target {
        name: "codex",
        description: "OpenAI Codex",
        links: &[LinkDefinition {
            source: ".viberules/rules.md",
            target: "AGENTS.md",
        }],
    },
];

static REQUIRED_DIRECTORIES: [&str; 1] = [".amazonq/rules"];

/// All supported targets, in registry order
pub fn all_targets() -> &'static [Target] {
    &TARGETS
}

/// Directories that must exist before links can be created
pub fn required_directories() -> &'static [&'static str] {
    &REQUIRED_DIRECTORIES
}

/// Look up a target by its exact (case-sensitive) name
pub fn find_target(name: &str) -> Option<&'static Target> {
    TARGETS.iter().find(|t| t.name == name)
}

/// Names of all targets, in registry order
pub fn target_names() -> impl Iterator<Item = &'static str> {
    TARGETS.iter().map(|t| t.name)
}

/// Comma-separated target names, for error messages
pub fn available_targets() -> String {
    target_names().collect::<Vec<_>>().join(", ")
}

/// Ignore-file entries covering every generated symlink.
///
/// Root-level links are listed by file name; nested links are covered by
/// their top-level directory (`.amazonq/`).
pub fn output_ignore_entries() -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for link in TARGETS.iter().flat_map(|t| t.links) {
        let entry = match link.target.split_once('/') {
            Some((top, _)) => format!("{top}/"),
            None => link.target.to_string(),
        };
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_all_targets() {
        let names: Vec<_> = target_names().collect();
        assert_eq!(names, vec!["claude", "amazonq", "gemini", "codex"]);

        for target in all_targets() {
            assert!(!target.links.is_empty(), "{} has no links", target.name);
        }
    }

    #[test]
    fn test_link_sources_reach_rules_file() {
        // Resolve each source lexically from the link's parent directory.
        for target in all_targets() {
            for link in target.links {
                let parent = Path::new(link.target).parent().unwrap_or(Path::new(""));
                let resolved = crate::linker::clean_path(&parent.join(link.source));
                assert_eq!(
                    resolved,
                    Path::new(RULES_FILE),
                    "{} -> {} does not reach the rules file",
                    link.target,
                    link.source
                );
            }
        }
    }

    #[test]
    fn test_find_target_is_case_sensitive() {
        assert_eq!(find_target("claude").map(|t| t.name), Some("claude"));
        assert!(find_target("Claude").is_none());
        assert!(find_target("").is_none());
        assert!(find_target("invalid").is_none());
    }

    #[test]
    fn test_required_directories() {
        assert_eq!(required_directories(), &[".amazonq/rules"]);

        // Every nested link lives under a required directory.
        for link in all_targets().iter().flat_map(|t| t.links) {
            if let Some(parent) = Path::new(link.target).parent()
                && !parent.as_os_str().is_empty()
            {
                assert!(
                    required_directories()
                        .iter()
                        .any(|d| parent.starts_with(d)),
                    "{} has no required directory",
                    link.target
                );
            }
        }
    }

    #[test]
    fn test_output_ignore_entries() {
        assert_eq!(
            output_ignore_entries(),
            vec!["CLAUDE.md", ".amazonq/", "GEMINI.md", "AGENTS.md"]
        );
    }

    #[test]
    fn test_available_targets() {
        assert_eq!(available_targets(), "claude, amazonq, gemini, codex");
    }
}
