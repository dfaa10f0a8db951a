//! Gitignore management
//!
//! Maintains the viberules section of `.gitignore`. The section is removed
//! and regenerated on every update; the rest of the file is left alone.

use std::fs;
use std::path::Path;

use crate::config::{CONFIG_FILE, Mode};
use crate::error::{Error, Result};
use crate::targets;

// These literals identify viberules sections in existing .gitignore files.
// Changing one breaks updates for every project that already has it, so a
// new header must keep recognizing the old literal when stripping.

/// Header of the whole-directory entry (local mode only)
pub const LOCAL_MODE_HEADER: &str = "# viberules (local mode";
/// Header of the personal files entry
pub const LOCAL_FILES_HEADER: &str = "# viberules local files";
/// Header of the config file entry
pub const CONFIG_FILE_HEADER: &str = "# viberules config file";
/// Header of the generated symlinks entries
pub const OUTPUT_FILES_HEADER: &str = "# viberules output files";

/// Headers that open or continue a managed section
const RECOGNIZED_HEADERS: [&str; 4] = [
    LOCAL_MODE_HEADER,
    LOCAL_FILES_HEADER,
    CONFIG_FILE_HEADER,
    OUTPUT_FILES_HEADER,
];

/// Personal notes that never belong in version control
pub const LOCAL_FILES_PATTERN: &str = "*.local.md";

/// Build the managed section for `mode`, starting with a blank line.
pub fn managed_section(mode: Mode) -> String {
    let mut section = String::from("\n");

    if mode == Mode::Local {
        section.push_str(&format!(
            "{LOCAL_MODE_HEADER} - entire directory ignored)\n{}/\n\n",
            targets::VIBERULES_DIR
        ));
    }

    section.push_str(&format!("{CONFIG_FILE_HEADER} (always ignored)\n{CONFIG_FILE}\n\n"));
    section.push_str(&format!(
        "{LOCAL_FILES_HEADER} (personal files only)\n{LOCAL_FILES_PATTERN}\n\n"
    ));

    section.push_str(&format!("{OUTPUT_FILES_HEADER} (symlinked)\n"));
    for entry in targets::output_ignore_entries() {
        section.push_str(&entry);
        section.push('\n');
    }

    section
}

/// Whether `content` contains a managed section
pub fn has_managed_section(content: &[u8]) -> bool {
    RECOGNIZED_HEADERS
        .iter()
        .any(|h| content.windows(h.len()).any(|w| w == h.as_bytes()))
}

fn is_managed_header(line: &[u8]) -> bool {
    RECOGNIZED_HEADERS
        .iter()
        .any(|h| line.starts_with(h.as_bytes()))
}

/// Remove the managed section from gitignore content.
///
/// Skipping starts at a recognized header line and ends before the next
/// comment line that is not one, so user content directly after the section
/// survives. Other lines are kept byte for byte, whatever their encoding.
/// Trailing blank lines are dropped; a non-empty result ends with exactly
/// one newline.
pub fn strip_managed_section(content: &[u8]) -> Vec<u8> {
    let mut kept: Vec<&[u8]> = Vec::new();

    if has_managed_section(content) {
        let mut in_section = false;
        for line in content.split(|&b| b == b'\n') {
            if is_managed_header(line) {
                in_section = true;
                continue;
            }
            if in_section {
                if line.starts_with(b"#") {
                    in_section = false;
                    kept.push(line);
                }
                continue;
            }
            kept.push(line);
        }
    } else {
        kept.extend(content.split(|&b| b == b'\n'));
    }

    while kept
        .last()
        .is_some_and(|line| line.iter().all(u8::is_ascii_whitespace))
    {
        kept.pop();
    }

    if kept.is_empty() {
        Vec::new()
    } else {
        let mut result = kept.join(&b'\n');
        result.push(b'\n');
        result
    }
}

/// Rewrite the managed section of the ignore file at `path` for `mode`.
///
/// A missing file is treated as empty and created. Running this twice with
/// the same mode leaves the file byte-identical.
pub fn update_managed_section(path: &Path, mode: Mode) -> Result<()> {
    let existing_content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(Error::io("read", path, e)),
    };

    let mut new_content = strip_managed_section(&existing_content);
    new_content.extend_from_slice(managed_section(mode).as_bytes());

    if new_content == existing_content {
        tracing::debug!(path = %path.display(), "Ignore file already up to date");
        return Ok(());
    }

    fs::write(path, &new_content).map_err(|e| Error::io("write", path, e))?;
    tracing::debug!(path = %path.display(), %mode, "Updated managed ignore section");

    Ok(())
}
