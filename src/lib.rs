//! viberules - one rules file for every AI assistant
//!
//! Keeps a single `.viberules/rules.md` and exposes it to each supported
//! assistant (Claude, Amazon Q, Gemini, Codex) through symbolic links, with
//! a mode-aware managed section in `.gitignore`.

pub mod config;
pub mod error;
pub mod gitignore;
pub mod init;
pub mod linker;
pub mod project;
pub mod targets;

pub use config::{Config, Mode};
pub use error::{Error, Result};
pub use linker::{LinkCheck, LinkStatus, Linker};
pub use project::{InitReport, Project, RulesFileState, TargetChange};
