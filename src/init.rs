//! Template for the initial rules file

/// Default `.viberules/rules.md` written by `viberules init`
pub const DEFAULT_RULES_MD: &str = r#"# AI Assistant Rules

> IMPORTANT: Edit THIS FILE (rules.md) to update rules for ALL AI assistants.
> Changes here automatically apply to Claude, Amazon Q, Gemini, Codex, etc.

## Project Overview

<!-- Describe your project, tech stack, and coding standards here -->

## Coding Standards

<!-- Describe your coding conventions -->

## Architecture Guidelines

<!-- Describe your project architecture -->

## Git Workflow

<!-- Describe branching, commit and review conventions -->

---
*This file is linked to all AI assistants via viberules*
"#;
