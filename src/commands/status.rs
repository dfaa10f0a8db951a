use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use viberules::{LinkStatus, Project};

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusEntry {
    target: &'static str,
    link: &'static str,
    expected_source: &'static str,
    state: &'static str,
    points_to: Option<String>,
}

fn state_name(status: &LinkStatus) -> &'static str {
    match status {
        LinkStatus::Valid => "valid",
        LinkStatus::Missing => "missing",
        LinkStatus::NotSymlink => "not_symlink",
        LinkStatus::WrongDestination { .. } => "wrong_destination",
        LinkStatus::Dangling => "dangling",
    }
}

pub fn run_status(args: StatusArgs, project: &Project) -> Result<()> {
    let checks = project.verify_links()?;
    let problems = checks.iter().filter(|c| !c.status.is_valid()).count();

    if args.json {
        let entries: Vec<StatusEntry> = checks
            .iter()
            .map(|check| StatusEntry {
                target: check.target,
                link: check.link.target,
                expected_source: check.link.source,
                state: state_name(&check.status),
                points_to: match &check.status {
                    LinkStatus::WrongDestination { actual } => Some(actual.display().to_string()),
                    LinkStatus::Valid | LinkStatus::Dangling => Some(check.link.source.to_string()),
                    LinkStatus::Missing | LinkStatus::NotSymlink => None,
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        if checks.is_empty() {
            println!("{} No targets enabled", "!".yellow());
        }
        for check in &checks {
            let glyph = match check.status {
                LinkStatus::Valid => "✔".green(),
                LinkStatus::Missing | LinkStatus::Dangling => "!".yellow(),
                LinkStatus::NotSymlink | LinkStatus::WrongDestination { .. } => "✗".red(),
            };
            println!(
                "{} {} ({}): {}",
                glyph,
                check.link.target,
                check.target,
                check.status.describe()
            );
        }
    }

    if problems > 0 {
        bail!(
            "{} link problem(s) found; run 'viberules init --force' or 'viberules add <target>' to repair",
            problems
        );
    }

    if !args.json {
        println!("\nStatus: All good");
    }

    Ok(())
}
