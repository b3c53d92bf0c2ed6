//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here have no side effects beyond printing.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::ReleaseSummary;
use crate::discovery::ReplayPlan;
use crate::domain::{Commit, RunConfig};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Welcome text shown before the wizard starts.
pub fn display_banner() {
    let rule = "-".repeat(78);
    println!("{}", rule);
    println!("  {}", style("Welcome to the release-vr helper CLI!").bold());
    println!();
    println!("  release-vr uses your local git setup to cherry-pick changes");
    println!("  from one branch onto a new release branch.");
    println!("  This wizard will guide you through the initial branching.");
    println!("{}", rule);
}

/// Display the answers collected for a run.
pub fn display_run_config(config: &RunConfig) {
    let tags: Vec<&str> = config.tags.iter().map(|t| t.name.as_str()).collect();

    println!("\n{}", style("Release run:").bold());
    println!("  Base branch:    {}", config.base_branch);
    println!("  Target branch:  {}", config.target_branch);
    println!("  Release branch: {}", style(&config.release_branch).green());
    println!("  Tags:           {}", tags.join(" "));
    println!("  Service:        {}", config.service);
    println!("  Order:          {}", config.commit_order.description());
}

fn display_commit_line(index: usize, commit: &Commit) {
    let summary = commit.summary();
    let short_msg = if summary.chars().count() > 60 {
        summary.chars().take(60).collect::<String>()
    } else {
        summary.to_string()
    };
    println!(
        "  {}. {} {} {}",
        index,
        style(commit.short_hash()).yellow(),
        style(commit.date.format("%Y-%m-%d %H:%M")).dim(),
        short_msg
    );
}

/// Display the commits about to be cherry-picked, in replay order.
pub fn display_replay_plan(plan: &ReplayPlan) {
    println!(
        "\n{}",
        style(format!("Commits to cherry-pick ({}):", plan.total_commits())).bold()
    );

    let mut index = 0;
    for group in plan.groups() {
        if let Some(tag) = &group.tag {
            println!("{}", style(tag).underlined());
            if group.commits.is_empty() {
                println!("  (none)");
            }
        }
        for commit in &group.commits {
            index += 1;
            display_commit_line(index, commit);
        }
    }
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Explain how to get past a conflicted cherry-pick.
pub fn display_conflict_instructions(commit: &Commit, files: &[String]) {
    println!(
        "\n{} while picking {} {}",
        style("Conflict detected").red().bold(),
        style(commit.short_hash()).yellow(),
        commit.summary()
    );
    for file in files {
        println!("  {} {}", style("both modified:").red(), file);
    }
    println!("  Resolve the conflicts in your editor and stage them with `git add`.");
    println!("  If the pick turns out to be empty it will be skipped automatically.");
}

/// Display the outcome of a completed run.
pub fn display_release_summary(summary: &ReleaseSummary) {
    println!(
        "\n{} Release branch {} created",
        style("✓").green(),
        style(&summary.release_branch).green().bold()
    );
    println!("  Applied:              {}", summary.applied.len());
    println!("  Applied after fixes:  {}", summary.resolved.len());
    println!("  Skipped (empty):      {}", summary.skipped.len());

    if !summary.tags_without_commits.is_empty() {
        let tags: Vec<&str> = summary
            .tags_without_commits
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        println!("  Tags without commits: {}", tags.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        // Visual verification test - output is printed to stdout
        display_success("test success");
    }

    #[test]
    fn test_display_status() {
        // Visual verification test - output is printed to stdout
        display_status("test status");
    }
}
