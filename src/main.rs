use anyhow::Result;
use clap::Parser;

use release_vr::cli::{ReleaseOrchestrator, RunOutcome, RunWizard, WizardPreset};
use release_vr::config;
use release_vr::domain::{CommitOrder, Service};
use release_vr::git::Git2Repository;
use release_vr::ui::{self, TerminalPrompter};

#[derive(clap::Parser)]
#[command(
    name = "release-vr",
    version,
    about = "Cherry-pick the commits referencing issue tags onto a new release branch"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Branch to search for tagged commits")]
    base: Option<String>,

    #[arg(short, long, help = "Branch the release branch is created from")]
    target: Option<String>,

    #[arg(short, long, help = "Name of the release branch to create")]
    release: Option<String>,

    #[arg(long, help = "Space separated issue tags, e.g. \"TICKET-1 TICKET-2\"")]
    tags: Option<String>,

    #[arg(long, value_enum, ignore_case = true, help = "Hosting service")]
    service: Option<Service>,

    #[arg(long, value_enum, help = "Order in which commits are replayed")]
    order: Option<CommitOrder>,

    #[arg(long, help = "Parent number passed to `git cherry-pick -m`")]
    merge_parent: Option<u32>,

    #[arg(long, help = "Pick a commit only once when several tags reference it")]
    dedupe: bool,

    #[arg(short, long, help = "Skip the final confirmation")]
    yes: bool,

    #[arg(short, long, help = "Show debug output")]
    verbose: bool,
}

fn initialize_logger(verbose: bool) -> Result<()> {
    let filter = if verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_vr")
        .set_time_format_rfc3339()
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    initialize_logger(args.verbose)?;

    let code = run(args)?;
    std::process::exit(code);
}

fn run(args: Args) -> Result<i32> {
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            return Ok(e.exit_code());
        }
    };

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            return Ok(e.exit_code());
        }
    };

    let preset = WizardPreset {
        base_branch: args.base,
        target_branch: args.target,
        release_branch: args.release,
        tags: args.tags,
        service: args.service,
        commit_order: args.order,
        assume_yes: args.yes,
        merge_parent: args
            .merge_parent
            .unwrap_or(config.cherry_pick.merge_parent),
        dedupe_commits: args.dedupe || config.cherry_pick.dedupe_commits,
    };

    let mut prompter = TerminalPrompter::stdin();
    ui::display_banner();

    let run_config = match RunWizard::new(&repo, &mut prompter, &config.defaults).collect(&preset)
    {
        Ok(run_config) => run_config,
        Err(e) => {
            ui::display_error(&e.to_string());
            return Ok(e.exit_code());
        }
    };

    match ReleaseOrchestrator::new(&repo, &mut prompter).run(&run_config) {
        Ok(RunOutcome::Completed(summary)) => {
            ui::display_release_summary(&summary);
            Ok(0)
        }
        Ok(RunOutcome::NothingToDo) => {
            ui::display_status("No tags given, nothing to cherry-pick.");
            Ok(0)
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            Ok(e.exit_code())
        }
    }
}
