//! Interactive collection of a [RunConfig]

use crate::config::DefaultsConfig;
use crate::domain::{CommitOrder, IssueTag, RunConfig, Service};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::ui::{self, Prompter};

/// Answers already known before the wizard starts
///
/// Mirrors the CLI flags without depending on clap. A `Some` value is
/// validated like a typed answer but never prompted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardPreset {
    pub base_branch: Option<String>,
    pub target_branch: Option<String>,
    pub release_branch: Option<String>,
    pub tags: Option<String>,
    pub service: Option<Service>,
    pub commit_order: Option<CommitOrder>,
    /// Skip the final confirmation
    pub assume_yes: bool,
    pub merge_parent: u32,
    pub dedupe_commits: bool,
}

impl Default for WizardPreset {
    fn default() -> Self {
        WizardPreset {
            base_branch: None,
            target_branch: None,
            release_branch: None,
            tags: None,
            service: None,
            commit_order: None,
            assume_yes: false,
            merge_parent: 1,
            dedupe_commits: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchRule {
    MustExist,
    MustNotExist,
}

/// Asks for everything a run needs
pub struct RunWizard<'a, R: Repository + ?Sized, P: Prompter + ?Sized> {
    repo: &'a R,
    prompter: &'a mut P,
    defaults: &'a DefaultsConfig,
}

impl<'a, R: Repository + ?Sized, P: Prompter + ?Sized> RunWizard<'a, R, P> {
    pub fn new(repo: &'a R, prompter: &'a mut P, defaults: &'a DefaultsConfig) -> Self {
        RunWizard {
            repo,
            prompter,
            defaults,
        }
    }

    /// Collect the run configuration, prompting for whatever the preset
    /// leaves open. Invalid typed answers are asked again; an invalid preset
    /// is a configuration error.
    pub fn collect(&mut self, preset: &WizardPreset) -> Result<RunConfig> {
        let defaults = self.defaults;

        let base_branch = self.branch(
            "Enter the base branch to search for tags",
            preset.base_branch.as_deref(),
            &defaults.base_branch,
            BranchRule::MustExist,
        )?;
        let target_branch = self.branch(
            "Enter the target branch to cherry-pick to",
            preset.target_branch.as_deref(),
            &defaults.target_branch,
            BranchRule::MustExist,
        )?;
        let release_branch = self.branch(
            "Enter the release branch to create",
            preset.release_branch.as_deref(),
            &defaults.release_branch,
            BranchRule::MustNotExist,
        )?;

        let tags = match &preset.tags {
            Some(tags) => tags.clone(),
            None => self.prompter.input(
                "Enter the tags to cherry-pick, separated by spaces",
                &defaults.tags,
            )?,
        };

        let service = match preset.service {
            Some(service) => service,
            None => {
                let options: Vec<String> = Service::ALL.iter().map(|s| s.to_string()).collect();
                let default = Service::ALL
                    .iter()
                    .position(|s| *s == defaults.service)
                    .unwrap_or(0);
                let index = self
                    .prompter
                    .select("Which service are you using?", &options, default)?;
                Service::ALL[index]
            }
        };

        let commit_order = match preset.commit_order {
            Some(order) => order,
            None => {
                let options: Vec<String> = CommitOrder::ALL
                    .iter()
                    .map(|o| o.description().to_string())
                    .collect();
                let default = CommitOrder::ALL
                    .iter()
                    .position(|o| *o == defaults.commit_order)
                    .unwrap_or(0);
                let index = self.prompter.select(
                    "Choose the order for cherry-picking commits",
                    &options,
                    default,
                )?;
                CommitOrder::ALL[index]
            }
        };

        let mut config = RunConfig {
            base_branch,
            target_branch,
            release_branch,
            tags: IssueTag::parse_list(&tags),
            confirm: false,
            service,
            commit_order,
            merge_parent: preset.merge_parent,
            dedupe_commits: preset.dedupe_commits,
        };

        ui::display_run_config(&config);
        config.confirm = preset.assume_yes
            || self
                .prompter
                .confirm("Does the above information look correct?", true)?;

        Ok(config)
    }

    fn branch(
        &mut self,
        message: &str,
        preset: Option<&str>,
        default: &str,
        rule: BranchRule,
    ) -> Result<String> {
        if let Some(name) = preset {
            return match self.check_branch(name, rule)? {
                None => Ok(name.trim().to_string()),
                Some(problem) => Err(ReleaseError::config(problem)),
            };
        }

        let message = format!("{} (e.g., {})", message, default);
        loop {
            let answer = self.prompter.input(&message, default)?;
            match self.check_branch(&answer, rule)? {
                None => return Ok(answer),
                Some(problem) => ui::display_error(&problem),
            }
        }
    }

    /// Describe what is wrong with a branch answer, if anything
    fn check_branch(&self, name: &str, rule: BranchRule) -> Result<Option<String>> {
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Ok(Some(format!("'{}' is not a valid branch name.", name)));
        }

        let exists = self.repo.branch_exists(name)?;
        let problem = match (rule, exists) {
            (BranchRule::MustExist, false) => Some(format!("{} branch does not exist.", name)),
            (BranchRule::MustNotExist, true) => Some(format!("{} branch already exists.", name)),
            _ => None,
        };
        Ok(problem)
    }
}
