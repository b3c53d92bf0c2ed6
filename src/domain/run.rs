use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::tag::IssueTag;

/// Hosting service the repository is merged through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Service {
    #[default]
    Github,
    Bitbucket,
    Gitlab,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::Github, Service::Bitbucket, Service::Gitlab];

    /// Bitbucket records pull requests as merge commits carrying the issue
    /// key, so only merges are searched there.
    pub fn merges_only(&self) -> bool {
        matches!(self, Service::Bitbucket)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Service::Github => "GITHUB",
            Service::Bitbucket => "BITBUCKET",
            Service::Gitlab => "GITLAB",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Order in which discovered commits are replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum CommitOrder {
    /// Process commits for each tag sequentially
    #[default]
    #[value(alias = "tagOrder")]
    TagOrder,
    /// Process all commits in chronological order
    #[value(alias = "timestampOrder")]
    TimestampOrder,
}

impl CommitOrder {
    pub const ALL: [CommitOrder; 2] = [CommitOrder::TagOrder, CommitOrder::TimestampOrder];

    pub fn description(&self) -> &'static str {
        match self {
            CommitOrder::TagOrder => "Order by Tags (process commits for each tag sequentially)",
            CommitOrder::TimestampOrder => {
                "Order by Timestamp (process commits in chronological order)"
            }
        }
    }
}

/// Everything a release run needs, fixed before the first git command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub base_branch: String,
    pub target_branch: String,
    pub release_branch: String,
    pub tags: Vec<IssueTag>,
    pub confirm: bool,
    pub service: Service,
    pub commit_order: CommitOrder,
    /// Parent number passed to `cherry-pick -m`
    pub merge_parent: u32,
    /// Drop commits already scheduled under an earlier tag
    pub dedupe_commits: bool,
}

impl RunConfig {
    pub fn new(
        base_branch: impl Into<String>,
        target_branch: impl Into<String>,
        release_branch: impl Into<String>,
        tags: Vec<IssueTag>,
    ) -> Self {
        RunConfig {
            base_branch: base_branch.into(),
            target_branch: target_branch.into(),
            release_branch: release_branch.into(),
            tags,
            confirm: true,
            service: Service::default(),
            commit_order: CommitOrder::default(),
            merge_parent: 1,
            dedupe_commits: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_bitbucket_restricts_to_merges() {
        assert!(Service::Bitbucket.merges_only());
        assert!(!Service::Github.merges_only());
        assert!(!Service::Gitlab.merges_only());
    }

    #[test]
    fn test_service_names() {
        let names: Vec<String> = Service::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["GITHUB", "BITBUCKET", "GITLAB"]);
    }

    #[test]
    fn test_run_config_defaults() {
        let cfg = RunConfig::new("dev", "preprod", "preprod-TEST1", vec![]);
        assert!(cfg.confirm);
        assert_eq!(cfg.service, Service::Github);
        assert_eq!(cfg.commit_order, CommitOrder::TagOrder);
        assert_eq!(cfg.merge_parent, 1);
        assert!(!cfg.dedupe_commits);
    }
}
