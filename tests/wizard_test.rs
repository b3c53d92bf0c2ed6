// tests/wizard_test.rs
use release_vr::cli::{RunWizard, WizardPreset};
use release_vr::config::DefaultsConfig;
use release_vr::domain::{CommitOrder, IssueTag, Service};
use release_vr::git::MockRepository;
use release_vr::ui::ScriptedPrompter;
use release_vr::ReleaseError;

fn repo() -> MockRepository {
    let repo = MockRepository::new("main");
    repo.add_branch("dev");
    repo.add_branch("preprod");
    repo
}

#[test]
fn test_defaults_accepted_with_enter() {
    let repo = repo();
    let defaults = DefaultsConfig::default();
    let mut prompter = ScriptedPrompter::new(["", "", "", "", "", "", ""]);

    let config = RunWizard::new(&repo, &mut prompter, &defaults)
        .collect(&WizardPreset::default())
        .unwrap();

    assert_eq!(config.base_branch, "dev");
    assert_eq!(config.target_branch, "preprod");
    assert_eq!(config.release_branch, "preprod-TEST1");
    assert_eq!(
        config.tags,
        vec![IssueTag::new("TICKET-123"), IssueTag::new("TICKET-234")]
    );
    assert_eq!(config.service, Service::Github);
    assert_eq!(config.commit_order, CommitOrder::TagOrder);
    assert!(config.confirm);
    assert_eq!(prompter.remaining(), 0);
}

#[test]
fn test_typed_answers() {
    let repo = repo();
    let defaults = DefaultsConfig::default();
    let mut prompter = ScriptedPrompter::new([
        "preprod",
        "dev",
        "release/2.0",
        "ABC-1 ABC-2 ABC-1",
        "bitbucket",
        "2",
        "y",
    ]);

    let config = RunWizard::new(&repo, &mut prompter, &defaults)
        .collect(&WizardPreset::default())
        .unwrap();

    assert_eq!(config.base_branch, "preprod");
    assert_eq!(config.target_branch, "dev");
    assert_eq!(config.release_branch, "release/2.0");
    assert_eq!(
        config.tags,
        vec![IssueTag::new("ABC-1"), IssueTag::new("ABC-2")]
    );
    assert_eq!(config.service, Service::Bitbucket);
    assert_eq!(config.commit_order, CommitOrder::TimestampOrder);
}

#[test]
fn test_invalid_branch_answers_are_asked_again() {
    let repo = repo();
    let defaults = DefaultsConfig::default();
    let mut prompter = ScriptedPrompter::new([
        "develop", // does not exist
        "dev",
        "preprod",
        "dev", // already exists
        "release-1",
        "T-1",
        "",
        "",
        "",
    ]);

    let config = RunWizard::new(&repo, &mut prompter, &defaults)
        .collect(&WizardPreset::default())
        .unwrap();

    assert_eq!(config.base_branch, "dev");
    assert_eq!(config.release_branch, "release-1");
    assert_eq!(prompter.asked().len(), 9);
}

#[test]
fn test_declined_confirmation() {
    let repo = repo();
    let defaults = DefaultsConfig::default();
    let mut prompter = ScriptedPrompter::new(["", "", "", "", "", "", "n"]);

    let config = RunWizard::new(&repo, &mut prompter, &defaults)
        .collect(&WizardPreset::default())
        .unwrap();

    assert!(!config.confirm);
}

#[test]
fn test_full_preset_asks_nothing() {
    let repo = repo();
    let defaults = DefaultsConfig::default();
    let mut prompter = ScriptedPrompter::default();
    let preset = WizardPreset {
        base_branch: Some("dev".to_string()),
        target_branch: Some("preprod".to_string()),
        release_branch: Some("release-1".to_string()),
        tags: Some("T-1".to_string()),
        service: Some(Service::Gitlab),
        commit_order: Some(CommitOrder::TimestampOrder),
        assume_yes: true,
        merge_parent: 2,
        dedupe_commits: true,
    };

    let config = RunWizard::new(&repo, &mut prompter, &defaults)
        .collect(&preset)
        .unwrap();

    assert!(prompter.asked().is_empty());
    assert!(config.confirm);
    assert_eq!(config.service, Service::Gitlab);
    assert_eq!(config.merge_parent, 2);
    assert!(config.dedupe_commits);
}

#[test]
fn test_invalid_preset_is_a_config_error() {
    let repo = repo();
    repo.add_branch("release-1");
    let defaults = DefaultsConfig::default();
    let mut prompter = ScriptedPrompter::default();
    let preset = WizardPreset {
        base_branch: Some("dev".to_string()),
        target_branch: Some("preprod".to_string()),
        release_branch: Some("release-1".to_string()),
        ..WizardPreset::default()
    };

    let err = RunWizard::new(&repo, &mut prompter, &defaults)
        .collect(&preset)
        .unwrap_err();

    assert!(matches!(err, ReleaseError::Config(_)));
    assert!(err.to_string().contains("already exists"));
    assert!(repo.mutating_calls().is_empty());
}
