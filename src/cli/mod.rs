//! Command-line workflow: the interactive wizard and the release orchestration

pub mod orchestration;
pub mod wizard;

pub use orchestration::{ReleaseOrchestrator, ReleaseSummary, RunOutcome};
pub use wizard::{RunWizard, WizardPreset};
