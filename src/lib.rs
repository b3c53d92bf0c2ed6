pub mod boundary;
pub mod cherry_pick;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod git;
pub mod ui;

pub use error::{ReleaseError, Result};
