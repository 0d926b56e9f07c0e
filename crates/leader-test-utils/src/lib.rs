//! Shared test utilities for the jenkins-leader workspace.
//!
//! Scripted and recording doubles for every seam `leader-core` drives, plus a
//! temporary project directory builder. It is a dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`doubles`] - stub probes, sleepers, inventories, CLIs and services
//! - [`project`] - [`TestProject`] builder for on-disk project layouts

pub mod doubles;
pub mod project;

pub use doubles::{
    CliCall, FixedArtifact, RecordingCli, RecordingRunner, RecordingServices, RecordingSleeper,
    ScriptedProbe, ServiceCall, StaticInventory,
};
pub use project::TestProject;
