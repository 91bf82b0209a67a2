//! Declarative deployment definition for the merkle info service.
//!
//! Models a minimal construct tree (app → stack → resources) and synthesizes
//! it to a CloudFormation template plus staged code archives. The `synth`
//! binary is the deployment entry point; [`deploy`] holds the actual service
//! definition.

mod app;
mod asset;
mod error;
mod stack;

pub mod apigateway;
pub mod deploy;
pub mod lambda;

pub use app::{App, AssetArtifact, CloudAssembly, StackArtifact};
pub use asset::Code;
pub use error::SynthError;
pub use stack::{Environment, Stack, StackProps, StackPropsBuilder};
