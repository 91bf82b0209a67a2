#![deny(clippy::all, clippy::nursery)]
#![deny(nonstandard_style, rust_2018_idioms)]

use anyhow::Result;
use merkle_deploy::deploy::{merkle_deploy_stack, ACCOUNT, REGION};
use merkle_deploy::{App, Environment, StackPropsBuilder};
use std::env;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let outdir = env::var("SYNTH_OUTDIR").unwrap_or_else(|_| "cdk.out".to_string());

    let mut app = App::with_dirs(".", &outdir);
    app.add_stack(merkle_deploy_stack(
        "MerkleDeployStack",
        StackPropsBuilder::default()
            .env(Environment::new(ACCOUNT, REGION))
            .build()?,
    )?);

    let assembly = app.synth()?;

    for stack in assembly.stacks() {
        info!(
            "{} -> {}",
            stack.stack_name,
            assembly.directory.join(&stack.template_file).display()
        );
    }

    Ok(())
}
