use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::asset;
use crate::error::Result;
use crate::stack::Stack;

/// Construct root: owns the declared stacks and knows where synthesis
/// output goes.
#[derive(Debug)]
pub struct App {
    base_dir: PathBuf,
    outdir: PathBuf,
    stacks: Vec<Stack>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// App rooted in the current directory, writing to `cdk.out`.
    pub fn new() -> Self {
        Self::with_dirs(".", "cdk.out")
    }

    /// App resolving relative asset paths against `base_dir` and writing the
    /// assembly to `outdir`.
    pub fn with_dirs(base_dir: impl Into<PathBuf>, outdir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            outdir: outdir.into(),
            stacks: Vec::new(),
        }
    }

    pub fn add_stack(&mut self, stack: Stack) {
        self.stacks.push(stack);
    }

    /// Single-pass synthesis: stage every code asset, render every template,
    /// write the assembly manifest. Purely constructive, so synthesizing the
    /// same app again produces structurally identical output.
    pub fn synth(&self) -> Result<CloudAssembly> {
        fs::create_dir_all(&self.outdir)?;

        let mut artifacts = Vec::with_capacity(self.stacks.len());
        for stack in &self.stacks {
            info!("Synthesizing stack {}", stack.name());

            let mut assets = Vec::new();
            for code in stack.assets() {
                let staged = asset::stage(&self.resolve(&code.source), &self.outdir)?;
                assets.push(AssetArtifact {
                    source: code.source.clone(),
                    staged: staged.file_name,
                    sha256: staged.sha256,
                    bucket_parameter: code.bucket_parameter.clone(),
                    key_parameter: code.key_parameter.clone(),
                });
            }

            let template = stack.to_template();
            let template_file = format!("{}.template.json", stack.name());
            fs::write(
                self.outdir.join(&template_file),
                serde_json::to_string_pretty(&template)?,
            )?;

            artifacts.push(StackArtifact {
                stack_name: stack.name().to_string(),
                template_file,
                environment: stack.env().map(ToString::to_string),
                assets,
                template,
            });
        }

        let assembly = CloudAssembly {
            directory: self.outdir.clone(),
            stacks: artifacts,
        };
        fs::write(
            self.outdir.join("manifest.json"),
            serde_json::to_string_pretty(&assembly.manifest())?,
        )?;

        info!("Wrote assembly to {}", self.outdir.display());

        Ok(assembly)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// A staged code archive, recorded in the manifest so a deployment step can
/// upload it and fill in the matching template parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetArtifact {
    pub source: PathBuf,
    pub staged: String,
    pub sha256: String,
    pub bucket_parameter: String,
    pub key_parameter: String,
}

/// One synthesized stack: its template (in memory and on disk) plus the
/// assets it references.
#[derive(Debug, Clone, Serialize)]
pub struct StackArtifact {
    pub stack_name: String,
    pub template_file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    pub assets: Vec<AssetArtifact>,

    #[serde(skip)]
    template: Value,
}

impl StackArtifact {
    pub fn template(&self) -> &Value {
        &self.template
    }
}

/// Everything one synthesis pass produced.
#[derive(Debug, Clone)]
pub struct CloudAssembly {
    pub directory: PathBuf,
    stacks: Vec<StackArtifact>,
}

impl CloudAssembly {
    pub fn stacks(&self) -> &[StackArtifact] {
        &self.stacks
    }

    pub fn stack(&self, name: &str) -> Option<&StackArtifact> {
        self.stacks.iter().find(|s| s.stack_name == name)
    }

    fn manifest(&self) -> Value {
        json!({
            "version": "1.0",
            "artifacts": &self.stacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Code;
    use crate::error::SynthError;
    use crate::lambda::{Function, FunctionPropsBuilder, Runtime};
    use crate::stack::{Environment, StackPropsBuilder};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn demo_stack() -> Stack {
        let mut stack = Stack::new(
            "DemoStack",
            StackPropsBuilder::default()
                .env(Environment::new("123456789012", "eu-west-3"))
                .build()
                .unwrap(),
        );
        Function::new(
            &mut stack,
            "Handler",
            FunctionPropsBuilder::default()
                .runtime(Runtime::Provided)
                .code(Code::from_asset("lambda.zip"))
                .handler("hello")
                .build()
                .unwrap(),
        )
        .unwrap();
        stack
    }

    #[test]
    fn test_synth_writes_assembly() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lambda.zip"), b"bootstrap").unwrap();

        let mut app = App::with_dirs(dir.path(), dir.path().join("out"));
        app.add_stack(demo_stack());
        let assembly = app.synth().unwrap();

        let artifact = assembly.stack("DemoStack").unwrap();
        assert_eq!(artifact.template_file, "DemoStack.template.json");
        assert_eq!(
            artifact.environment.as_deref(),
            Some("aws://123456789012/eu-west-3")
        );
        assert_eq!(artifact.assets.len(), 1);

        // Template, manifest, and staged archive all land in the outdir.
        let outdir = dir.path().join("out");
        assert!(outdir.join("DemoStack.template.json").is_file());
        assert!(outdir.join("manifest.json").is_file());
        assert!(outdir.join(&artifact.assets[0].staged).is_file());

        // The on-disk template matches the in-memory one.
        let written: Value =
            serde_json::from_str(&fs::read_to_string(outdir.join("DemoStack.template.json")).unwrap())
                .unwrap();
        assert_eq!(&written, artifact.template());
    }

    #[test]
    fn test_manifest_records_assets() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lambda.zip"), b"bootstrap").unwrap();

        let mut app = App::with_dirs(dir.path(), dir.path().join("out"));
        app.add_stack(demo_stack());
        let assembly = app.synth().unwrap();

        let manifest: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("out").join("manifest.json")).unwrap(),
        )
        .unwrap();

        assert_eq!(manifest["version"], "1.0");
        assert_eq!(manifest["artifacts"].as_array().unwrap().len(), 1);

        let asset = &manifest["artifacts"][0]["assets"][0];
        assert_eq!(asset["source"], "lambda.zip");
        assert_eq!(
            asset["staged"],
            format!("asset.{}.zip", asset["sha256"].as_str().unwrap())
        );
    }

    #[test]
    fn test_synth_fails_without_archive() {
        let dir = tempdir().unwrap();

        let mut app = App::with_dirs(dir.path(), dir.path().join("out"));
        app.add_stack(demo_stack());
        let err = app.synth().unwrap_err();

        assert!(matches!(err, SynthError::AssetNotFound { .. }));
    }
}
