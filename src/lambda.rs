use derive_builder::Builder;
use serde_json::{json, Value};

use crate::asset::{Code, CodeAsset};
use crate::error::Result;
use crate::stack::Stack;

/// Execution environment of a function. The merkle info handler ships as a
/// custom runtime bootstrap, so only the provided runtimes are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    /// Custom runtime on Amazon Linux.
    Provided,
    /// Custom runtime on Amazon Linux 2.
    ProvidedAl2,
}

impl Runtime {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Provided => "provided",
            Self::ProvidedAl2 => "provided.al2",
        }
    }
}

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct FunctionProps {
    pub runtime: Runtime,
    pub code: Code,

    /// Entry-point symbol inside the archive. Custom runtimes ignore it
    /// unless the bootstrap actually maps the symbol to something.
    pub handler: String,

    #[builder(default)]
    pub memory_size: Option<u32>,

    #[builder(default)]
    pub timeout_secs: Option<u32>,
}

/// A managed function executing a packaged archive on invocation.
///
/// Registers one `AWS::Lambda::Function` whose code location and execution
/// role are deploy-time parameters; the archive itself is staged next to the
/// template during synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    logical_id: String,
}

impl Function {
    pub fn new(stack: &mut Stack, id: &str, props: FunctionProps) -> Result<Self> {
        let logical_id = stack.logical_id(id);
        let bucket_parameter = format!("{}CodeS3Bucket", logical_id);
        let key_parameter = format!("{}CodeS3Key", logical_id);
        let role_parameter = format!("{}Role", logical_id);

        let mut properties = json!({
            "Runtime": props.runtime.id(),
            "Handler": props.handler,
            "Role": { "Ref": role_parameter },
            "Code": {
                "S3Bucket": { "Ref": bucket_parameter },
                "S3Key": { "Ref": key_parameter },
            },
        });
        if let Some(memory) = props.memory_size {
            properties["MemorySize"] = json!(memory);
        }
        if let Some(timeout) = props.timeout_secs {
            properties["Timeout"] = json!(timeout);
        }

        let logical_id = stack.add_resource(id, "AWS::Lambda::Function", properties)?;

        stack.add_parameter(
            &bucket_parameter,
            format!("S3 bucket holding the code archive for {}", id),
        );
        stack.add_parameter(
            &key_parameter,
            format!("S3 key of the code archive for {}", id),
        );
        stack.add_parameter(&role_parameter, format!("Execution role ARN for {}", id));

        stack.add_asset(CodeAsset {
            source: props.code.path().to_path_buf(),
            bucket_parameter,
            key_parameter,
        });

        Ok(Self { logical_id })
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Deploy-time ARN of the function.
    pub fn arn(&self) -> Value {
        json!({ "Fn::GetAtt": [self.logical_id, "Arn"] })
    }
}
