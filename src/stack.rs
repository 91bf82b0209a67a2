use derive_builder::Builder;
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::asset::CodeAsset;
use crate::error::{Result, SynthError};

/// Target account/region pair a stack is bound to at synthesis time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub account: String,
    pub region: String,
}

impl Environment {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aws://{}/{}", self.account, self.region)
    }
}

#[derive(Builder, Debug, Default, Clone)]
#[builder(setter(into, strip_option), default)]
pub struct StackProps {
    pub env: Option<Environment>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CfnResource {
    #[serde(rename = "Type")]
    pub kind: String,

    #[serde(rename = "Properties")]
    pub properties: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CfnParameter {
    #[serde(rename = "Type")]
    pub kind: String,

    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named, deployable unit of declared resources.
///
/// Constructs register themselves under a unique logical ID; `to_template`
/// renders the whole set as a CloudFormation template. Maps are ordered so
/// that rendering is deterministic.
#[derive(Debug)]
pub struct Stack {
    name: String,
    env: Option<Environment>,
    description: Option<String>,
    parameters: BTreeMap<String, CfnParameter>,
    resources: BTreeMap<String, CfnResource>,
    assets: Vec<CodeAsset>,
}

impl Stack {
    pub fn new(name: impl Into<String>, props: StackProps) -> Self {
        Self {
            name: name.into(),
            env: props.env,
            description: props.description,
            parameters: BTreeMap::new(),
            resources: BTreeMap::new(),
            assets: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> Option<&Environment> {
        self.env.as_ref()
    }

    /// Logical ID for a construct path: the path stripped to alphanumerics,
    /// plus a short hash of the full path so nested constructs with similar
    /// names cannot collide.
    pub fn logical_id(&self, path: &str) -> String {
        let prefix: String = path.chars().filter(char::is_ascii_alphanumeric).collect();
        let digest = Sha256::digest(format!("{}/{}", self.name, path));
        let suffix: String = digest.iter().take(4).map(|b| format!("{:02X}", b)).collect();
        format!("{}{}", prefix, suffix)
    }

    pub(crate) fn contains(&self, logical_id: &str) -> bool {
        self.resources.contains_key(logical_id)
    }

    pub(crate) fn add_resource(
        &mut self,
        path: &str,
        kind: &str,
        properties: Value,
    ) -> Result<String> {
        let logical_id = self.logical_id(path);
        if self.resources.contains_key(&logical_id) {
            return Err(SynthError::DuplicateId {
                stack: self.name.clone(),
                id: path.to_string(),
            });
        }
        self.resources.insert(
            logical_id.clone(),
            CfnResource {
                kind: kind.to_string(),
                properties,
            },
        );
        Ok(logical_id)
    }

    pub(crate) fn add_parameter(&mut self, name: impl Into<String>, description: impl Into<String>) {
        self.parameters.insert(
            name.into(),
            CfnParameter {
                kind: "String".to_string(),
                description: Some(description.into()),
            },
        );
    }

    pub(crate) fn add_asset(&mut self, asset: CodeAsset) {
        self.assets.push(asset);
    }

    pub(crate) fn assets(&self) -> &[CodeAsset] {
        &self.assets
    }

    /// Render the stack as a CloudFormation template.
    pub fn to_template(&self) -> Value {
        let mut template = serde_json::Map::new();
        template.insert("AWSTemplateFormatVersion".into(), json!("2010-09-09"));
        if let Some(description) = &self.description {
            template.insert("Description".into(), json!(description));
        }
        if !self.parameters.is_empty() {
            template.insert("Parameters".into(), json!(self.parameters));
        }
        template.insert("Resources".into(), json!(self.resources));
        Value::Object(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_logical_id_deterministic() {
        let stack = Stack::new("TestStack", StackProps::default());
        assert_eq!(stack.logical_id("MyApi"), stack.logical_id("MyApi"));
        assert!(stack.logical_id("MyApi").starts_with("MyApi"));
        assert_eq!(stack.logical_id("MyApi").len(), "MyApi".len() + 8);
    }

    #[test]
    fn test_logical_id_depends_on_stack_and_path() {
        let a = Stack::new("StackA", StackProps::default());
        let b = Stack::new("StackB", StackProps::default());
        assert_ne!(a.logical_id("MyApi"), b.logical_id("MyApi"));
        assert_ne!(a.logical_id("MyApi/infos"), a.logical_id("MyApiinfos"));
    }

    #[test]
    fn test_duplicate_construct_id_rejected() {
        let mut stack = Stack::new("TestStack", StackProps::default());
        stack
            .add_resource("Thing", "AWS::SNS::Topic", json!({}))
            .unwrap();

        let err = stack
            .add_resource("Thing", "AWS::SNS::Topic", json!({}))
            .unwrap_err();

        assert!(matches!(err, SynthError::DuplicateId { .. }));
    }

    #[test]
    fn test_template_skeleton() {
        let mut stack = Stack::new(
            "TestStack",
            StackPropsBuilder::default()
                .description("A test stack")
                .build()
                .unwrap(),
        );
        let id = stack
            .add_resource("Thing", "AWS::SNS::Topic", json!({ "TopicName": "t" }))
            .unwrap();

        let template = stack.to_template();

        assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(template["Description"], "A test stack");
        assert_eq!(template["Resources"][&id]["Type"], "AWS::SNS::Topic");
        assert_eq!(template["Resources"][&id]["Properties"]["TopicName"], "t");
        // No parameters registered, so the section is omitted entirely.
        assert_eq!(template.get("Parameters"), None);
    }

    #[test]
    fn test_environment_display() {
        let env = Environment::new("123456789012", "eu-west-3");
        assert_eq!(env.to_string(), "aws://123456789012/eu-west-3");
    }
}
