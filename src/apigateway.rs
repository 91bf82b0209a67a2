use derive_builder::Builder;
use serde_json::{json, Value};

use crate::error::{Result, SynthError};
use crate::lambda::Function;
use crate::stack::Stack;

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct RestApiProps {
    pub rest_api_name: String,

    #[builder(default)]
    pub description: Option<String>,
}

/// A managed HTTP front door routing requests to backing compute.
#[derive(Debug, Clone)]
pub struct RestApi {
    logical_id: String,
    path: String,
}

impl RestApi {
    pub fn new(stack: &mut Stack, id: &str, props: RestApiProps) -> Result<Self> {
        let mut properties = json!({ "Name": props.rest_api_name });
        if let Some(description) = props.description {
            properties["Description"] = json!(description);
        }
        let logical_id = stack.add_resource(id, "AWS::ApiGateway::RestApi", properties)?;
        Ok(Self {
            logical_id,
            path: id.to_string(),
        })
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// The API's root resource, to hang child path segments off.
    pub fn root(&self) -> ApiResource {
        ApiResource {
            api_logical_id: self.logical_id.clone(),
            reference: json!({ "Fn::GetAtt": [self.logical_id, "RootResourceId"] }),
            path: self.path.clone(),
        }
    }
}

/// One path segment of an API, the root included.
#[derive(Debug, Clone)]
pub struct ApiResource {
    api_logical_id: String,
    // Ref (child) or Fn::GetAtt (root), usable as ParentId/ResourceId.
    reference: Value,
    path: String,
}

impl ApiResource {
    /// Register a child path segment directly under this resource.
    pub fn add_resource(&self, stack: &mut Stack, path_part: &str) -> Result<Self> {
        let valid = !path_part.is_empty()
            && path_part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(SynthError::InvalidPathPart(path_part.to_string()));
        }

        let path = format!("{}/{}", self.path, path_part);
        let logical_id = stack.add_resource(
            &path,
            "AWS::ApiGateway::Resource",
            json!({
                "RestApiId": { "Ref": self.api_logical_id },
                "ParentId": self.reference,
                "PathPart": path_part,
            }),
        )?;

        Ok(Self {
            api_logical_id: self.api_logical_id.clone(),
            reference: json!({ "Ref": logical_id }),
            path,
        })
    }

    /// Attach an HTTP method to this resource, backed by the integration.
    pub fn add_method(
        &self,
        stack: &mut Stack,
        method: HttpMethod,
        integration: LambdaIntegration,
    ) -> Result<Method> {
        let path = format!("{}/{}", self.path, method.as_str());
        if stack.contains(&stack.logical_id(&path)) {
            return Err(SynthError::DuplicateMethod {
                path: self.path.clone(),
                method: method.as_str(),
            });
        }

        let logical_id = stack.add_resource(
            &path,
            "AWS::ApiGateway::Method",
            json!({
                "HttpMethod": method.as_str(),
                "AuthorizationType": "NONE",
                "RestApiId": { "Ref": self.api_logical_id },
                "ResourceId": self.reference,
                "Integration": {
                    "Type": "AWS_PROXY",
                    "IntegrationHttpMethod": "POST",
                    "Uri": integration.uri,
                },
            }),
        )?;

        Ok(Method { logical_id })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Any,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Any => "ANY",
        }
    }
}

/// Proxy integration forwarding the incoming request to a function.
#[derive(Debug, Clone)]
pub struct LambdaIntegration {
    uri: Value,
}

impl LambdaIntegration {
    pub fn new(function: &Function) -> Self {
        // Invocation URI per the API Gateway service integration format.
        Self {
            uri: json!({
                "Fn::Join": ["", [
                    "arn:aws:apigateway:",
                    { "Ref": "AWS::Region" },
                    ":lambda:path/2015-03-31/functions/",
                    function.arn(),
                    "/invocations",
                ]]
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    logical_id: String,
}

impl Method {
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }
}
