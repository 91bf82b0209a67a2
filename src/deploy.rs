//! The merkle info service deployment: one custom-runtime function behind a
//! REST API exposing `GET /merkleinfos`.

use anyhow::Result;

use crate::apigateway::{HttpMethod, LambdaIntegration, RestApi, RestApiPropsBuilder};
use crate::asset::Code;
use crate::lambda::{Function, FunctionPropsBuilder, Runtime};
use crate::stack::{Stack, StackProps};

/// Fixed deployment target for the merkle info service.
pub const ACCOUNT: &str = "826607129737";
pub const REGION: &str = "eu-west-3";

/// Prebuilt archive the handler ships in, relative to the app root.
pub const CODE_ASSET: &str = "lambda.zip";

/// Declare the service stack: the function, the API, and the single route
/// binding them together.
pub fn merkle_deploy_stack(id: &str, props: StackProps) -> Result<Stack> {
    let mut stack = Stack::new(id, props);

    let handler = Function::new(
        &mut stack,
        "MerkleInfosHandler",
        FunctionPropsBuilder::default()
            .runtime(Runtime::Provided)
            .code(Code::from_asset(CODE_ASSET))
            // The bootstrap inside the archive decides what actually runs;
            // any non-empty symbol satisfies the resource schema.
            .handler("hello")
            .build()?,
    )?;

    let api = RestApi::new(
        &mut stack,
        "MerkleInfosApi",
        RestApiPropsBuilder::default()
            .rest_api_name("MerkleInfosService")
            .build()?,
    )?;

    let merkle_infos = api.root().add_resource(&mut stack, "merkleinfos")?;
    merkle_infos.add_method(&mut stack, HttpMethod::Get, LambdaIntegration::new(&handler))?;

    Ok(stack)
}
