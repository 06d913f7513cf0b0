use super::greetings::{GreetingsV1Api, GreetingsV2Api};
use crate::configure::{configure_documentation, DocumentationServices};
use crate::dto;
use crate::error::DocsError;
use crate::explorer::{ActionMetadata, ApiExplorer, AuthorizationRequirement, ResponseHeaderDeclaration};
use crate::routes;
use crate::swagger_gen::SwaggerGenerator;
use crate::swagger_ui::{publish_documentation, SwaggerUiOptions};
use crate::versioning::{ApiVersion, ApiVersionDescription, StaticApiVersions};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use utoipa::openapi::path::PathItemType;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Greeting API",
        description = "A sample versioned greeting API written in Rust"
    )
)]
struct GreetingApi;

/// Name of the security scheme protected operations are documented with
pub const BEARER_SCHEME: &str = "bearer_auth";

/// Registers the bearer token scheme on documents with protected operations
pub(super) struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Versions of the greetings API, oldest first
pub fn api_versions() -> StaticApiVersions {
    StaticApiVersions::new(vec![
        ApiVersionDescription::new(ApiVersion::new(1, 0), "v1", true),
        ApiVersionDescription::new(ApiVersion::new(2, 0), "v2", false),
    ])
}

/// Operations of every version along with the metadata of the handlers behind them
pub fn api_explorer() -> ApiExplorer {
    ApiExplorer::new()
        .group("v1", GreetingsV1Api::openapi())
        .group("v2", GreetingsV2Api::openapi())
        .action(
            "/v1/greetings/{Name}",
            PathItemType::Get,
            ActionMetadata::default().with_response_header(ResponseHeaderDeclaration::new(
                "Deprecation",
                "Present because this API version is deprecated",
            )),
        )
        .action(
            "/v2/greetings",
            PathItemType::Post,
            ActionMetadata::authorized(AuthorizationRequirement::with_policies(["greetings:write"]))
                .with_response_header(
                    ResponseHeaderDeclaration::new("Location", "Where the composed greeting can be fetched")
                        .for_statuses([201]),
                ),
        )
}

/// Constructs the routes serving one OpenAPI document per API version plus the Swagger UI that
/// renders them. Fails if the documentation comment files cannot be listed from [base_path].
pub fn build_documentation(base_path: PathBuf) -> Result<Router, DocsError> {
    let versions = Arc::new(api_versions());
    let services = DocumentationServices::new(base_path)
        .with_version_provider(versions.clone())
        .with_validation_rules(dto::validation_rules())
        .with_security_scheme(BEARER_SCHEME);

    let options = configure_documentation(&services, &GreetingApi::openapi().info, true, None)?;
    let documents = SwaggerGenerator::new(options, api_explorer()).generate_all()?;

    let ui = publish_documentation(
        versions.as_ref(),
        Some(Box::new(|ui: &mut SwaggerUiOptions| {
            ui.deep_linking = true;
            ui.display_request_duration = true;
        })),
    );

    Ok(routes::docs_router(documents, &ui))
}
