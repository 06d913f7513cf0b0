use crate::versioning::ApiVersionDescriptionProvider;
use std::collections::HashSet;
use tracing::debug;

/// Hook for callers that need to customize the UI beyond the standard setup
pub type ConfigureUi = Box<dyn FnOnce(&mut SwaggerUiOptions)>;

/// One entry of the UI's document selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwaggerEndpoint {
    pub url: String,
    pub label: String,
}

/// Settings for the interactive documentation UI
#[derive(Debug, Clone)]
pub struct SwaggerUiOptions {
    /// Path segment the UI is served under. Empty serves it from the site root.
    pub route_prefix: String,
    pub deep_linking: bool,
    pub display_request_duration: bool,
    pub filter: bool,
    endpoints: Vec<SwaggerEndpoint>,
}

impl Default for SwaggerUiOptions {
    fn default() -> Self {
        SwaggerUiOptions {
            route_prefix: "swagger".to_owned(),
            deep_linking: false,
            display_request_duration: false,
            filter: false,
            endpoints: Vec::new(),
        }
    }
}

impl SwaggerUiOptions {
    pub fn swagger_endpoint(&mut self, url: impl Into<String>, label: impl Into<String>) {
        self.endpoints.push(SwaggerEndpoint {
            url: url.into(),
            label: label.into(),
        });
    }

    pub fn endpoints(&self) -> &[SwaggerEndpoint] {
        &self.endpoints
    }
}

/// URL of a version group's document, relative to the UI page
pub fn document_url(group_name: &str) -> String {
    format!("./swagger/{group_name}/swagger.json")
}

/// Builds the UI settings for a versioned API: one selector entry per version group, in
/// discovery order, with the UI served from the site root. `configuration` runs last.
pub fn publish_documentation(
    provider: &dyn ApiVersionDescriptionProvider,
    configuration: Option<ConfigureUi>,
) -> SwaggerUiOptions {
    let mut options = SwaggerUiOptions::default();
    let mut seen_groups = HashSet::new();

    for description in provider.api_version_descriptions() {
        if !seen_groups.insert(description.group_name.clone()) {
            continue;
        }
        options.swagger_endpoint(
            document_url(&description.group_name),
            description.group_name.to_uppercase(),
        );
        options.route_prefix = String::new();
    }

    if let Some(configure) = configuration {
        configure(&mut options);
    }

    debug!(endpoints = options.endpoints.len(), prefix = %options.route_prefix, "published documentation UI");
    options
}
