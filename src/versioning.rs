use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// A discovered API version such as `1.0` or `2.0-beta`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
    pub status: Option<String>,
}

impl ApiVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        ApiVersion {
            major,
            minor,
            status: None,
        }
    }

    /// Marks the version with a pre-release status, rendered as `major.minor-status`
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

impl Display for ApiVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(ref status) = self.status {
            write!(f, "-{status}")?;
        }
        Ok(())
    }
}

/// Describes one API version the service exposes. The group name doubles as the key of the
/// OpenAPI document generated for that version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionDescription {
    pub api_version: ApiVersion,
    pub group_name: String,
    pub is_deprecated: bool,
}

impl ApiVersionDescription {
    pub fn new(api_version: ApiVersion, group_name: impl Into<String>, is_deprecated: bool) -> Self {
        ApiVersionDescription {
            api_version,
            group_name: group_name.into(),
            is_deprecated,
        }
    }
}

/// Discovers the API versions a service exposes. Implementations must be re-enumerable: every
/// call yields the same versions in the same (discovery) order.
pub trait ApiVersionDescriptionProvider: Send + Sync {
    fn api_version_descriptions(&self) -> Vec<ApiVersionDescription>;
}

impl<T: ApiVersionDescriptionProvider + ?Sized> ApiVersionDescriptionProvider for Arc<T> {
    fn api_version_descriptions(&self) -> Vec<ApiVersionDescription> {
        (**self).api_version_descriptions()
    }
}

/// Version provider backed by a fixed list, for services that declare their versions up front
#[derive(Debug, Clone, Default)]
pub struct StaticApiVersions(Vec<ApiVersionDescription>);

impl StaticApiVersions {
    pub fn new(descriptions: Vec<ApiVersionDescription>) -> Self {
        StaticApiVersions(descriptions)
    }
}

impl ApiVersionDescriptionProvider for StaticApiVersions {
    fn api_version_descriptions(&self) -> Vec<ApiVersionDescription> {
        self.0.clone()
    }
}
