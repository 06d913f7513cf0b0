use crate::document_info::document_info_for_version;
use crate::error::DocsError;
use crate::file_system::{FileSystem, LocalFileSystem};
use crate::filters::{AddResponseHeadersFilter, AuthResponsesOperationFilter, PropertyRule, ValidationRulesSchemaFilter};
use crate::swagger_gen::{ConfigureGen, SwaggerGenOptions};
use crate::versioning::ApiVersionDescriptionProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::openapi::Info;

/// Extension of the auxiliary documentation comment files picked up from the base path
pub const COMMENT_FILE_EXTENSION: &str = "xml";

/// Collaborators documentation configuration depends on. Built once at startup and handed to
/// [configure_documentation].
pub struct DocumentationServices {
    version_provider: Option<Arc<dyn ApiVersionDescriptionProvider>>,
    file_system: Arc<dyn FileSystem>,
    base_path: PathBuf,
    validation_rules: Vec<PropertyRule>,
    security_scheme: Option<String>,
}

impl DocumentationServices {
    /// Services reading comment files from `base_path` on the local disk. A version provider must
    /// still be registered before documentation can be configured.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        DocumentationServices {
            version_provider: None,
            file_system: Arc::new(LocalFileSystem),
            base_path: base_path.into(),
            validation_rules: Vec::new(),
            security_scheme: None,
        }
    }

    pub fn with_version_provider(mut self, provider: Arc<dyn ApiVersionDescriptionProvider>) -> Self {
        self.version_provider = Some(provider);
        self
    }

    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = file_system;
        self
    }

    /// Rules mirrored into schemas when validation rule integration is switched on
    pub fn with_validation_rules(mut self, rules: Vec<PropertyRule>) -> Self {
        self.validation_rules = rules;
        self
    }

    /// Security scheme protected operations are linked to
    pub fn with_security_scheme(mut self, scheme_name: impl Into<String>) -> Self {
        self.security_scheme = Some(scheme_name.into());
        self
    }

    pub fn version_provider(&self) -> Result<&dyn ApiVersionDescriptionProvider, DocsError> {
        self.version_provider
            .as_deref()
            .ok_or(DocsError::MissingCollaborator("API version description provider"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Builds the generator options for a versioned API: one document per discovered version, the
/// standard operation filters, optional validation rules and every comment file found in the
/// base path. `configuration` runs last so callers can adjust anything set up here.
pub fn configure_documentation(
    services: &DocumentationServices,
    info: &Info,
    use_validation_rules: bool,
    configuration: Option<ConfigureGen>,
) -> Result<SwaggerGenOptions, DocsError> {
    let provider = services.version_provider()?;
    let mut options = SwaggerGenOptions::default();
    options.describe_all_parameters_in_camel_case = true;
    options.describe_string_enums_in_camel_case = true;

    for description in provider.api_version_descriptions() {
        debug!(
            group = %description.group_name,
            version = %description.api_version,
            deprecated = description.is_deprecated,
            "registering API document"
        );
        options.swagger_doc(
            description.group_name.clone(),
            document_info_for_version(info, &description),
        );
    }

    options.operation_filter(AddResponseHeadersFilter::default());
    options.operation_filter(match services.security_scheme {
        Some(ref scheme) => AuthResponsesOperationFilter::with_security_scheme(scheme.clone()),
        None => AuthResponsesOperationFilter::default(),
    });

    if use_validation_rules {
        options.schema_filter(ValidationRulesSchemaFilter::new(services.validation_rules.clone()));
    }

    let mut comment_files = services
        .file_system
        .files_with_extension(&services.base_path, COMMENT_FILE_EXTENSION)
        .map_err(|source| DocsError::Filesystem {
            path: services.base_path.clone(),
            source,
        })?;
    comment_files.sort();
    for file in comment_files {
        options.include_xml_comments(file);
    }

    if let Some(configure) = configuration {
        configure(&mut options);
    }

    info!(
        documents = options.documents().count(),
        comment_files = options.xml_comment_files().len(),
        "configured API documentation"
    );
    Ok(options)
}
