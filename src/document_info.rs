use crate::versioning::ApiVersionDescription;
use utoipa::openapi::Info;

/// Appended to the description of every deprecated version's document
pub const DEPRECATION_NOTICE: &str = " This API version has been deprecated.";

/// Derives the document info for one API version from the caller's template. The template is
/// left untouched, so rebuilding for the same version always yields the same result.
pub fn document_info_for_version(template: &Info, description: &ApiVersionDescription) -> Info {
    let mut info = template.clone();
    info.version = description.api_version.to_string();

    if description.is_deprecated {
        let mut text = info.description.take().unwrap_or_default();
        text.push_str(DEPRECATION_NOTICE);
        info.description = Some(text);
    }

    info
}
