use super::{OperationContext, OperationFilter};
use utoipa::openapi::path::Operation;
use utoipa::openapi::security::SecurityRequirement;
use utoipa::openapi::ResponseBuilder;

/// Documents the 401 and 403 responses of actions that require an authenticated caller.
/// Optionally links those operations to a named security scheme as well.
#[derive(Default)]
pub struct AuthResponsesOperationFilter {
    security_scheme: Option<String>,
}

impl AuthResponsesOperationFilter {
    /// Also attaches a requirement on `scheme_name` (listing the action's policies as scopes) to
    /// protected operations that do not declare security themselves
    pub fn with_security_scheme(scheme_name: impl Into<String>) -> Self {
        AuthResponsesOperationFilter {
            security_scheme: Some(scheme_name.into()),
        }
    }
}

impl OperationFilter for AuthResponsesOperationFilter {
    fn apply(&self, operation: &mut Operation, context: &OperationContext<'_>) {
        let Some(ref requirement) = context.metadata.authorization else {
            return;
        };
        if requirement.allow_anonymous {
            return;
        }

        let responses = &mut operation.responses.responses;
        responses
            .entry("401".to_owned())
            .or_insert_with(|| ResponseBuilder::new().description("Unauthorized").build().into());
        responses
            .entry("403".to_owned())
            .or_insert_with(|| ResponseBuilder::new().description("Forbidden").build().into());

        if let Some(ref scheme) = self.security_scheme {
            operation
                .security
                .get_or_insert_with(|| vec![SecurityRequirement::new(scheme.clone(), requirement.policies.clone())]);
        }
    }
}
