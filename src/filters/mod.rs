//! Hooks the generator runs over every operation and every component schema of a document.
//! Filters only fill in what is missing; anything the handler already documented wins.

use crate::explorer::ActionMetadata;
use utoipa::openapi::path::{Operation, PathItemType};
use utoipa::openapi::schema::Schema;

pub mod auth_responses;
pub mod response_headers;
pub mod validation_rules;

pub use auth_responses::AuthResponsesOperationFilter;
pub use response_headers::AddResponseHeadersFilter;
pub use validation_rules::{PropertyRule, Rule, ValidationRulesSchemaFilter};

/// Everything known about the action behind an operation while it is being filtered
pub struct OperationContext<'a> {
    pub document_name: &'a str,
    pub path: &'a str,
    pub method: &'a PathItemType,
    pub metadata: &'a ActionMetadata,
}

/// Augments a generated operation in place
pub trait OperationFilter: Send + Sync {
    fn apply(&self, operation: &mut Operation, context: &OperationContext<'_>);
}

impl<F> OperationFilter for F
where
    F: Fn(&mut Operation, &OperationContext<'_>) + Send + Sync,
{
    fn apply(&self, operation: &mut Operation, context: &OperationContext<'_>) {
        self(operation, context)
    }
}

/// Augments a named component schema in place
pub trait SchemaFilter: Send + Sync {
    fn apply(&self, schema_name: &str, schema: &mut Schema);
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use utoipa::openapi::path::OperationBuilder;
    use utoipa::openapi::{ResponseBuilder, ResponsesBuilder};

    /// Builds an operation documenting the given (status, description) responses
    pub fn operation_with_responses(responses: &[(&str, &str)]) -> Operation {
        let responses = responses
            .iter()
            .fold(ResponsesBuilder::new(), |builder, (status, description)| {
                builder.response(*status, ResponseBuilder::new().description(*description).build())
            })
            .build();

        OperationBuilder::new().responses(responses).build()
    }

    pub fn context<'a>(metadata: &'a ActionMetadata) -> OperationContext<'a> {
        OperationContext {
            document_name: "v1",
            path: "/v1/widgets",
            method: &PathItemType::Get,
            metadata,
        }
    }
}
