use super::{OperationContext, OperationFilter};
use crate::explorer::ResponseHeaderDeclaration;
use utoipa::openapi::header::{Header, HeaderBuilder};
use utoipa::openapi::path::Operation;
use utoipa::openapi::schema::{ObjectBuilder, Schema};
use utoipa::openapi::RefOr;

/// Header every response carries so calls can be traced across services
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// Documents response headers on every response an operation already declares: the standard
/// headers this filter was built with plus the headers declared on the action itself.
pub struct AddResponseHeadersFilter {
    standard_headers: Vec<ResponseHeaderDeclaration>,
}

impl AddResponseHeadersFilter {
    pub fn new(standard_headers: Vec<ResponseHeaderDeclaration>) -> Self {
        AddResponseHeadersFilter { standard_headers }
    }
}

impl Default for AddResponseHeadersFilter {
    fn default() -> Self {
        Self::new(vec![ResponseHeaderDeclaration::new(
            CORRELATION_ID_HEADER,
            "Identifier correlating this response with the originating request",
        )])
    }
}

fn to_header(declaration: &ResponseHeaderDeclaration) -> Header {
    let schema = Schema::Object(ObjectBuilder::new().schema_type(declaration.schema_type.clone()).build());
    HeaderBuilder::new()
        .schema(RefOr::T(schema))
        .description(declaration.description.clone())
        .build()
}

impl OperationFilter for AddResponseHeadersFilter {
    fn apply(&self, operation: &mut Operation, context: &OperationContext<'_>) {
        let declarations = self
            .standard_headers
            .iter()
            .chain(context.metadata.response_headers.iter());

        for declaration in declarations {
            for (status, response) in operation.responses.responses.iter_mut() {
                // Shared component responses are documented where they are defined
                let RefOr::T(response) = response else {
                    continue;
                };
                if !declaration.applies_to(status) || response.headers.contains_key(&declaration.name) {
                    continue;
                }
                response
                    .headers
                    .insert(declaration.name.clone(), to_header(declaration));
            }
        }
    }
}
