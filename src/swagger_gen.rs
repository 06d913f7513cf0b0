//! Document generation: turns the registered documents and filters plus the application's API
//! surface into finished OpenAPI documents, one per API version group.

use crate::error::DocsError;
use crate::explorer::{ActionMetadata, ApiExplorer};
use crate::filters::{OperationContext, OperationFilter, SchemaFilter};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::mem;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use utoipa::openapi::path::{Parameter, PathItem};
use utoipa::openapi::schema::Schema;
use utoipa::openapi::{Content, Info, OpenApi, OpenApiBuilder, RefOr};

/// Hook for callers that need to customize generation beyond the standard setup
pub type ConfigureGen = Box<dyn FnOnce(&mut SwaggerGenOptions)>;

/// Everything the generator needs to know about which documents to produce and how
#[derive(Default)]
pub struct SwaggerGenOptions {
    documents: IndexMap<String, Info>,
    operation_filters: Vec<Box<dyn OperationFilter>>,
    schema_filters: Vec<Box<dyn SchemaFilter>>,
    xml_comment_files: Vec<PathBuf>,
    /// Lower-cases the first letter of every parameter name, path templates included
    pub describe_all_parameters_in_camel_case: bool,
    /// Lower-cases the first letter of every string enum value, in component schemas and in
    /// schemas declared inline on parameters, request bodies and responses
    pub describe_string_enums_in_camel_case: bool,
}

impl SwaggerGenOptions {
    /// Registers a document. Registering a name twice replaces its info but keeps its position.
    pub fn swagger_doc(&mut self, name: impl Into<String>, info: Info) {
        self.documents.insert(name.into(), info);
    }

    pub fn operation_filter(&mut self, filter: impl OperationFilter + 'static) {
        self.operation_filters.push(Box::new(filter));
    }

    pub fn schema_filter(&mut self, filter: impl SchemaFilter + 'static) {
        self.schema_filters.push(Box::new(filter));
    }

    pub fn include_xml_comments(&mut self, path: impl Into<PathBuf>) {
        self.xml_comment_files.push(path.into());
    }

    pub fn document(&self, name: &str) -> Option<&Info> {
        self.documents.get(name)
    }

    /// Registered documents in registration order
    pub fn documents(&self) -> impl Iterator<Item = (&str, &Info)> {
        self.documents.iter().map(|(name, info)| (name.as_str(), info))
    }

    pub fn xml_comment_files(&self) -> &[PathBuf] {
        &self.xml_comment_files
    }

    pub fn operation_filter_count(&self) -> usize {
        self.operation_filters.len()
    }

    pub fn schema_filter_count(&self) -> usize {
        self.schema_filters.len()
    }
}

/// Generated documents keyed by document name, in registration order
#[derive(Default, Clone)]
pub struct DocumentSet(IndexMap<String, OpenApi>);

impl DocumentSet {
    pub fn get(&self, name: &str) -> Option<&OpenApi> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct SwaggerGenerator {
    options: SwaggerGenOptions,
    explorer: ApiExplorer,
}

impl SwaggerGenerator {
    pub fn new(options: SwaggerGenOptions, explorer: ApiExplorer) -> Self {
        SwaggerGenerator { options, explorer }
    }

    pub fn options(&self) -> &SwaggerGenOptions {
        &self.options
    }

    /// Produces the document registered under `name`
    pub fn generate(&self, name: &str) -> Result<OpenApi, DocsError> {
        let info = self
            .options
            .document(name)
            .ok_or_else(|| DocsError::UnknownDocument(name.to_owned()))?;

        let mut api = self
            .explorer
            .api_for_group(name)
            .cloned()
            .unwrap_or_else(|| OpenApiBuilder::new().build());
        api.info = info.clone();

        self.apply_operation_filters(name, &mut api);

        if self.options.describe_all_parameters_in_camel_case {
            camel_case_parameters(&mut api);
        }
        if self.options.describe_string_enums_in_camel_case {
            camel_case_operation_enums(&mut api);
        }

        if let Some(ref mut components) = api.components {
            for (schema_name, schema) in components.schemas.iter_mut() {
                let RefOr::T(schema) = schema else {
                    continue;
                };
                if self.options.describe_string_enums_in_camel_case {
                    camel_case_enum_values(schema);
                }
                for filter in &self.options.schema_filters {
                    filter.apply(schema_name, schema);
                }
            }
        }

        debug!(
            document = name,
            paths = api.paths.paths.len(),
            comment_files = self.options.xml_comment_files.len(),
            "generated API document"
        );
        Ok(api)
    }

    /// Produces every registered document
    pub fn generate_all(&self) -> Result<DocumentSet, DocsError> {
        let mut documents = IndexMap::with_capacity(self.options.documents.len());
        for name in self.options.documents.keys() {
            documents.insert(name.clone(), self.generate(name)?);
        }

        info!(count = documents.len(), "generated API documentation");
        Ok(DocumentSet(documents))
    }

    fn apply_operation_filters(&self, document_name: &str, api: &mut OpenApi) {
        let no_metadata = ActionMetadata::default();
        for (path, item) in api.paths.paths.iter_mut() {
            for (method, operation) in item.operations.iter_mut() {
                let metadata = self.explorer.metadata_for(path, method).unwrap_or(&no_metadata);
                let context = OperationContext {
                    document_name,
                    path,
                    method,
                    metadata,
                };
                for filter in &self.options.operation_filters {
                    filter.apply(operation, &context);
                }
            }
        }
    }
}

fn camel_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rewrites `{Parameter}` segments of a path template so they match renamed parameters
fn camel_case_path_template(path: &str) -> String {
    let mut rewritten = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        rewritten.push_str(&rest[..=open]);
        rewritten.push_str(&camel_case(&rest[open + 1..open + close]));
        rest = &rest[open + close..];
    }
    rewritten.push_str(rest);
    rewritten
}

fn camel_case_parameter_names(parameters: &mut Option<Vec<Parameter>>) {
    for parameter in parameters.iter_mut().flatten() {
        parameter.name = camel_case(&parameter.name);
    }
}

/// Folds `other` into `item`. Operations and parameters already on `item` win.
fn merge_path_items(path: &str, item: &mut PathItem, other: PathItem) {
    for (method, operation) in other.operations {
        match item.operations.entry(method) {
            Entry::Vacant(slot) => {
                slot.insert(operation);
            }
            Entry::Occupied(_) => {
                warn!(path, "dropping operation whose path template collides after camel casing")
            }
        }
    }

    for parameter in other.parameters.into_iter().flatten() {
        let parameters = item.parameters.get_or_insert_with(Vec::new);
        if !parameters.iter().any(|existing| existing.name == parameter.name) {
            parameters.push(parameter);
        }
    }
}

fn camel_case_parameters(api: &mut OpenApi) {
    let mut renamed: BTreeMap<String, PathItem> = BTreeMap::new();
    for (path, mut item) in mem::take(&mut api.paths.paths) {
        camel_case_parameter_names(&mut item.parameters);
        for operation in item.operations.values_mut() {
            camel_case_parameter_names(&mut operation.parameters);
        }

        let path = camel_case_path_template(&path);
        match renamed.get_mut(&path) {
            Some(existing) => merge_path_items(&path, existing, item),
            None => {
                renamed.insert(path, item);
            }
        }
    }
    api.paths.paths = renamed;
}

fn camel_case_content_enums<'a>(content: impl IntoIterator<Item = (&'a String, &'a mut Content)>) {
    for (_, media) in content {
        camel_case_nested(&mut media.schema);
    }
}

fn camel_case_parameter_enums(parameters: &mut Option<Vec<Parameter>>) {
    for parameter in parameters.iter_mut().flatten() {
        if let Some(ref mut schema) = parameter.schema {
            camel_case_nested(schema);
        }
    }
}

/// Camel-cases enum values of schemas declared inline on operations rather than as components
fn camel_case_operation_enums(api: &mut OpenApi) {
    for item in api.paths.paths.values_mut() {
        camel_case_parameter_enums(&mut item.parameters);
        for operation in item.operations.values_mut() {
            camel_case_parameter_enums(&mut operation.parameters);
            if let Some(ref mut body) = operation.request_body {
                camel_case_content_enums(&mut body.content);
            }
            for response in operation.responses.responses.values_mut() {
                if let RefOr::T(response) = response {
                    camel_case_content_enums(&mut response.content);
                }
            }
        }
    }
}

fn camel_case_enum_values(schema: &mut Schema) {
    match schema {
        Schema::Object(object) => {
            for value in object.enum_values.iter_mut().flatten() {
                if let Value::String(text) = value {
                    *text = camel_case(text);
                }
            }
            for property in object.properties.values_mut() {
                if let RefOr::T(property) = property {
                    camel_case_enum_values(property);
                }
            }
        }
        Schema::Array(array) => {
            if let RefOr::T(ref mut items) = *array.items {
                camel_case_enum_values(items);
            }
        }
        Schema::OneOf(one_of) => one_of.items.iter_mut().for_each(camel_case_nested),
        Schema::AllOf(all_of) => all_of.items.iter_mut().for_each(camel_case_nested),
        Schema::AnyOf(any_of) => any_of.items.iter_mut().for_each(camel_case_nested),
        _ => {}
    }
}

fn camel_case_nested(schema: &mut RefOr<Schema>) {
    if let RefOr::T(schema) = schema {
        camel_case_enum_values(schema);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::{AuthorizationRequirement, ResponseHeaderDeclaration};
    use crate::filters::{AddResponseHeadersFilter, AuthResponsesOperationFilter};
    use serde_json::json;
    use speculoos::prelude::*;
    use utoipa::openapi::path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItemType};
    use utoipa::openapi::schema::{ObjectBuilder, SchemaType};
    use utoipa::openapi::request_body::RequestBodyBuilder;
    use utoipa::openapi::{ComponentsBuilder, ContentBuilder, PathsBuilder, ResponseBuilder};

    fn widget_api() -> OpenApi {
        let get_widget = OperationBuilder::new()
            .operation_id(Some("get_widget"))
            .parameter(
                ParameterBuilder::new()
                    .name("WidgetId")
                    .parameter_in(ParameterIn::Path)
                    .build(),
            )
            .response("200", ResponseBuilder::new().description("The widget").build())
            .build();
        let list_widgets = OperationBuilder::new()
            .operation_id(Some("list_widgets"))
            .response("200", ResponseBuilder::new().description("All widgets").build())
            .build();

        OpenApiBuilder::new()
            .paths(
                PathsBuilder::new()
                    .path("/v1/widgets/{WidgetId}", PathItem::new(PathItemType::Get, get_widget))
                    .path("/v1/widgets", PathItem::new(PathItemType::Get, list_widgets))
                    .build(),
            )
            .components(Some(
                ComponentsBuilder::new()
                    .schema(
                        "WidgetStatus",
                        Schema::Object(
                            ObjectBuilder::new()
                                .schema_type(SchemaType::String)
                                .enum_values(Some(["Active", "Retired"]))
                                .build(),
                        ),
                    )
                    .build(),
            ))
            .build()
    }

    fn options() -> SwaggerGenOptions {
        let mut options = SwaggerGenOptions::default();
        options.swagger_doc("v1", Info::new("Widgets", "1.0"));
        options.swagger_doc("v2", Info::new("Widgets", "2.0"));
        options
    }

    mod generate {
        use super::*;

        #[test]
        fn unknown_document_is_an_error() {
            let generator = SwaggerGenerator::new(options(), ApiExplorer::new());

            let result = generator.generate("v9");

            assert!(matches!(result, Err(DocsError::UnknownDocument(ref name)) if name == "v9"));
        }

        #[test]
        fn uses_registered_info() {
            let generator = SwaggerGenerator::new(options(), ApiExplorer::new().group("v1", widget_api()));

            let api = generator.generate("v1").expect("document should generate");

            assert_that!(api.info.version).is_equal_to("1.0".to_owned());
            assert_that!(api.paths.paths.len()).is_equal_to(2);
        }

        #[test]
        fn document_without_operations_is_empty() {
            let generator = SwaggerGenerator::new(options(), ApiExplorer::new().group("v1", widget_api()));

            let api = generator.generate("v2").expect("document should generate");

            assert_that!(api.info.version).is_equal_to("2.0".to_owned());
            assert!(api.paths.paths.is_empty());
        }

        #[test]
        fn runs_filters_for_every_operation_with_action_metadata() {
            let mut options = options();
            options.operation_filter(AddResponseHeadersFilter::default());
            options.operation_filter(AuthResponsesOperationFilter::default());
            let explorer = ApiExplorer::new().group("v1", widget_api()).action(
                "/v1/widgets",
                PathItemType::Get,
                ActionMetadata::authorized(AuthorizationRequirement::authenticated())
                    .with_response_header(ResponseHeaderDeclaration::new("X-Total-Count", "Number of widgets")),
            );
            let generator = SwaggerGenerator::new(options, explorer);

            let api = generator.generate("v1").expect("document should generate");

            let serialized = serde_json::to_value(&api).expect("document should serialize");
            let list = &serialized["paths"]["/v1/widgets"]["get"]["responses"];
            assert_eq!(json!("Unauthorized"), list["401"]["description"]);
            assert!(list["200"]["headers"]["X-Total-Count"].is_object());
            assert!(list["200"]["headers"]["X-Correlation-Id"].is_object());
            // Filters added 401/403 after the header filter ran, so those stay bare
            assert!(list["401"]["headers"].is_null());

            let single = &serialized["paths"]["/v1/widgets/{WidgetId}"]["get"]["responses"];
            assert!(single["401"].is_null());
            assert!(single["200"]["headers"]["X-Correlation-Id"].is_object());
        }

        #[test]
        fn closures_work_as_operation_filters() {
            let mut options = options();
            options.operation_filter(|operation: &mut utoipa::openapi::path::Operation, context: &OperationContext<'_>| {
                operation.summary = Some(format!("{} in {}", context.path, context.document_name));
            });
            let generator = SwaggerGenerator::new(options, ApiExplorer::new().group("v1", widget_api()));

            let api = generator.generate("v1").expect("document should generate");

            let serialized = serde_json::to_value(&api).expect("document should serialize");
            assert_eq!(json!("/v1/widgets in v1"), serialized["paths"]["/v1/widgets"]["get"]["summary"]);
        }

        #[test]
        fn camel_cases_parameters_and_enums_when_enabled() {
            let mut options = options();
            options.describe_all_parameters_in_camel_case = true;
            options.describe_string_enums_in_camel_case = true;
            let generator = SwaggerGenerator::new(options, ApiExplorer::new().group("v1", widget_api()));

            let api = generator.generate("v1").expect("document should generate");

            let serialized = serde_json::to_value(&api).expect("document should serialize");
            let single = &serialized["paths"]["/v1/widgets/{widgetId}"]["get"];
            assert_eq!(json!("widgetId"), single["parameters"][0]["name"]);
            assert_eq!(json!(["active", "retired"]), serialized["components"]["schemas"]["WidgetStatus"]["enum"]);
        }

        fn status_schema() -> RefOr<Schema> {
            RefOr::T(Schema::Object(
                ObjectBuilder::new()
                    .schema_type(SchemaType::String)
                    .enum_values(Some(["Active", "Retired"]))
                    .build(),
            ))
        }

        #[test]
        fn camel_cases_inline_operation_enums() {
            let search = OperationBuilder::new()
                .parameter(
                    ParameterBuilder::new()
                        .name("Status")
                        .parameter_in(ParameterIn::Query)
                        .schema(Some(status_schema()))
                        .build(),
                )
                .request_body(Some(
                    RequestBodyBuilder::new()
                        .content("application/json", ContentBuilder::new().schema(status_schema()).build())
                        .build(),
                ))
                .response(
                    "200",
                    ResponseBuilder::new()
                        .description("Matching status")
                        .content("application/json", ContentBuilder::new().schema(status_schema()).build())
                        .build(),
                )
                .build();
            let api = OpenApiBuilder::new()
                .paths(PathsBuilder::new().path("/v1/widgets/search", PathItem::new(PathItemType::Post, search)).build())
                .build();
            let mut options = options();
            options.describe_string_enums_in_camel_case = true;
            let generator = SwaggerGenerator::new(options, ApiExplorer::new().group("v1", api));

            let api = generator.generate("v1").expect("document should generate");

            let serialized = serde_json::to_value(&api).expect("document should serialize");
            let search = &serialized["paths"]["/v1/widgets/search"]["post"];
            let expected = json!(["active", "retired"]);
            assert_eq!(expected, search["parameters"][0]["schema"]["enum"]);
            assert_eq!(expected, search["requestBody"]["content"]["application/json"]["schema"]["enum"]);
            assert_eq!(expected, search["responses"]["200"]["content"]["application/json"]["schema"]["enum"]);
        }

        #[test]
        fn templates_colliding_after_camel_casing_keep_every_operation() {
            let get_widget = OperationBuilder::new()
                .operation_id(Some("get_widget"))
                .response("200", ResponseBuilder::new().description("The widget").build())
                .build();
            let delete_widget = OperationBuilder::new()
                .operation_id(Some("delete_widget"))
                .response("204", ResponseBuilder::new().description("Deleted").build())
                .build();
            let api = OpenApiBuilder::new()
                .paths(
                    PathsBuilder::new()
                        .path("/v1/widgets/{Id}", PathItem::new(PathItemType::Get, get_widget))
                        .path("/v1/widgets/{id}", PathItem::new(PathItemType::Delete, delete_widget))
                        .build(),
                )
                .build();
            let mut options = options();
            options.describe_all_parameters_in_camel_case = true;
            let generator = SwaggerGenerator::new(options, ApiExplorer::new().group("v1", api));

            let api = generator.generate("v1").expect("document should generate");

            assert_that!(api.paths.paths.len()).is_equal_to(1);
            let item = &api.paths.paths["/v1/widgets/{id}"];
            assert!(item.operations.contains_key(&PathItemType::Get));
            assert!(item.operations.contains_key(&PathItemType::Delete));
        }

        #[test]
        fn leaves_names_alone_by_default() {
            let generator = SwaggerGenerator::new(options(), ApiExplorer::new().group("v1", widget_api()));

            let api = generator.generate("v1").expect("document should generate");

            assert!(api.paths.paths.contains_key("/v1/widgets/{WidgetId}"));
        }
    }

    mod generate_all {
        use super::*;

        #[test]
        fn produces_documents_in_registration_order() {
            let generator = SwaggerGenerator::new(options(), ApiExplorer::new().group("v1", widget_api()));

            let documents = generator.generate_all().expect("documents should generate");

            assert_that!(documents.names().collect::<Vec<_>>()).is_equal_to(vec!["v1", "v2"]);
            assert_that!(documents.get("v2").map(|api| api.info.version.clone())).is_equal_to(Some("2.0".to_owned()));
        }
    }

    #[test]
    fn path_templates_follow_renamed_parameters() {
        assert_that!(camel_case_path_template("/users/{UserId}/tasks/{TaskId}"))
            .is_equal_to("/users/{userId}/tasks/{taskId}".to_owned());
        assert_that!(camel_case_path_template("/plain")).is_equal_to("/plain".to_owned());
        assert_that!(camel_case_path_template("/broken/{Open")).is_equal_to("/broken/{Open".to_owned());
    }
}
