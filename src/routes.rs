//! Serves the generated documents and the Swagger UI.

use crate::error::DocsError;
use crate::routing_utils::{DocsErrorResponse, Json};
use crate::swagger_gen::DocumentSet;
use crate::swagger_ui::{SwaggerEndpoint, SwaggerUiOptions};
use axum::extract::{Path, State};
use axum::http::{header, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::openapi::OpenApi;
use utoipa_swagger_ui::{Config, Url};

/// Route template the generated documents are served under
pub const DOCUMENT_ROUTE: &str = "/swagger/:group/swagger.json";

struct DocsState {
    documents: DocumentSet,
    ui_config: Arc<Config<'static>>,
    route_prefix: String,
}

fn ui_url(endpoint: &SwaggerEndpoint) -> Url<'static> {
    // Url only borrows its text and the router needs it for the life of the process
    let label: &'static str = endpoint.label.clone().leak();
    let url: &'static str = endpoint.url.clone().leak();
    Url::new(label, url)
}

fn ui_config(ui: &SwaggerUiOptions) -> Config<'static> {
    Config::new(ui.endpoints().iter().map(ui_url))
        .deep_linking(ui.deep_linking)
        .display_request_duration(ui.display_request_duration)
        .filter(ui.filter)
}

/// Builds a router serving every generated document as JSON plus the Swagger UI configured by
/// `ui`. Documents are also served beneath a non-empty UI prefix. The UI claims every path under its prefix, so merge API routes into this router
/// rather than nesting it.
pub fn docs_router(documents: DocumentSet, ui: &SwaggerUiOptions) -> Router {
    let route_prefix = ui.route_prefix.trim_matches('/').to_owned();
    info!(
        documents = documents.len(),
        ui_prefix = %route_prefix,
        "serving API documentation"
    );

    let mut router = Router::new().route(DOCUMENT_ROUTE, get(serve_document));
    if !route_prefix.is_empty() {
        // UI links are relative to the UI page, so they resolve beneath the prefix
        router = router.route(&format!("/{route_prefix}{DOCUMENT_ROUTE}"), get(serve_document));
    }

    let state = Arc::new(DocsState {
        documents,
        ui_config: Arc::new(ui_config(ui)),
        route_prefix,
    });

    router.fallback(serve_ui).with_state(state)
}

/// Returns the generated OpenAPI document for one API version group
async fn serve_document(
    State(state): State<Arc<DocsState>>,
    Path(group): Path<String>,
) -> Result<Json<OpenApi>, DocsErrorResponse> {
    match state.documents.get(&group) {
        Some(api) => Ok(Json(api.clone())),
        None => Err(DocsError::UnknownDocument(group).into()),
    }
}

/// Resolves a request path to the Swagger UI file it names, if it is under the UI prefix
fn ui_file<'a>(request_path: &'a str, route_prefix: &str) -> Option<&'a str> {
    let relative = request_path.trim_start_matches('/');
    if route_prefix.is_empty() {
        return Some(relative);
    }
    relative.strip_prefix(route_prefix)?.strip_prefix('/')
}

async fn serve_ui(State(state): State<Arc<DocsState>>, uri: Uri) -> Response {
    let request_path = uri.path();
    if !state.route_prefix.is_empty() && request_path.trim_matches('/') == state.route_prefix && !request_path.ends_with('/') {
        // The UI's assets are linked relative to the page, which only resolves with a trailing slash
        return Redirect::permanent(&format!("/{}/", state.route_prefix)).into_response();
    }

    let Some(file) = ui_file(request_path, &state.route_prefix) else {
        return DocsErrorResponse::NotFound(format!("Nothing is served at {request_path}.")).into_response();
    };

    match utoipa_swagger_ui::serve(file, state.ui_config.clone()) {
        Ok(Some(file)) => ([(header::CONTENT_TYPE, file.content_type)], file.bytes.into_owned()).into_response(),
        Ok(None) => DocsErrorResponse::NotFound(format!("Nothing is served at {request_path}.")).into_response(),
        Err(err) => {
            error!("Failed to serve Swagger UI file {file}: {err}");
            DocsErrorResponse::Internal.into_response()
        }
    }
}
