use super::swagger_main::BearerSecurity;
use crate::dto::{self, Greeting, Language};
use crate::routing_utils::{BasicErrorResponse, Json, UnauthorizedResponse, ValidationErrorResponse};
use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::ErrorResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, OpenApi};
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(greet_v1))]
/// Defines the OpenAPI documentation for version 1 of the greetings API
pub struct GreetingsV1Api;

#[derive(OpenApi)]
#[openapi(
    paths(greet_v2, create_greeting),
    components(
        schemas(Greeting, dto::NewGreeting, Language),
        responses(BasicErrorResponse)
    ),
    modifiers(&BearerSecurity)
)]
/// Defines the OpenAPI documentation for version 2 of the greetings API
pub struct GreetingsV2Api;

/// Constant used to group greeting endpoints in OpenAPI documentation
pub const GREETINGS_API_GROUP: &str = "Greetings";

/// Creates a router for every version of the greetings API
pub fn greeting_routes() -> Router {
    Router::new()
        .route("/v1/greetings/:name", get(greet_v1))
        .route("/v2/greetings/:name", get(greet_v2))
        .route("/v2/greetings", post(create_greeting))
}

fn compose(name: &str, language: Language) -> String {
    match language {
        Language::English => format!("Hello, {name}!"),
        Language::Spanish => format!("¡Hola, {name}!"),
    }
}

#[utoipa::path(
    get,
    path = "/v1/greetings/{Name}",
    tag = GREETINGS_API_GROUP,
    params(("Name" = String, Path, description = "Who to greet")),
    responses(
        (status = 200, description = "Plain text greeting", body = String, content_type = "text/plain"),
    ),
)]
#[tracing::instrument(ret)]
/// Greets someone in English
async fn greet_v1(Path(name): Path<String>) -> String {
    compose(&name, Language::English)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct GreetingQuery {
    /// Language of the greeting, English by default
    #[param(inline)]
    language: Option<Language>,
}

#[utoipa::path(
    get,
    path = "/v2/greetings/{Name}",
    tag = GREETINGS_API_GROUP,
    params(("Name" = String, Path, description = "Who to greet"), GreetingQuery),
    responses(
        (status = 200, description = "Composed greeting", body = Greeting),
    ),
)]
#[tracing::instrument]
/// Greets someone in the requested language
async fn greet_v2(Path(name): Path<String>, Query(query): Query<GreetingQuery>) -> Json<Greeting> {
    let language = query.language.unwrap_or(Language::English);
    Json(Greeting {
        message: compose(&name, language),
        language,
    })
}

#[utoipa::path(
    post,
    path = "/v2/greetings",
    tag = GREETINGS_API_GROUP,
    request_body = dto::NewGreeting,
    responses(
        (status = 201, description = "Greeting was composed", body = Greeting),
        (status = 400, response = BasicErrorResponse),
    ),
)]
#[tracing::instrument(skip_all)]
/// Composes a greeting and returns where it can be fetched again. Requires a bearer token.
async fn create_greeting(
    headers: HeaderMap,
    Json(new_greeting): Json<dto::NewGreeting>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Greeting>), ErrorResponse> {
    if !headers.contains_key(header::AUTHORIZATION) {
        return Err(UnauthorizedResponse.into());
    }
    info!("Composing greeting for {}", new_greeting);
    new_greeting
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let location = format!("/v2/greetings/{}", new_greeting.name);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(Greeting {
            message: compose(&new_greeting.name, new_greeting.language),
            language: new_greeting.language,
        }),
    ))
}
