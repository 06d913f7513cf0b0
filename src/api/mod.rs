use axum::Router;

pub mod greetings;
pub mod swagger_main;
#[cfg(test)]
pub mod test_util;

/// Routes of every version of the greetings API
pub fn api_routes() -> Router {
    greetings::greeting_routes()
}
