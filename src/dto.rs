use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::filters::{PropertyRule, Rule};

/// Language a greeting is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Language {
    English,
    Spanish,
}

/// DTO for a greeting returned by the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct Greeting {
    #[schema(example = "Hello, Ada!")]
    pub message: String,
    pub language: Language,
}

/// DTO for composing a new greeting via the API
#[derive(Deserialize, Display, Validate, ToSchema)]
#[display("{name} ({language:?})")]
#[cfg_attr(test, derive(Serialize))]
pub struct NewGreeting {
    #[validate(length(min = 1, max = 30))]
    #[schema(example = "Ada")]
    pub name: String,
    pub language: Language,
}

/// Validation constraints of the request DTOs, as they should appear in the API documentation
pub fn validation_rules() -> Vec<PropertyRule> {
    vec![
        PropertyRule::new("NewGreeting", "name", Rule::Length { min: Some(1), max: Some(30) }),
        PropertyRule::new("NewGreeting", "name", Rule::Required),
        PropertyRule::new("NewGreeting", "language", Rule::Required),
    ]
}
