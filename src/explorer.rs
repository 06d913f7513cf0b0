//! The application's API surface as seen by the documentation generator: the raw OpenAPI
//! output of each version group plus the metadata of the actions that produced each operation.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use utoipa::openapi::path::PathItemType;
use utoipa::openapi::schema::SchemaType;
use utoipa::openapi::OpenApi;

/// Declares that an action requires an authenticated caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationRequirement {
    /// Policies (or OAuth scopes) the caller must satisfy. Empty means "any authenticated caller".
    pub policies: Vec<String>,
    /// Set when the action explicitly opts out of authorization inherited from its group
    pub allow_anonymous: bool,
}

impl AuthorizationRequirement {
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn with_policies<I, S>(policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AuthorizationRequirement {
            policies: policies.into_iter().map(Into::into).collect(),
            allow_anonymous: false,
        }
    }
}

/// A header an action promises to send back on its responses
#[derive(Debug, Clone)]
pub struct ResponseHeaderDeclaration {
    pub name: String,
    pub description: Option<String>,
    pub schema_type: SchemaType,
    /// Status codes the header applies to. Empty means every response.
    pub status_codes: Vec<String>,
}

impl ResponseHeaderDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        ResponseHeaderDeclaration {
            name: name.into(),
            description: Some(description.into()),
            schema_type: SchemaType::String,
            status_codes: Vec::new(),
        }
    }

    /// Restricts the header to responses with the given status codes
    pub fn for_statuses<I: IntoIterator<Item = u16>>(mut self, statuses: I) -> Self {
        self.status_codes = statuses.into_iter().map(|status| status.to_string()).collect();
        self
    }

    pub fn applies_to(&self, status: &str) -> bool {
        self.status_codes.is_empty() || self.status_codes.iter().any(|code| code == status)
    }
}

/// Metadata attached to the handler behind one documented operation
#[derive(Debug, Clone, Default)]
pub struct ActionMetadata {
    pub authorization: Option<AuthorizationRequirement>,
    pub response_headers: Vec<ResponseHeaderDeclaration>,
}

impl ActionMetadata {
    pub fn authorized(requirement: AuthorizationRequirement) -> Self {
        ActionMetadata {
            authorization: Some(requirement),
            response_headers: Vec::new(),
        }
    }

    pub fn with_response_header(mut self, header: ResponseHeaderDeclaration) -> Self {
        self.response_headers.push(header);
        self
    }
}

/// Collects the per-version OpenAPI output of the application and the metadata of its actions
#[derive(Default)]
pub struct ApiExplorer {
    groups: HashMap<String, OpenApi>,
    actions: BTreeMap<(String, PathItemType), ActionMetadata>,
}

impl ApiExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the operations of an API group. Registering the same group again merges the new
    /// operations into the existing ones.
    pub fn group(mut self, group_name: impl Into<String>, api: OpenApi) -> Self {
        match self.groups.entry(group_name.into()) {
            Entry::Occupied(mut existing) => existing.get_mut().merge(api),
            Entry::Vacant(slot) => {
                slot.insert(api);
            }
        }
        self
    }

    /// Attaches metadata to the action serving `method` on `path`
    pub fn action(mut self, path: impl Into<String>, method: PathItemType, metadata: ActionMetadata) -> Self {
        self.actions.insert((path.into(), method), metadata);
        self
    }

    pub fn api_for_group(&self, group_name: &str) -> Option<&OpenApi> {
        self.groups.get(group_name)
    }

    pub fn metadata_for(&self, path: &str, method: &PathItemType) -> Option<&ActionMetadata> {
        self.actions.get(&(path.to_owned(), method.clone()))
    }
}
