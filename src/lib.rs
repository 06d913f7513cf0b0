pub mod api;
pub mod app_env;
pub mod configure;
pub mod document_info;
pub mod dto;
pub mod error;
pub mod explorer;
pub mod file_system;
pub mod filters;
pub mod logging;
pub mod routes;
pub mod routing_utils;
pub mod swagger_gen;
pub mod swagger_ui;
pub mod versioning;

#[cfg(test)]
mod test_util;
