use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that can occur while configuring or generating API documentation. All of these
/// happen during startup, so callers are expected to abort rather than serve partial docs.
#[derive(Error, Debug)]
pub enum DocsError {
    #[error("could not list documentation comment files in {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("the {0} must be registered before documentation can be configured")]
    MissingCollaborator(&'static str),
    #[error("no documentation is registered for the \"{0}\" API group")]
    UnknownDocument(String),
}
