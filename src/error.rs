/// Errors surfaced by token acquisition and Graph calls.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("Could not obtain access token: {0}")]
    Authentication(String),
    #[error("Error {operation}: {status} - {body}")]
    RemoteApi {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("request error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl GraphError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GraphError::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}
