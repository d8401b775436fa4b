use serde::Serialize;

use super::client::ClientError;
use super::transport::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient message shown to the operator after an action (the dashboard's snackbar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            message: message.into(),
        }
    }

    /// Maps a client failure to the wording shown to the operator.
    /// `action` is a verb such as "load" or "delete"; `label` the resource name.
    pub fn from_client_error(action: &str, label: &str, error: &ClientError) -> Self {
        let message = match error {
            ClientError::Status {
                status: 401 | 403, ..
            } => format!("You do not have permission to {action} this {label}."),
            ClientError::Status { status: 404, .. } => {
                format!("The requested {label} no longer exists.")
            }
            ClientError::Status {
                status: 400 | 409 | 422,
                message: Some(detail),
            } => detail.clone(),
            ClientError::Transport(TransportError::Timeout) => {
                "The server took too long to respond. Please try again.".to_string()
            }
            ClientError::Transport(TransportError::Connect(_)) => {
                "Unable to reach the server. Check your connection.".to_string()
            }
            _ => format!("Could not {action} {label}. Please try again."),
        };

        Self::error(message)
    }
}
