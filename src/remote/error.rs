use thiserror::Error;

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{operation} failed: {source}")]
    Network {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} failed ({status}): {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("{operation} returned an unexpected response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}", join_errors(.0))]
    Multiple(Vec<RemoteError>),
}

impl RemoteError {
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            RemoteError::Network { operation, .. }
            | RemoteError::Rejected { operation, .. }
            | RemoteError::Decode { operation, .. } => Some(operation),
            RemoteError::Multiple(_) => None,
        }
    }

    /// Merge the failures of two concurrent calls into one error.
    pub fn combine(first: RemoteError, second: RemoteError) -> RemoteError {
        let mut errors = Vec::new();
        for err in [first, second] {
            match err {
                RemoteError::Multiple(inner) => errors.extend(inner),
                other => errors.push(other),
            }
        }
        RemoteError::Multiple(errors)
    }
}

fn join_errors(errors: &[RemoteError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(operation: &'static str) -> RemoteError {
        RemoteError::Rejected {
            operation,
            status: 401,
            message: "Not Authorized".into(),
        }
    }

    #[test]
    fn rejected_message_names_operation() {
        assert_eq!(
            rejected("list workspaces").to_string(),
            "list workspaces failed (401): Not Authorized"
        );
    }

    #[test]
    fn combine_flattens_both_failures() {
        let combined = RemoteError::combine(rejected("list workspaces"), rejected("fetch user"));
        assert_eq!(
            combined.to_string(),
            "list workspaces failed (401): Not Authorized; fetch user failed (401): Not Authorized"
        );
        assert_eq!(combined.operation(), None);
    }
}
