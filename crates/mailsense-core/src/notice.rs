use serde::{Deserialize, Serialize};

const REAUTH_MARKERS: [&str; 3] = ["session", "sign", "expired"];

/// How an external failure is surfaced to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Short-lived toast; the operation is abandoned.
    Transient { message: String },
    /// Persistent banner asking the user to sign in again.
    Reauthenticate { message: String },
}

impl Notice {
    pub fn from_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowercase = message.to_lowercase();
        if REAUTH_MARKERS
            .iter()
            .any(|marker| lowercase.contains(marker))
        {
            Self::Reauthenticate { message }
        } else {
            Self::Transient { message }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Transient { message } | Self::Reauthenticate { message } => message,
        }
    }

    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::Reauthenticate { .. })
    }
}
