//! Strongly-typed ID wrappers for domain concepts.
//!
//! Protocol IDs (tasks, messages, contexts...) carry a prefix and can be generated here.
//! Domain IDs (employees, directory users) have their own formats and are minted by the
//! domain crate's `IdGenerator`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
    ($(#[$doc:meta])* $name:ident, prefix = $prefix:literal) => {
        define_id_type!($(#[$doc])* $name);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Mint a fresh random identifier.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4().simple()))
            }
        }
    };
}

define_id_type!(
    /// Identifier for A2A messages
    MessageId,
    prefix = "msg"
);

define_id_type!(
    /// Identifier for A2A tasks
    TaskId,
    prefix = "task"
);

define_id_type!(
    /// Conversation context shared by related tasks
    ContextId,
    prefix = "ctx"
);

define_id_type!(
    /// Correlation identifier for tracing a single inbound request
    CorrelationId,
    prefix = "corr"
);

define_id_type!(
    /// Identifier for task artifacts
    ArtifactId,
    prefix = "artifact"
);

define_id_type!(
    /// HR employee identifier, e.g. `E-1A2B3C4D`
    EmployeeId
);

define_id_type!(
    /// Directory account identifier produced by IT provisioning
    DirectoryUserId
);
