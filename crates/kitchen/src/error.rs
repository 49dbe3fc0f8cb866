//! Unified error handling for kitchen services.

use mymenu_core::ValidationError;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type for kitchen services.
///
/// Nothing is retried automatically; every variant leaves the triggering
/// action in its pre-call state and the user decides whether to try again.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before any store call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The store reported a failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A bulk insert failed as a whole; no row was added.
    #[error("Batch insert of {count} item(s) failed: {source}")]
    BatchInsert {
        count: usize,
        #[source]
        source: StoreError,
    },

    /// The item an action referred to no longer exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Anything else; the action is abandoned.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    /// Message to show the user in a dismissable alert.
    ///
    /// Store failures are shown verbatim. Unexpected errors get a generic
    /// message and are only detailed in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => capitalize(&e.to_string()),
            Self::Store(e) => e.to_string(),
            Self::BatchInsert { count, source } => {
                format!("Could not add {count} item(s) to the shopping list: {source}")
            }
            Self::NotFound(what) => format!("{what} no longer exists"),
            Self::Unexpected(_) => "An unexpected error occurred".to_string(),
        }
    }

    /// Whether this error points at the backend rather than user input.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::BatchInsert { .. } | Self::Unexpected(_)
        )
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
