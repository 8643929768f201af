//! The JSON body for responses that carry a single message.

use serde::{Deserialize, Serialize};

/// A JSON body carrying a single human readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The message text.
    pub message: String,
}

impl Message {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}
