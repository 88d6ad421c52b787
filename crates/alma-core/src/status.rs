//! Response status validation.
//!
//! Every Alma response embeds `<status value="..." key="..."/>`. Only the
//! literal value `ok` counts as success. Any other value, including a
//! missing status element, is a communication error carrying the key.

use tracing::trace;

use crate::document::{Document, DocumentNode};
use crate::error::CommunicationError;

/// Tag name of the embedded status indicator.
pub const STATUS_TAG: &str = "status";

/// The status indicator of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Raw `value` attribute.
    pub value: String,
    /// Raw `key` attribute; empty when the server did not supply one.
    pub key: String,
}

impl Status {
    /// Read the first status element of a document.
    pub fn of(doc: &Document) -> Self {
        doc.find_first(STATUS_TAG)
            .map(Self::from_node)
            .unwrap_or_else(|| Self {
                value: String::new(),
                key: String::new(),
            })
    }

    /// Read a status element.
    pub fn from_node<N: DocumentNode>(node: &N) -> Self {
        Self {
            value: node.attr("value").to_string(),
            key: node.attr("key").to_string(),
        }
    }

    /// True only for the exact value `ok`.
    pub fn is_ok(&self) -> bool {
        self.value == "ok"
    }

    /// Classify the status.
    ///
    /// # Errors
    ///
    /// Returns a [`CommunicationError`] with the key for every value other
    /// than `ok`. An empty key is not treated specially.
    pub fn check(&self) -> Result<(), CommunicationError> {
        if self.is_ok() {
            Ok(())
        } else {
            trace!(value = %self.value, key = %self.key, "status is not okay");
            Err(CommunicationError::new(self.key.clone()))
        }
    }
}

/// Validate the status indicator of a document.
///
/// # Errors
///
/// See [`Status::check`].
pub fn validate(doc: &Document) -> Result<(), CommunicationError> {
    Status::of(doc).check()
}
