//! Form catalog entries.

use serde::{Deserialize, Serialize};

/// A fillable form offered by the backend (e.g. `I-765`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDescriptor {
    /// Unique within the catalog; sent back verbatim as `formTypeId`.
    pub id: String,
    /// Human-readable name shown in the selector and timeline notices.
    pub name: String,
}

impl FormDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Name for user-facing text, falling back to the id when blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Load status of the client-held catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogStatus {
    #[default]
    Pending,
    Loading,
    Loaded,
    Failed,
}
