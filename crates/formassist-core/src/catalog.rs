//! Client-held form catalog and current selection.
//!
//! Invariant: the selection is either unset or the id of a catalog entry.

use std::collections::HashSet;

use tracing::warn;

use formassist_types::error::CatalogError;
use formassist_types::form::{CatalogStatus, FormDescriptor};

/// Available forms plus the currently selected one.
#[derive(Debug, Clone, Default)]
pub struct FormCatalog {
    forms: Vec<FormDescriptor>,
    selected: Option<String>,
    status: CatalogStatus,
}

impl FormCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog with a fetched listing and select its first entry.
    ///
    /// Entries repeating an earlier id are dropped. Returns the number of
    /// forms kept.
    pub fn populate(&mut self, forms: Vec<FormDescriptor>) -> usize {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(forms.len());
        for form in forms {
            if seen.insert(form.id.clone()) {
                kept.push(form);
            } else {
                warn!(form_id = %form.id, "dropping duplicate form id from catalog");
            }
        }

        self.selected = kept.first().map(|f| f.id.clone());
        self.forms = kept;
        self.status = CatalogStatus::Loaded;
        self.forms.len()
    }

    /// Record that a fetch started.
    pub fn mark_loading(&mut self) {
        self.status = CatalogStatus::Loading;
    }

    /// Record a failed fetch. The catalog stays empty with nothing selected.
    pub fn mark_failed(&mut self) {
        self.forms.clear();
        self.selected = None;
        self.status = CatalogStatus::Failed;
    }

    /// Select a form by id.
    ///
    /// Unknown ids are rejected and the current selection is kept. Returns
    /// whether the selection changed.
    pub fn select(&mut self, id: &str) -> Result<bool, CatalogError> {
        if !self.contains(id) {
            return Err(CatalogError::UnknownForm(id.to_string()));
        }
        if self.selected.as_deref() == Some(id) {
            return Ok(false);
        }
        self.selected = Some(id.to_string());
        Ok(true)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.forms.iter().any(|f| f.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&FormDescriptor> {
        self.forms.iter().find(|f| f.id == id)
    }

    pub fn selected(&self) -> Option<&FormDescriptor> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Display name for an id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(FormDescriptor::display_name).unwrap_or(id)
    }

    pub fn forms(&self) -> &[FormDescriptor] {
        &self.forms
    }

    pub fn status(&self) -> CatalogStatus {
        self.status
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }
}
