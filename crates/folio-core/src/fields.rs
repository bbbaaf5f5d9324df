#![forbid(unsafe_code)]

//! Floating-label state for form fields.
//!
//! A field wrapper is "filled" while its input holds non-whitespace text; the
//! stylesheet floats the label off the input in that state.

use std::collections::BTreeMap;

use crate::element::ElementId;

/// Whether `value` counts as filled.
#[must_use]
pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Filled markers keyed by field wrapper.
#[derive(Debug, Clone, Default)]
pub struct FieldTracker {
    filled: BTreeMap<ElementId, bool>,
}

impl FieldTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current value of `field`. Returns the new filled state when
    /// it changed (first sightings always count as a change).
    pub fn update(&mut self, field: ElementId, value: &str) -> Option<bool> {
        let filled = is_filled(value);
        match self.filled.insert(field, filled) {
            Some(previous) if previous == filled => None,
            _ => Some(filled),
        }
    }

    /// Whether `field` is filled.
    #[must_use]
    pub fn is_field_filled(&self, field: ElementId) -> bool {
        self.filled.get(&field).copied().unwrap_or(false)
    }

    /// Mark every field empty (form reset). Returns the fields that were
    /// filled.
    pub fn clear_all(&mut self) -> Vec<ElementId> {
        self.filled
            .iter_mut()
            .filter_map(|(&field, filled)| std::mem::replace(filled, false).then_some(field))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_ignores_whitespace() {
        assert!(is_filled(" a "));
        assert!(!is_filled(" \n"));
        assert!(!is_filled(""));
    }

    #[test]
    fn update_reports_changes_only() {
        let mut fields = FieldTracker::new();
        assert_eq!(fields.update(ElementId(1), ""), Some(false));
        assert_eq!(fields.update(ElementId(1), " "), None);
        assert_eq!(fields.update(ElementId(1), "x"), Some(true));
        assert_eq!(fields.update(ElementId(1), "xy"), None);
        assert!(fields.is_field_filled(ElementId(1)));
    }

    #[test]
    fn clear_all_returns_filled_fields() {
        let mut fields = FieldTracker::new();
        fields.update(ElementId(1), "a");
        fields.update(ElementId(2), "");
        fields.update(ElementId(3), "c");
        assert_eq!(fields.clear_all(), vec![ElementId(1), ElementId(3)]);
        assert!(fields.clear_all().is_empty());
    }
}
