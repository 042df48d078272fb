//! Ordered, bounded set of step kinds used while composing a workflow

use super::step_kind::StepKind;
use super::validator::MAX_STEPS;

/// Steps picked so far, in the order they were picked.
///
/// A kind appears at most once and the selection never grows past [`MAX_STEPS`].
/// Removing a kind keeps the relative order of the remaining ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepSelection {
    steps: Vec<StepKind>,
}

impl StepSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a kind. Returns false if it is already selected or the selection is full.
    pub fn insert(&mut self, kind: StepKind) -> bool {
        if self.contains(kind) || self.is_full() {
            return false;
        }

        self.steps.push(kind);
        true
    }

    /// Remove a kind. Returns false if it was not selected.
    pub fn remove(&mut self, kind: StepKind) -> bool {
        match self.position(kind) {
            Some(index) => {
                self.steps.remove(index);
                true
            }
            None => false,
        }
    }

    /// Select the kind if absent, deselect it if present. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, kind: StepKind) -> bool {
        if self.remove(kind) {
            false
        } else {
            self.insert(kind)
        }
    }

    pub fn contains(&self, kind: StepKind) -> bool {
        self.steps.contains(&kind)
    }

    /// Zero-based position of a selected kind
    pub fn position(&self, kind: StepKind) -> Option<usize> {
        self.steps.iter().position(|k| *k == kind)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.steps.len() >= MAX_STEPS
    }

    pub fn as_slice(&self) -> &[StepKind] {
        &self.steps
    }

    /// Wire values in selection order
    pub fn to_wire(&self) -> Vec<&'static str> {
        self.steps.iter().map(StepKind::as_str).collect()
    }
}

impl FromIterator<StepKind> for StepSelection {
    /// Inserts each kind in turn; duplicates and overflow are dropped
    fn from_iter<I: IntoIterator<Item = StepKind>>(iter: I) -> Self {
        let mut selection = Self::new();
        for kind in iter {
            selection.insert(kind);
        }
        selection
    }
}

impl From<StepSelection> for Vec<StepKind> {
    fn from(selection: StepSelection) -> Self {
        selection.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut selection = StepSelection::new();
        assert!(selection.insert(StepKind::TagCategory));
        assert!(selection.insert(StepKind::CleanText));

        assert_eq!(
            selection.as_slice(),
            &[StepKind::TagCategory, StepKind::CleanText]
        );
        assert_eq!(selection.position(StepKind::CleanText), Some(1));
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut selection = StepSelection::new();
        assert!(selection.insert(StepKind::Summarize));
        assert!(!selection.insert(StepKind::Summarize));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_capacity_is_max_steps() {
        let mut selection: StepSelection = StepKind::ALL.into_iter().collect();
        assert!(selection.is_full());
        assert_eq!(selection.len(), MAX_STEPS);

        selection.remove(StepKind::Summarize);
        assert!(!selection.is_full());
        assert!(selection.insert(StepKind::Summarize));
        assert!(!selection.insert(StepKind::Summarize));
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut selection: StepSelection = [
            StepKind::Summarize,
            StepKind::CleanText,
            StepKind::TagCategory,
        ]
        .into_iter()
        .collect();

        assert!(selection.remove(StepKind::CleanText));
        assert!(!selection.remove(StepKind::CleanText));
        assert_eq!(
            selection.as_slice(),
            &[StepKind::Summarize, StepKind::TagCategory]
        );
    }

    #[test]
    fn test_toggle() {
        let mut selection = StepSelection::new();
        assert!(selection.toggle(StepKind::ExtractKeyPoints));
        assert!(selection.contains(StepKind::ExtractKeyPoints));
        assert!(!selection.toggle(StepKind::ExtractKeyPoints));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_from_iter_drops_duplicates() {
        let selection: StepSelection = [
            StepKind::CleanText,
            StepKind::Summarize,
            StepKind::CleanText,
        ]
        .into_iter()
        .collect();

        assert_eq!(selection.to_wire(), vec!["clean-text", "summarize"]);
        let steps: Vec<StepKind> = selection.into();
        assert_eq!(steps.len(), 2);
    }
}
