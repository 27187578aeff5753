//! Decides when a filter change must reach the backend.

use crate::domain::filters::FilterSelection;

/// Remembers the selection of the last triggered fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSync {
    last_triggered: Option<FilterSelection>,
}

impl FilterSync {
    /// True iff the vocabulary is loaded and `current` differs from the last
    /// triggered selection. A `true` answer records `current`.
    pub fn should_fetch(&mut self, vocabulary_loaded: bool, current: &FilterSelection) -> bool {
        if !vocabulary_loaded {
            return false;
        }
        if self.last_triggered.as_ref() == Some(current) {
            return false;
        }
        self.last_triggered = Some(current.clone());
        true
    }

    /// Forces the next check to trigger, e.g. for an explicit refresh.
    pub fn forget(&mut self) {
        self.last_triggered = None;
    }

    pub fn last_triggered(&self) -> Option<&FilterSelection> {
        self.last_triggered.as_ref()
    }
}
