// SPDX-License-Identifier: GPL-3.0-only

//! Screen-owned UI state

use crate::destination::DestinationSelection;
use crate::errors::AppResult;

/// Destination chosen in the picker
///
/// Holds the raw index exactly as the radio group reports it. Selecting never
/// fails and never touches storage; mapping back to a destination happens
/// when a capture is triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected: usize,
}

impl SelectionState {
    pub fn new(initial: DestinationSelection) -> Self {
        Self {
            selected: initial.index(),
        }
    }

    pub fn select(&mut self, destination: DestinationSelection) {
        self.selected = destination.index();
    }

    /// Store a raw radio-group index
    pub fn select_index(&mut self, index: usize) {
        self.selected = index;
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected destination, or a configuration error if the index is unmapped
    pub fn resolve(&self) -> AppResult<DestinationSelection> {
        DestinationSelection::try_from(self.selected)
    }

    /// Picker rows: destination, label, selected
    pub fn options(&self) -> impl Iterator<Item = (DestinationSelection, &'static str, bool)> + '_ {
        DestinationSelection::ALL
            .into_iter()
            .map(move |d| (d, d.label(), d.index() == self.selected))
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(DestinationSelection::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn defaults_to_local_file() {
        let state = SelectionState::default();
        assert_eq!(state.resolve().unwrap(), DestinationSelection::LocalFile);
    }

    #[test]
    fn exactly_one_option_selected() {
        let mut state = SelectionState::default();
        for destination in DestinationSelection::ALL {
            state.select(destination);
            let selected: Vec<_> = state.options().filter(|(_, _, s)| *s).collect();
            assert_eq!(selected.len(), 1);
            assert_eq!(selected[0].0, destination);
        }
    }

    #[test]
    fn selecting_is_idempotent() {
        let mut once = SelectionState::default();
        once.select(DestinationSelection::ProviderUri);
        let mut twice = once.clone();
        twice.select(DestinationSelection::ProviderUri);
        assert_eq!(once, twice);
    }

    #[test]
    fn unmapped_index_resolves_to_configuration_error() {
        let mut state = SelectionState::default();
        state.select_index(42);
        assert_eq!(state.selected_index(), 42);
        assert!(matches!(state.resolve(), Err(AppError::Configuration(_))));
        assert_eq!(state.options().filter(|(_, _, s)| *s).count(), 0);
    }
}
