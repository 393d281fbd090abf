//! Single-choice answer selection for the current question.

use super::model::InteractionOption;

/// The option picked for the current question, if any.
///
/// Toggling the selected option clears it; toggling any other option
/// replaces it. At most one option is ever held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSelection {
    selected: Option<InteractionOption>,
}

impl AnswerSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles `option`.
    pub fn toggle(&mut self, option: &InteractionOption) {
        if self.is_selected(option) {
            self.selected = None;
        } else {
            self.selected = Some(option.clone());
        }
    }

    /// Whether `option` is the current choice.
    #[must_use]
    pub fn is_selected(&self, option: &InteractionOption) -> bool {
        self.selected.as_ref().is_some_and(|s| s.id == option.id)
    }

    /// The current choice.
    #[must_use]
    pub fn selected(&self) -> Option<&InteractionOption> {
        self.selected.as_ref()
    }

    /// Takes the current choice, leaving the selection empty.
    pub fn take(&mut self) -> Option<InteractionOption> {
        self.selected.take()
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str) -> InteractionOption {
        InteractionOption { id: id.into(), name: format!("name-{id}") }
    }

    #[test]
    fn second_toggle_replaces_first() {
        let mut selection = AnswerSelection::new();
        selection.toggle(&option("o1"));
        selection.toggle(&option("o2"));
        assert_eq!(selection.selected().unwrap().id, "o2");
        assert!(!selection.is_selected(&option("o1")));
    }

    #[test]
    fn toggling_selected_option_clears_it() {
        let mut selection = AnswerSelection::new();
        selection.toggle(&option("o1"));
        selection.toggle(&option("o1"));
        assert!(selection.selected().is_none());
    }

    #[test]
    fn take_empties_selection() {
        let mut selection = AnswerSelection::new();
        selection.toggle(&option("o1"));
        assert_eq!(selection.take().unwrap().id, "o1");
        assert!(selection.take().is_none());
    }
}
