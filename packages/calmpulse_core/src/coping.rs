//! Coping-technique suggestions and their drag-reorder deck.
//!
//! Pure view state: the order and selection live only for the session,
//! nothing is persisted.

use serde::{Deserialize, Serialize};

/// One coping technique shown on the coping-tools screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopingSuggestion {
    pub id: u32,
    pub title: String,
    pub description: String,
}

impl CopingSuggestion {
    pub fn new(id: u32, title: &str, description: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Ordered, reorderable deck of suggestions with an optional selection.
#[derive(Clone, Debug)]
pub struct CopingDeck {
    items: Vec<CopingSuggestion>,
    selected: Option<u32>,
}

impl CopingDeck {
    pub fn new(items: Vec<CopingSuggestion>) -> Self {
        Self {
            items,
            selected: None,
        }
    }

    /// The deck the app ships with.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            CopingSuggestion::new(
                1,
                "Breathing Exercises",
                "Practice deep breathing for 5 minutes.",
            ),
            CopingSuggestion::new(2, "Grounding Techniques", "Touch grass."),
            CopingSuggestion::new(
                3,
                "Meditation",
                "Meditate for 10 minutes to clear your mind.",
            ),
        ])
    }

    pub fn items(&self) -> &[CopingSuggestion] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drag-reorder: move the item at `from` so it lands at `to`, shifting
    /// the rest. Drops past the end land at the end; an out-of-range `from`
    /// is rejected.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, item);
        true
    }

    /// Mark a suggestion as selected. Unknown ids are rejected.
    pub fn select(&mut self, id: u32) -> bool {
        if self.items.iter().any(|s| s.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&CopingSuggestion> {
        self.selected
            .and_then(|id| self.items.iter().find(|s| s.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(deck: &CopingDeck) -> Vec<String> {
        deck.items().iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn default_deck_carries_the_three_suggestions() {
        let deck = CopingDeck::with_defaults();
        assert_eq!(deck.len(), 3);
        assert_eq!(
            titles(&deck),
            vec!["Breathing Exercises", "Grounding Techniques", "Meditation"]
        );
        assert_eq!(deck.items()[1].description, "Touch grass.");
        assert_eq!(deck.selected(), None);
    }

    #[test]
    fn drag_to_front_and_back() {
        let mut deck = CopingDeck::with_defaults();
        assert!(deck.move_item(2, 0));
        assert_eq!(
            titles(&deck),
            vec!["Meditation", "Breathing Exercises", "Grounding Techniques"]
        );
        assert!(deck.move_item(0, 2));
        assert_eq!(
            titles(&deck),
            vec!["Breathing Exercises", "Grounding Techniques", "Meditation"]
        );
    }

    #[test]
    fn drop_past_the_end_lands_at_the_end() {
        let mut deck = CopingDeck::with_defaults();
        assert!(deck.move_item(0, 99));
        assert_eq!(
            titles(&deck),
            vec!["Grounding Techniques", "Meditation", "Breathing Exercises"]
        );
    }

    #[test]
    fn out_of_range_source_is_rejected() {
        let mut deck = CopingDeck::with_defaults();
        let before = titles(&deck);
        assert!(!deck.move_item(3, 0));
        assert_eq!(titles(&deck), before);
    }

    #[test]
    fn moving_onto_itself_changes_nothing() {
        let mut deck = CopingDeck::with_defaults();
        let before = titles(&deck);
        assert!(deck.move_item(1, 1));
        assert_eq!(titles(&deck), before);
    }

    #[test]
    fn selection_follows_the_item_through_reorders() {
        let mut deck = CopingDeck::with_defaults();
        assert!(deck.select(2));
        deck.move_item(1, 0);
        let selected = deck.selected().unwrap();
        assert_eq!(selected.id, 2);
        assert_eq!(selected.title, "Grounding Techniques");
    }

    #[test]
    fn unknown_ids_cannot_be_selected() {
        let mut deck = CopingDeck::with_defaults();
        assert!(!deck.select(99));
        assert_eq!(deck.selected(), None);
    }
}
