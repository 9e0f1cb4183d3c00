//! Local editing state for a game list.
//!
//! [`ListEditor`] owns a [`ListDraft`] and keeps its ordering mode and the
//! entries' `order` fields consistent:
//!
//! * in [`ListOrdering::Custom`] mode, adding, reordering or switching modes
//!   leaves the orders at exactly `0..N` in array order;
//! * in every other mode, switching modes clears all orders, and adding
//!   leaves the new entry without one.
//!
//! Removing an entry does not renumber the survivors; their orders stay
//! stale until the next reorder or mode change. Nothing is sent to the API
//! until [`ListEditor::save`] is called, which submits the whole draft.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{GameList, GameSummary, ListEntry, ListOrdering};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Game {0} is already in the list")]
    DuplicateGame(String),

    #[error("Game {0} is not in the list")]
    UnknownGame(String),

    #[error("Only the owner can edit this list")]
    NotOwner,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// The body submitted on save: the complete desired state of the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListDraft {
    pub name: String,
    pub description: String,
    pub is_ranked: bool,
    pub is_private: bool,
    pub ordering: ListOrdering,
    pub games: Vec<ListEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ListEditor {
    list_id: Option<String>,
    draft: ListDraft,
}

impl ListEditor {
    /// An empty draft for a new list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts editing an existing list owned by the session user.
    ///
    /// Custom-ordered lists are renumbered to their array positions on load.
    ///
    /// # Errors
    ///
    /// [`EditorError::NotOwner`] when the session is anonymous or belongs to
    /// someone else.
    pub fn from_list(list: GameList, session: &Session) -> Result<Self, EditorError> {
        let owner = list.owner_id().map(str::to_string);
        if owner.is_none() || owner != session.user_id() {
            return Err(EditorError::NotOwner);
        }

        let mut editor = Self {
            list_id: Some(list.id),
            draft: ListDraft {
                name: list.name,
                description: list.description.unwrap_or_default(),
                is_ranked: list.is_ranked,
                is_private: list.is_private,
                ordering: list.ordering,
                games: list.games,
            },
        };

        if editor.draft.ordering.is_custom() {
            editor.renumber();
        }

        Ok(editor)
    }

    #[must_use]
    pub fn list_id(&self) -> Option<&str> {
        self.list_id.as_deref()
    }

    #[must_use]
    pub const fn draft(&self) -> &ListDraft {
        &self.draft
    }

    #[must_use]
    pub fn entries(&self) -> &[ListEntry] {
        &self.draft.games
    }

    #[must_use]
    pub const fn ordering(&self) -> ListOrdering {
        self.draft.ordering
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub const fn set_ranked(&mut self, ranked: bool) {
        self.draft.is_ranked = ranked;
    }

    pub const fn set_private(&mut self, private: bool) {
        self.draft.is_private = private;
    }

    pub fn set_note(&mut self, game_id: &str, note: impl Into<String>) -> Result<(), EditorError> {
        let entry = self
            .draft
            .games
            .iter_mut()
            .find(|e| e.game_id == game_id)
            .ok_or_else(|| EditorError::UnknownGame(game_id.to_string()))?;
        entry.note = note.into();
        Ok(())
    }

    /// Appends a game. In custom mode it takes the next position.
    ///
    /// # Errors
    ///
    /// [`EditorError::DuplicateGame`] if the game is already listed.
    pub fn add_game(&mut self, game_id: impl Into<String>, game: GameSummary) -> Result<(), EditorError> {
        let game_id = game_id.into();
        if self.position(&game_id).is_some() {
            return Err(EditorError::DuplicateGame(game_id));
        }

        let order = self
            .draft
            .ordering
            .is_custom()
            .then(|| u32::try_from(self.draft.games.len()).unwrap_or(u32::MAX));

        debug!(%game_id, ?order, "Adding game to list");
        self.draft.games.push(ListEntry {
            game_id,
            note: String::new(),
            order,
            game: Some(game),
        });
        Ok(())
    }

    /// Removes the entry for `game_id`. Remaining orders are left untouched.
    pub fn remove_game(&mut self, game_id: &str) -> bool {
        let before = self.draft.games.len();
        self.draft.games.retain(|e| e.game_id != game_id);
        before != self.draft.games.len()
    }

    /// Applies a drag-and-drop: moves `active_id` to where `over_id` sits,
    /// renumbers every entry and switches the list to custom ordering.
    ///
    /// Returns `false` without touching anything when both ids are the same
    /// or either one is not in the list.
    pub fn reorder(&mut self, active_id: &str, over_id: &str) -> bool {
        if active_id == over_id {
            return false;
        }

        let (Some(from), Some(to)) = (self.position(active_id), self.position(over_id)) else {
            return false;
        };

        let entry = self.draft.games.remove(from);
        self.draft.games.insert(to, entry);
        self.renumber();
        self.draft.ordering = ListOrdering::Custom;

        debug!(active_id, over_id, from, to, "Reordered list");
        true
    }

    /// Switches the ordering mode. Custom numbers the entries by their current
    /// position; any other mode drops the orders, since the API sorts those
    /// lists itself.
    pub fn set_ordering(&mut self, ordering: ListOrdering) {
        self.draft.ordering = ordering;
        if ordering.is_custom() {
            self.renumber();
        } else {
            for entry in &mut self.draft.games {
                entry.order = None;
            }
        }
    }

    /// Whether the orders match the ordering mode.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.draft.ordering.is_custom() {
            self.draft
                .games
                .iter()
                .enumerate()
                .all(|(i, e)| e.order.and_then(|o| usize::try_from(o).ok()) == Some(i))
        } else {
            self.draft.games.iter().all(|e| e.order.is_none())
        }
    }

    /// Submits the draft: `PUT /list/{id}` when editing, `POST /list` otherwise.
    pub async fn save(&self, client: &ApiClient) -> Result<Option<GameList>, EditorError> {
        let saved = match &self.list_id {
            Some(id) => client.update_list(id, &self.draft).await?,
            None => client.create_list(&self.draft).await?,
        };
        Ok(saved)
    }

    fn position(&self, game_id: &str) -> Option<usize> {
        self.draft.games.iter().position(|e| e.game_id == game_id)
    }

    fn renumber(&mut self) {
        for (index, entry) in self.draft.games.iter_mut().enumerate() {
            entry.order = Some(u32::try_from(index).unwrap_or(u32::MAX));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(title: &str) -> GameSummary {
        GameSummary {
            title: title.to_string(),
            ..GameSummary::default()
        }
    }

    fn editor_with(ordering: ListOrdering, ids: &[&str]) -> ListEditor {
        let mut editor = ListEditor::new();
        editor.set_ordering(ordering);
        for id in ids {
            editor.add_game(*id, game(id)).unwrap();
        }
        editor
    }

    fn ids(editor: &ListEditor) -> Vec<&str> {
        editor.entries().iter().map(|e| e.game_id.as_str()).collect()
    }

    fn orders(editor: &ListEditor) -> Vec<Option<u32>> {
        editor.entries().iter().map(|e| e.order).collect()
    }

    #[test]
    fn test_add_to_custom_list_appends_position() {
        let editor = editor_with(ListOrdering::Custom, &["a", "b", "c"]);
        assert_eq!(orders(&editor), vec![Some(0), Some(1), Some(2)]);
        assert!(editor.is_consistent());
    }

    #[test]
    fn test_add_to_derived_list_leaves_order_unset() {
        let editor = editor_with(ListOrdering::YearDesc, &["a", "b"]);
        assert_eq!(orders(&editor), vec![None, None]);
    }

    #[test]
    fn test_duplicate_game_is_rejected() {
        let mut editor = editor_with(ListOrdering::Custom, &["a"]);
        assert!(matches!(
            editor.add_game("a", game("a")),
            Err(EditorError::DuplicateGame(id)) if id == "a"
        ));
        assert_eq!(editor.entries().len(), 1);
    }

    #[test]
    fn test_remove_does_not_renumber() {
        let mut editor = editor_with(ListOrdering::Custom, &["a", "b", "c"]);

        assert!(editor.remove_game("a"));
        assert!(!editor.remove_game("missing"));

        assert_eq!(ids(&editor), vec!["b", "c"]);
        assert_eq!(orders(&editor), vec![Some(1), Some(2)]);
        assert!(!editor.is_consistent());

        editor.set_ordering(ListOrdering::Custom);
        assert_eq!(orders(&editor), vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_drag_moves_renumbers_and_forces_custom() {
        let mut editor = editor_with(ListOrdering::TitleAsc, &["a", "b", "c", "d"]);

        assert!(editor.reorder("a", "c"));

        assert_eq!(ids(&editor), vec!["b", "c", "a", "d"]);
        assert_eq!(orders(&editor), vec![Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(editor.ordering(), ListOrdering::Custom);
    }

    #[test]
    fn test_drag_last_game_to_front_of_custom_list() {
        let mut editor = editor_with(ListOrdering::Custom, &["a", "b", "c"]);
        assert_eq!(orders(&editor), vec![Some(0), Some(1), Some(2)]);

        assert!(editor.reorder("c", "a"));

        assert_eq!(ids(&editor), vec!["c", "a", "b"]);
        assert_eq!(orders(&editor), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(editor.ordering(), ListOrdering::Custom);
    }

    #[test]
    fn test_drag_onto_itself_is_a_noop() {
        let mut editor = editor_with(ListOrdering::TitleDesc, &["a", "b"]);
        let before = editor.draft().clone();

        assert!(!editor.reorder("b", "b"));
        assert_eq!(editor.draft(), &before);
        assert_eq!(editor.ordering(), ListOrdering::TitleDesc);
    }

    #[test]
    fn test_drag_with_unknown_id_is_a_noop() {
        let mut editor = editor_with(ListOrdering::TitleAsc, &["a", "b"]);
        assert!(!editor.reorder("a", "zzz"));
        assert_eq!(editor.ordering(), ListOrdering::TitleAsc);
        assert_eq!(ids(&editor), vec!["a", "b"]);
    }

    #[test]
    fn test_leaving_custom_clears_orders() {
        let mut editor = editor_with(ListOrdering::Custom, &["a", "b", "c"]);
        editor.set_ordering(ListOrdering::YearAsc);
        assert_eq!(orders(&editor), vec![None, None, None]);
        assert!(editor.is_consistent());
    }

    #[test]
    fn test_empty_list_is_consistent_in_every_mode() {
        let mut editor = ListEditor::new();
        for ordering in ListOrdering::ALL {
            editor.set_ordering(ordering);
            assert!(editor.is_consistent());
        }
        assert!(!editor.reorder("a", "b"));
    }

    #[test]
    fn test_set_note() {
        let mut editor = editor_with(ListOrdering::Custom, &["a"]);
        editor.set_note("a", "goty").unwrap();
        assert_eq!(editor.entries()[0].note, "goty");
        assert!(matches!(editor.set_note("b", "x"), Err(EditorError::UnknownGame(_))));
    }

    #[test]
    fn test_draft_serializes_whole_state() {
        let mut editor = editor_with(ListOrdering::Custom, &["a"]);
        editor.set_name("Favourites");
        editor.set_ranked(true);

        let json = serde_json::to_value(editor.draft()).unwrap();
        assert_eq!(json["name"], "Favourites");
        assert_eq!(json["is_ranked"], true);
        assert_eq!(json["is_private"], false);
        assert_eq!(json["ordering"], "custom");
        assert_eq!(json["games"][0]["game_id"], "a");
        assert_eq!(json["games"][0]["order"], 0);
        assert_eq!(json["games"][0]["game"]["title"], "a");
    }
}
