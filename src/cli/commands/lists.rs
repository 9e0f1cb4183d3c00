//! Game list command handlers

use anyhow::Context;

use super::App;
use crate::client::ListQuery;
use crate::editor::{EditorError, ListEditor};
use crate::format::{compact_count, pluralize, truncate};
use crate::likes::{LikeAction, Likeable, is_liked_by, toggle_like};
use crate::models::{GameList, GameSummary, ListEntry, ListOrdering};

pub(super) fn print_list_summary(list: &GameList) {
    let owner = list.user.as_ref().map_or("someone", |u| u.username.as_str());
    let private = if list.is_private { " 🔒" } else { "" };
    println!(
        "{}{private} by {owner} ({}, ♥ {})",
        list.name,
        pluralize("game", list.game_count()),
        compact_count(list.like_count() as u64)
    );
    println!("  ID: {}", list.id);
}

/// Entries in the order they are shown. Custom lists follow their stored
/// positions; the API already sorts the other modes.
fn display_order(ordering: ListOrdering, entries: &[ListEntry]) -> Vec<&ListEntry> {
    let mut shown: Vec<&ListEntry> = entries.iter().collect();
    if ordering.is_custom() {
        shown.sort_by_key(|e| e.order.unwrap_or(u32::MAX));
    }
    shown
}

fn print_entries(ordering: ListOrdering, ranked: bool, entries: &[ListEntry]) {
    for (index, entry) in display_order(ordering, entries).into_iter().enumerate() {
        let rank = if ranked {
            format!("{:>3}. ", index + 1)
        } else {
            "   • ".to_string()
        };
        let year = entry
            .game
            .as_ref()
            .and_then(|g| g.year.as_deref())
            .map(|y| format!(" ({y})"))
            .unwrap_or_default();
        println!("{rank}{}{year} [{}]", entry.title(), entry.game_id);
        if !entry.note.is_empty() {
            println!("       {}", entry.note);
        }
    }
}

pub async fn cmd_list_show(app: &App, id: &str) -> anyhow::Result<()> {
    // Refreshes an expired token so owners still see their private lists.
    app.optional_user().await;
    let list = app.client.get_list(id).await?;

    print_list_summary(&list);
    println!("Ordering: {}", list.ordering.label());
    if let Some(description) = list.description.as_deref().filter(|d| !d.is_empty()) {
        println!("{}", truncate(description, crate::constants::limits::PREVIEW_CHARS));
    }
    println!("{:-<60}", "");
    print_entries(list.ordering, list.is_ranked, &list.games);
    Ok(())
}

pub async fn cmd_list_browse(app: &App, search: &str, page: u32) -> anyhow::Result<()> {
    let query = ListQuery {
        page: page.max(1),
        limit: app.config.api.page_size,
        search: search.to_string(),
        ..ListQuery::default()
    };
    let lists = app.client.browse_lists(&query).await?;

    if lists.is_empty() {
        println!("No lists found.");
        return Ok(());
    }

    println!("Lists ({} total, page {})", lists.total(), query.page);
    println!("{:-<70}", "");
    for list in &lists.items {
        print_list_summary(list);
    }
    Ok(())
}

pub async fn cmd_list_popular(app: &App) -> anyhow::Result<()> {
    let lists = app.client.popular_lists().await?;
    if lists.is_empty() {
        println!("No lists yet.");
        return Ok(());
    }
    for list in &lists {
        print_list_summary(list);
    }
    Ok(())
}

#[derive(Debug)]
pub struct NewList {
    pub name: String,
    pub description: String,
    pub ordering: ListOrdering,
    pub ranked: bool,
    pub private: bool,
    pub games: Vec<String>,
}

async fn game_summary(app: &App, game_id: &str) -> anyhow::Result<GameSummary> {
    let game = app
        .client
        .get_game(game_id, &[])
        .await
        .with_context(|| format!("Failed to look up game {game_id}"))?;
    Ok(GameSummary::from(&game))
}

pub async fn cmd_list_create(app: &App, new: NewList) -> anyhow::Result<()> {
    if new.name.trim().is_empty() {
        println!("✗ A list needs a name.");
        return Ok(());
    }

    app.require_user().await?;

    let mut editor = ListEditor::new();
    editor.set_name(new.name);
    editor.set_description(new.description);
    editor.set_ranked(new.ranked);
    editor.set_private(new.private);
    editor.set_ordering(new.ordering);

    for game_id in &new.games {
        let summary = game_summary(app, game_id).await?;
        if let Err(e) = editor.add_game(game_id.as_str(), summary) {
            println!("⚠ {e}");
        }
    }

    let saved = editor.save(&app.client).await?;
    match saved {
        Some(list) => println!("✓ List created: {} [{}]", list.name, list.id),
        None => println!("✓ List created"),
    }
    Ok(())
}

/// Changes requested by `list edit`, applied in field order.
#[derive(Debug, Default)]
pub struct ListEdits {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ordering: Option<ListOrdering>,
    pub ranked: Option<bool>,
    pub private: Option<bool>,
    pub add: Vec<String>,
    pub remove: Vec<String>,
    pub moves: Vec<String>,
    pub notes: Vec<String>,
    pub dry_run: bool,
}

fn parse_move(spec: &str) -> anyhow::Result<(&str, &str)> {
    spec.split_once(':')
        .filter(|(a, b)| !a.is_empty() && !b.is_empty())
        .with_context(|| format!("Invalid move '{spec}', expected <game_id>:<target_game_id>"))
}

fn parse_note(spec: &str) -> anyhow::Result<(&str, &str)> {
    spec.split_once('=')
        .filter(|(id, _)| !id.is_empty())
        .with_context(|| format!("Invalid note '{spec}', expected <game_id>=<text>"))
}

pub async fn cmd_list_edit(app: &App, id: &str, edits: ListEdits) -> anyhow::Result<()> {
    app.require_user().await?;
    let list = app.client.get_list(id).await?;

    let mut editor = match ListEditor::from_list(list, &app.session) {
        Ok(editor) => editor,
        Err(EditorError::NotOwner) => {
            println!("✗ You can only edit your own lists.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(name) = edits.name {
        editor.set_name(name);
    }
    if let Some(description) = edits.description {
        editor.set_description(description);
    }
    if let Some(ranked) = edits.ranked {
        editor.set_ranked(ranked);
    }
    if let Some(private) = edits.private {
        editor.set_private(private);
    }
    if let Some(ordering) = edits.ordering {
        editor.set_ordering(ordering);
    }

    for game_id in &edits.remove {
        if !editor.remove_game(game_id) {
            println!("⚠ Game {game_id} is not in the list");
        }
    }
    for game_id in &edits.add {
        let summary = game_summary(app, game_id).await?;
        if let Err(e) = editor.add_game(game_id.as_str(), summary) {
            println!("⚠ {e}");
        }
    }
    for spec in &edits.moves {
        let (active, over) = parse_move(spec)?;
        if !editor.reorder(active, over) {
            println!("⚠ Could not move {active} onto {over}");
        }
    }
    for spec in &edits.notes {
        let (game_id, note) = parse_note(spec)?;
        editor.set_note(game_id, note)?;
    }

    let draft = editor.draft();
    println!("{} ({})", draft.name, draft.ordering.label());
    println!("{:-<60}", "");
    print_entries(draft.ordering, draft.is_ranked, &draft.games);

    if edits.dry_run {
        println!();
        println!("Dry run, nothing saved.");
        return Ok(());
    }

    editor.save(&app.client).await?;
    println!();
    println!("✓ List saved");
    Ok(())
}

pub async fn cmd_list_like(app: &App, id: &str, like: bool) -> anyhow::Result<()> {
    let user = app.require_user().await?;
    let list = app.client.get_list(id).await?;

    if is_liked_by(list.likes(), &user.id) == like {
        println!("Nothing to do: list already {}.", if like { "liked" } else { "not liked" });
        return Ok(());
    }

    match toggle_like(&app.client, &app.session, &list).await? {
        LikeAction::Liked => println!("♥ Liked list"),
        LikeAction::Unliked => println!("✓ Removed like"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, order: Option<u32>) -> ListEntry {
        ListEntry {
            game_id: id.to_string(),
            note: String::new(),
            order,
            game: None,
        }
    }

    #[test]
    fn test_custom_lists_show_by_position() {
        let entries = vec![entry("a", Some(2)), entry("b", None), entry("c", Some(0))];
        let shown: Vec<&str> = display_order(ListOrdering::Custom, &entries)
            .into_iter()
            .map(|e| e.game_id.as_str())
            .collect();
        assert_eq!(shown, vec!["c", "a", "b"]);

        let shown: Vec<&str> = display_order(ListOrdering::TitleAsc, &entries)
            .into_iter()
            .map(|e| e.game_id.as_str())
            .collect();
        assert_eq!(shown, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_move_and_note() {
        assert_eq!(parse_move("a:b").unwrap(), ("a", "b"));
        assert!(parse_move("a").is_err());
        assert!(parse_move(":b").is_err());
        assert_eq!(parse_note("a=best ever").unwrap(), ("a", "best ever"));
        assert_eq!(parse_note("a=").unwrap(), ("a", ""));
        assert!(parse_note("=x").is_err());
    }
}
