//! Library entry command handlers

use super::{App, print_validation};
use crate::models::LibraryForm;
use crate::validation;

/// Fields given on the command line; unset ones keep their stored value.
#[derive(Debug, Default)]
pub struct LibraryChanges {
    pub status: Option<String>,
    pub platform: Option<String>,
    pub rating: Option<f64>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub mastered: Option<bool>,
}

impl LibraryChanges {
    fn apply(self, form: &mut LibraryForm) {
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(platform) = self.platform {
            form.played_on = platform;
        }
        if self.rating.is_some() {
            form.rating = self.rating;
        }
        if self.start.is_some() {
            form.start_date = self.start;
        }
        if self.end.is_some() {
            form.end_date = self.end;
        }
        if let Some(mastered) = self.mastered {
            form.mastered = mastered;
        }
    }
}

pub async fn cmd_library_show(app: &App, game_id: &str) -> anyhow::Result<()> {
    app.require_user().await?;

    let Some(entry) = app.client.get_library_entry(game_id).await? else {
        println!("Game {game_id} is not in your library.");
        return Ok(());
    };

    let title = entry.game.as_ref().map_or(game_id, |g| g.title.as_str());
    println!("{title}");
    println!("{:-<60}", "");
    println!("Status:    {}", entry.status);
    if let Some(platform) = &entry.played_on {
        println!("Platform:  {platform}");
    }
    if let Some(rating) = entry.rating {
        println!("Rating:    {rating}");
    }
    if let Some(start) = &entry.start_date {
        println!("Started:   {start}");
    }
    if let Some(end) = &entry.end_date {
        println!("Finished:  {end}");
    }
    if entry.mastered {
        println!("Mastered:  yes");
    }
    Ok(())
}

pub async fn cmd_library_set(
    app: &App,
    game_id: &str,
    changes: LibraryChanges,
) -> anyhow::Result<()> {
    app.require_user().await?;

    let existing = app.client.get_library_entry(game_id).await?;
    let mut form = existing.as_ref().map(LibraryForm::from).unwrap_or_default();
    changes.apply(&mut form);

    if let Err(errors) = validation::validate_library_entry(&form) {
        print_validation(&errors);
        return Ok(());
    }

    app.client
        .save_library_entry(game_id, &form, existing.is_some())
        .await?;

    if existing.is_some() {
        println!("✓ Library entry updated");
    } else {
        println!("✓ Added to your library");
    }
    Ok(())
}

pub async fn cmd_library_remove(app: &App, game_id: &str) -> anyhow::Result<()> {
    app.require_user().await?;
    app.client.remove_library_entry(game_id).await?;
    println!("✓ Removed from your library");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_only_touch_given_fields() {
        let mut form = LibraryForm {
            status: "playing".into(),
            played_on: "pc".into(),
            rating: Some(7.0),
            ..LibraryForm::default()
        };

        LibraryChanges {
            status: Some("completed".into()),
            mastered: Some(true),
            ..LibraryChanges::default()
        }
        .apply(&mut form);

        assert_eq!(form.status, "completed");
        assert_eq!(form.played_on, "pc");
        assert_eq!(form.rating, Some(7.0));
        assert!(form.mastered);
    }
}
