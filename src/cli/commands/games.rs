//! Game search and detail command handlers

use super::App;
use super::reviews::print_review_summary;
use crate::client::{GameQuery, ReviewQuery};
use crate::constants::{includes, limits};
use crate::format::truncate;

pub async fn cmd_games(
    app: &App,
    search: &str,
    page: u32,
    order_by: Option<String>,
) -> anyhow::Result<()> {
    let query = GameQuery {
        search: Some(search.to_string()).filter(|s| !s.is_empty()),
        page: Some(page.max(1)),
        limit: Some(app.config.api.page_size),
        order_by,
    };

    let results = app.client.search_games(&query).await?;

    if results.is_empty() {
        println!("No games found.");
        return Ok(());
    }

    println!("Games ({} total, page {page})", results.total());
    println!("{:-<70}", "");

    for game in &results.items {
        let year = game.year.as_deref().unwrap_or("????");
        println!("{} ({year})", game.title);
        println!("  ID: {}", game.id);
    }

    Ok(())
}

pub async fn cmd_game(app: &App, id: &str) -> anyhow::Result<()> {
    let game = app.client.get_game(id, includes::GAME_PAGE).await?;

    println!("{}", game.title);
    println!("{:-<60}", "");
    println!("ID:        {}", game.id);
    if let Some(year) = &game.year {
        println!("Year:      {year}");
    }
    if let Some(state) = game.state {
        println!("State:     {state}");
    }
    if let Some(score) = game.score {
        println!("Score:     {score:.1}");
    }

    let developers: Vec<&str> = game.developers().map(|c| c.name.as_str()).collect();
    if !developers.is_empty() {
        println!("Developer: {}", developers.join(", "));
    }
    let publishers: Vec<&str> = game.publishers().map(|c| c.name.as_str()).collect();
    if !publishers.is_empty() {
        println!("Publisher: {}", publishers.join(", "));
    }
    if !game.platforms.is_empty() {
        let names: Vec<&str> = game.platforms.iter().map(|p| p.name.as_str()).collect();
        println!("Platforms: {}", names.join(", "));
    }
    if !game.genres.is_empty() {
        let names: Vec<&str> = game.genres.iter().map(|g| g.name.as_str()).collect();
        println!("Genres:    {}", names.join(", "));
    }
    if let Some(description) = &game.description {
        println!();
        println!("{}", truncate(description, limits::PREVIEW_CHARS * 2));
    }

    if app.optional_user().await.is_some()
        && let Some(entry) = app.client.get_library_entry(id).await?
    {
        let rating = entry.rating.map(|r| format!(", rated {r}")).unwrap_or_default();
        println!();
        println!("In your library: {}{rating}", entry.status);
    }

    let query = ReviewQuery {
        limit: Some(limits::FEED_SIZE),
        order_by: Some("created_at asc".to_string()),
        ..ReviewQuery::for_game(id)
    }
    .including(includes::GAME_REVIEWS.iter().copied());
    let reviews = app.client.list_reviews(&query).await?;

    println!();
    println!("Latest reviews ({} total)", reviews.total());
    for review in &reviews.items {
        print_review_summary(review);
    }

    Ok(())
}
