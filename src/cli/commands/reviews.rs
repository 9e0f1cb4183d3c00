//! Review and comment command handlers

use chrono::Utc;

use super::{App, print_validation};
use crate::client::ReviewQuery;
use crate::constants::limits;
use crate::format::{compact_count, markdown_to_html, relative_time, truncate};
use crate::likes::{Likeable, LikeAction, is_liked_by, toggle_like};
use crate::models::{Comment, Review, Role};
use crate::validation;

/// Roles allowed to remove other people's reviews.
const MODERATOR_ROLES: &[Role] = &[Role::Admin, Role::GlobalModerator];

pub(super) fn print_review_summary(review: &Review) {
    let author = review.user.as_ref().map_or("someone", |u| u.username.as_str());
    let when = review
        .created_at
        .map(|t| relative_time(t, Utc::now()))
        .unwrap_or_default();
    let game = review
        .game
        .as_ref()
        .map(|g| format!(" on {}", g.title))
        .unwrap_or_default();

    println!(
        "★ {:.1}  {author}{game}  {when}  ♥ {}",
        review.rating(),
        compact_count(review.like_count() as u64)
    );
    println!("  {}", truncate(review.text(), limits::PREVIEW_CHARS));
    println!("  ID: {}", review.id);
}

fn print_comment(comment: &Comment) {
    let author = comment.user.as_ref().map_or("someone", |u| u.username.as_str());
    let when = comment
        .created_at
        .map(|t| relative_time(t, Utc::now()))
        .unwrap_or_default();
    println!("  {author} ({when}): {}", comment.content);
}

pub async fn cmd_review_list(
    app: &App,
    game: Option<String>,
    user: Option<String>,
    page: u32,
) -> anyhow::Result<()> {
    let query = ReviewQuery {
        game_id: game,
        user_id: user,
        page: Some(page.max(1)),
        limit: Some(app.config.api.page_size),
        order_by: Some("created_at desc".to_string()),
        ..ReviewQuery::default()
    }
    .including(["user", "game", "likes", "user_game"]);

    let reviews = app.client.list_reviews(&query).await?;
    if reviews.is_empty() {
        println!("No reviews yet.");
        return Ok(());
    }

    println!("Reviews ({} total, page {page})", reviews.total());
    println!("{:-<70}", "");
    for review in &reviews.items {
        print_review_summary(review);
    }
    Ok(())
}

pub async fn cmd_review_show(app: &App, id: &str, html: bool) -> anyhow::Result<()> {
    let review = app.client.get_review(id).await?;

    print_review_summary(&review);
    println!("{:-<60}", "");
    if html {
        println!("{}", markdown_to_html(review.text()));
    } else {
        println!("{}", review.text());
    }

    let comments = app.client.list_comments(id).await?;
    println!();
    if comments.is_empty() {
        println!("No comments.");
    } else {
        println!("Comments:");
        for comment in &comments {
            print_comment(comment);
        }
    }
    Ok(())
}

/// Creates the user's review of a game, or replaces the one they already wrote.
pub async fn cmd_review_write(app: &App, game_id: &str, text: &str) -> anyhow::Result<()> {
    if let Err(errors) = validation::validate_review(text) {
        print_validation(&errors);
        return Ok(());
    }

    let user = app.require_user().await?;

    match app.client.find_user_review(game_id, &user.id).await? {
        Some(existing) => {
            app.client.update_review(&existing.id, text).await?;
            println!("✓ Review updated");
        }
        None => {
            app.client.create_review(game_id, text).await?;
            println!("✓ Review added");
        }
    }
    Ok(())
}

pub async fn cmd_review_delete(app: &App, id: &str) -> anyhow::Result<()> {
    let user = app.require_user().await?;
    let review = app.client.get_review(id).await?;

    if review.user_id != user.id && !app.session.has_role(MODERATOR_ROLES) {
        println!("✗ You can only delete your own reviews.");
        return Ok(());
    }

    app.client.delete_review(id).await?;
    println!("✓ Review deleted");
    Ok(())
}

pub async fn cmd_review_like(app: &App, id: &str, like: bool) -> anyhow::Result<()> {
    let user = app.require_user().await?;
    let review = app.client.get_review(id).await?;

    if is_liked_by(review.likes(), &user.id) == like {
        println!("Nothing to do: review already {}.", if like { "liked" } else { "not liked" });
        return Ok(());
    }

    match toggle_like(&app.client, &app.session, &review).await? {
        LikeAction::Liked => println!("♥ Liked review"),
        LikeAction::Unliked => println!("✓ Removed like"),
    }
    Ok(())
}

pub async fn cmd_comments_list(app: &App, review_id: &str) -> anyhow::Result<()> {
    let comments = app.client.list_comments(review_id).await?;
    if comments.is_empty() {
        println!("No comments.");
        return Ok(());
    }
    for comment in &comments {
        print_comment(comment);
    }
    Ok(())
}

pub async fn cmd_comments_add(app: &App, review_id: &str, content: &str) -> anyhow::Result<()> {
    if let Err(errors) = validation::validate_comment(content) {
        print_validation(&errors);
        return Ok(());
    }

    app.require_user().await?;
    app.client.add_comment(review_id, content).await?;
    println!("✓ Comment added");
    Ok(())
}
