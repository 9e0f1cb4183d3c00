//! Home feed command handler

use super::App;
use super::lists::print_list_summary;
use super::reviews::print_review_summary;
use crate::client::ReviewQuery;
use crate::constants::{includes, limits};
use crate::format::pluralize;

pub async fn cmd_home(app: &App) -> anyhow::Result<()> {
    if let Some(user) = app.optional_user().await {
        let query = ReviewQuery {
            limit: Some(limits::FEED_SIZE),
            library_count: true,
            order_by: Some("created_at desc".to_string()),
            ..ReviewQuery::by_user(&user.id)
        }
        .including(["game"]);
        let mine = app.client.list_reviews(&query).await?;

        println!("Welcome back, {}", user.username);
        println!("You have written {}.", pluralize("review", mine.total()));
        for review in &mine.items {
            print_review_summary(review);
        }
        println!();
    }

    let query = ReviewQuery {
        limit: Some(limits::FEED_SIZE),
        order_by: Some("likes".to_string()),
        ..ReviewQuery::default()
    }
    .including(includes::POPULAR_REVIEWS.iter().copied());
    let popular = app.client.list_reviews(&query).await?;

    println!("Popular reviews");
    println!("{:-<70}", "");
    if popular.is_empty() {
        println!("Nothing here yet.");
    }
    for review in &popular.items {
        print_review_summary(review);
    }

    let lists = app.client.popular_lists().await?;
    println!();
    println!("Popular lists");
    println!("{:-<70}", "");
    if lists.is_empty() {
        println!("Nothing here yet.");
    }
    for list in &lists {
        print_list_summary(list);
    }

    Ok(())
}
