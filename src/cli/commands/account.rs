//! Login, registration and profile command handlers

use anyhow::Context;

use super::{App, print_validation};
use crate::client::users::ProfileUpdate;
use crate::format::pluralize;
use crate::models::User;
use crate::validation;

pub async fn cmd_login(app: &App, email: &str, password: &str) -> anyhow::Result<()> {
    if let Err(errors) = validation::validate_login(email, password) {
        print_validation(&errors);
        return Ok(());
    }

    app.client.login(email, password).await?;
    let user = app.require_user().await?;
    println!("✓ Logged in as {}", user.username);
    Ok(())
}

pub async fn cmd_register(
    app: &App,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    if let Err(errors) = validation::validate_registration(username, email, password) {
        print_validation(&errors);
        return Ok(());
    }

    app.client.register(username, email, password).await?;
    println!("✓ Account created. Welcome, {username}!");
    Ok(())
}

pub fn cmd_logout(app: &App) -> anyhow::Result<()> {
    app.session
        .logout(&app.client)
        .context("Failed to clear stored tokens")?;
    println!("✓ Logged out");
    Ok(())
}

pub async fn cmd_whoami(app: &App) -> anyhow::Result<()> {
    let Some(user) = app.optional_user().await else {
        println!("Not logged in.");
        return Ok(());
    };

    println!("{} ({})", user.username, user.role);
    if let Some(email) = &user.email {
        println!("Email: {email}");
    }
    println!("ID:    {}", user.id);
    Ok(())
}

pub async fn cmd_user_show(app: &App, id: &str) -> anyhow::Result<()> {
    let user = app.client.get_user(id).await?;
    print_profile(&user);
    Ok(())
}

fn print_profile(user: &User) {
    println!("{} [{}]", user.username, user.role);
    if let Some(joined) = user.created_at {
        println!("Joined {}", joined.format("%B %Y"));
    }
    println!("{:-<60}", "");
    println!(
        "{} | {} | {}",
        pluralize("game", user.user_games.len() as u64),
        pluralize("review", user.reviews.len() as u64),
        pluralize("list", user.lists.len() as u64)
    );

    if !user.lists.is_empty() {
        println!();
        println!("Lists:");
        for list in &user.lists {
            println!("  • {} ({}) [{}]", list.name, pluralize("game", list.game_count()), list.id);
        }
    }

    if !user.user_games.is_empty() {
        println!();
        println!("Library:");
        for entry in &user.user_games {
            let title = entry.game.as_ref().map_or("?", |g| g.title.as_str());
            let rating = entry
                .rating
                .map(|r| format!(" ★ {r}"))
                .unwrap_or_default();
            println!("  • {title} - {}{rating}", entry.status);
        }
    }
}

pub async fn cmd_user_update(
    app: &App,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
) -> anyhow::Result<()> {
    let current = app.require_user().await?;

    let update = ProfileUpdate {
        username: username.unwrap_or(current.username),
        email: email.or(current.email).unwrap_or_default(),
        password: password.filter(|p| !p.is_empty()),
        confirm_password: confirm_password.filter(|p| !p.is_empty()),
    };

    if let Err(errors) = validation::validate_profile_update(
        &update.username,
        &update.email,
        update.password.as_deref(),
        update.confirm_password.as_deref(),
    ) {
        print_validation(&errors);
        return Ok(());
    }

    let saved = app.client.update_user(&update).await?;
    let username = saved.map_or(update.username, |u| u.username);
    println!("✓ Profile updated ({username})");
    Ok(())
}
