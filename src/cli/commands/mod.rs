mod account;
mod games;
mod home;
mod library;
mod lists;
mod report;
mod reviews;

use anyhow::Context;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::Config;
use crate::models::User;
use crate::session::Session;
use crate::session::tokens::FileTokenStore;
use crate::validation::ValidationErrors;

pub use account::{cmd_login, cmd_logout, cmd_register, cmd_user_show, cmd_user_update, cmd_whoami};
pub use games::{cmd_game, cmd_games};
pub use home::cmd_home;
pub use library::{LibraryChanges, cmd_library_remove, cmd_library_set, cmd_library_show};
pub use lists::{
    ListEdits, NewList, cmd_list_browse, cmd_list_create, cmd_list_edit, cmd_list_like,
    cmd_list_popular, cmd_list_show,
};
pub use report::cmd_report;
pub use reviews::{
    cmd_comments_add, cmd_comments_list, cmd_review_delete, cmd_review_like, cmd_review_list,
    cmd_review_show, cmd_review_write,
};

/// What every command needs: the config, an API client backed by the
/// on-disk token store, and the session.
pub struct App {
    pub config: Config,
    pub client: ApiClient,
    pub session: Session,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let tokens = Arc::new(FileTokenStore::new(config.session.resolved_token_path()));
        let client = ApiClient::new(&config.api, tokens).context("Failed to build API client")?;

        Ok(Self {
            config,
            client,
            session: Session::new(),
        })
    }

    /// Restores the session from stored tokens, failing when nobody is logged in.
    pub async fn require_user(&self) -> anyhow::Result<User> {
        self.session
            .bootstrap(&self.client)
            .await
            .context("Failed to restore session")?
            .ok_or_else(|| anyhow::anyhow!("Not logged in. Run: gamedex login <email>"))
    }

    /// Like [`Self::require_user`], but anonymous use is fine.
    pub async fn optional_user(&self) -> Option<User> {
        match self.session.bootstrap(&self.client).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Could not restore session");
                None
            }
        }
    }
}

pub(crate) fn print_validation(errors: &ValidationErrors) {
    println!("✗ Please fix the following:");
    for error in errors.errors() {
        println!("  {}: {}", error.field, error.message);
    }
}

pub fn print_help() {
    println!("gamedex - browse games, keep a library, write reviews and curate lists");
    println!();
    println!("Usage: gamedex <command>");
    println!();
    println!("  login <email>            Log in");
    println!("  register <user> <email>  Create an account");
    println!("  whoami                   Show the logged-in user");
    println!("  home                     Popular reviews and lists");
    println!("  games <query>            Search games");
    println!("  game <id>                Show a game");
    println!("  library <show|set|rm>    Manage your library");
    println!("  review <...>             Read, write and like reviews");
    println!("  comments <list|add>      Review comments");
    println!("  list <...>               Browse, create and edit lists");
    println!("  user <show|update>       Profiles");
    println!("  report <type> <id>       Check a report");
    println!("  init                     Create config.toml");
    println!();
    println!("Run 'gamedex help <command>' for details.");
}
