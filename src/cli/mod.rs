//! CLI module - Command-line interface for gamedex
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::models::{ListOrdering, ReportType};

/// gamedex - browse games, keep a library, write reviews and curate lists
#[derive(Parser)]
#[command(name = "gamedex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with email and password
    Login {
        email: String,
        #[arg(long, env = "GAMEDEX_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in
    Register {
        username: String,
        email: String,
        #[arg(long, env = "GAMEDEX_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored tokens
    Logout,

    /// Show the logged-in user
    #[command(alias = "me")]
    Whoami,

    /// Popular reviews and lists, plus your latest reviews
    Home,

    /// Search the game catalogue
    #[command(alias = "search", alias = "s")]
    Games {
        /// Search query
        query: Vec<String>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long)]
        order_by: Option<String>,
    },

    /// Show a game with its latest reviews
    #[command(alias = "g")]
    Game {
        id: String,
    },

    /// Manage your library entries
    #[command(alias = "lib")]
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },

    /// Read and write reviews
    #[command(alias = "r")]
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },

    /// Read and add review comments
    Comments {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Browse and edit game lists
    #[command(alias = "l")]
    List {
        #[command(subcommand)]
        command: ListCommands,
    },

    /// Profiles
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Check a report and print the payload that would be filed
    Report {
        #[arg(value_parser = parse_report_type)]
        report_type: ReportType,
        entity_id: String,
        /// One of the reasons offered for the report type
        #[arg(long)]
        reason: Option<String>,
        #[arg(long, default_value = "")]
        content: String,
    },

    /// Create default config file
    Init,
}

#[derive(Subcommand)]
pub enum LibraryCommands {
    /// Show your entry for a game
    Show { game_id: String },
    /// Add a game to your library or update the entry
    Set {
        game_id: String,
        #[arg(long)]
        status: Option<String>,
        /// Platform you played on
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        mastered: Option<bool>,
    },
    /// Remove a game from your library
    #[command(alias = "rm")]
    Remove { game_id: String },
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// Reviews for a game, or by a user
    #[command(alias = "ls")]
    List {
        #[arg(long, conflicts_with = "user")]
        game: Option<String>,
        #[arg(long)]
        user: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Show a review with its comments
    Show {
        id: String,
        /// Print the body as HTML
        #[arg(long)]
        html: bool,
    },
    /// Write your review of a game, replacing an existing one
    Write {
        game_id: String,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Delete one of your reviews
    #[command(alias = "rm")]
    Delete { id: String },
    Like { id: String },
    Unlike { id: String },
}

#[derive(Subcommand)]
pub enum CommentCommands {
    #[command(alias = "ls")]
    List { review_id: String },
    Add {
        review_id: String,
        #[arg(required = true)]
        content: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// Show a list in its display order
    Show { id: String },
    /// Browse public lists
    Browse {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Most liked lists
    Popular,
    /// Create a list
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_ordering, default_value = "title_asc")]
        ordering: ListOrdering,
        #[arg(long)]
        ranked: bool,
        #[arg(long)]
        private: bool,
        /// Game ids to add, in order
        #[arg(long = "game")]
        games: Vec<String>,
    },
    /// Edit one of your lists
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_ordering)]
        ordering: Option<ListOrdering>,
        #[arg(long)]
        ranked: Option<bool>,
        #[arg(long)]
        private: Option<bool>,
        #[arg(long = "add")]
        add: Vec<String>,
        #[arg(long = "remove")]
        remove: Vec<String>,
        /// Drag a game onto another: `<game_id>:<target_game_id>`
        #[arg(long = "move")]
        moves: Vec<String>,
        /// Set a note: `<game_id>=<text>`
        #[arg(long = "note")]
        notes: Vec<String>,
        /// Print the result without saving
        #[arg(long)]
        dry_run: bool,
    },
    Like { id: String },
    Unlike { id: String },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Show a profile
    Show { id: String },
    /// Update your own profile
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        confirm_password: Option<String>,
    },
}

fn parse_ordering(s: &str) -> Result<ListOrdering, String> {
    s.parse()
}

fn parse_report_type(s: &str) -> Result<ReportType, String> {
    s.parse()
}

/// Runs one parsed command line.
pub async fn dispatch(cli: Cli, config: Config) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        commands::print_help();
        return Ok(());
    };

    if let Commands::Init = command {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists.");
        }
        return Ok(());
    }

    let app = commands::App::new(config)?;

    match command {
        Commands::Login { email, password } => commands::cmd_login(&app, &email, &password).await,
        Commands::Register {
            username,
            email,
            password,
        } => commands::cmd_register(&app, &username, &email, &password).await,
        Commands::Logout => commands::cmd_logout(&app),
        Commands::Whoami => commands::cmd_whoami(&app).await,
        Commands::Home => commands::cmd_home(&app).await,
        Commands::Games {
            query,
            page,
            order_by,
        } => commands::cmd_games(&app, &query.join(" "), page, order_by).await,
        Commands::Game { id } => commands::cmd_game(&app, &id).await,
        Commands::Library { command } => match command {
            LibraryCommands::Show { game_id } => commands::cmd_library_show(&app, &game_id).await,
            LibraryCommands::Set {
                game_id,
                status,
                platform,
                rating,
                start,
                end,
                mastered,
            } => {
                let changes = commands::LibraryChanges {
                    status,
                    platform,
                    rating,
                    start,
                    end,
                    mastered,
                };
                commands::cmd_library_set(&app, &game_id, changes).await
            }
            LibraryCommands::Remove { game_id } => {
                commands::cmd_library_remove(&app, &game_id).await
            }
        },
        Commands::Review { command } => match command {
            ReviewCommands::List { game, user, page } => {
                commands::cmd_review_list(&app, game, user, page).await
            }
            ReviewCommands::Show { id, html } => commands::cmd_review_show(&app, &id, html).await,
            ReviewCommands::Write { game_id, text } => {
                commands::cmd_review_write(&app, &game_id, &text.join(" ")).await
            }
            ReviewCommands::Delete { id } => commands::cmd_review_delete(&app, &id).await,
            ReviewCommands::Like { id } => commands::cmd_review_like(&app, &id, true).await,
            ReviewCommands::Unlike { id } => commands::cmd_review_like(&app, &id, false).await,
        },
        Commands::Comments { command } => match command {
            CommentCommands::List { review_id } => {
                commands::cmd_comments_list(&app, &review_id).await
            }
            CommentCommands::Add { review_id, content } => {
                commands::cmd_comments_add(&app, &review_id, &content.join(" ")).await
            }
        },
        Commands::List { command } => match command {
            ListCommands::Show { id } => commands::cmd_list_show(&app, &id).await,
            ListCommands::Browse { search, page } => {
                commands::cmd_list_browse(&app, &search, page).await
            }
            ListCommands::Popular => commands::cmd_list_popular(&app).await,
            ListCommands::Create {
                name,
                description,
                ordering,
                ranked,
                private,
                games,
            } => {
                let draft = commands::NewList {
                    name,
                    description,
                    ordering,
                    ranked,
                    private,
                    games,
                };
                commands::cmd_list_create(&app, draft).await
            }
            ListCommands::Edit {
                id,
                name,
                description,
                ordering,
                ranked,
                private,
                add,
                remove,
                moves,
                notes,
                dry_run,
            } => {
                let edits = commands::ListEdits {
                    name,
                    description,
                    ordering,
                    ranked,
                    private,
                    add,
                    remove,
                    moves,
                    notes,
                    dry_run,
                };
                commands::cmd_list_edit(&app, &id, edits).await
            }
            ListCommands::Like { id } => commands::cmd_list_like(&app, &id, true).await,
            ListCommands::Unlike { id } => commands::cmd_list_like(&app, &id, false).await,
        },
        Commands::User { command } => match command {
            UserCommands::Show { id } => commands::cmd_user_show(&app, &id).await,
            UserCommands::Update {
                username,
                email,
                password,
                confirm_password,
            } => {
                commands::cmd_user_update(&app, username, email, password, confirm_password).await
            }
        },
        Commands::Report {
            report_type,
            entity_id,
            reason,
            content,
        } => commands::cmd_report(report_type, &entity_id, reason, &content),
        Commands::Init => Ok(()),
    }
}
