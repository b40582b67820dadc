//! Scrawl CLI
//!
//! Command-line interface for Scrawl - posts, categories, and users.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scrawl_core::{Identity, Store};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "scrawl")]
#[command(about = "Scrawl - personal publishing store")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage posts
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// List all tags with usage counts
    Tags,
    /// Fill the store with sample data
    Seed,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (data location, counts, active user)
    Status,
}

#[derive(Subcommand)]
enum PostCommands {
    /// Create a new post
    #[command(alias = "add")]
    Create {
        /// Post title
        title: String,
        /// Post content (opens a prompt if not provided)
        #[arg(short, long)]
        content: Option<String>,
        /// Category name or ID
        #[arg(short = 'C', long)]
        category: String,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// List posts, one page at a time
    #[command(alias = "ls")]
    List {
        /// Free-text search over title and content
        #[arg(short, long)]
        term: Option<String>,
        /// Filter by category name or ID
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Filter by author email or ID
        #[arg(short, long)]
        author: Option<String>,
        /// Only your own posts
        #[arg(short, long)]
        mine: bool,
        /// Filter by tag (repeat to match any of several)
        #[arg(long)]
        tag: Vec<String>,
        /// Sort field: created_at, updated_at, or title
        #[arg(short, long)]
        sort: Option<String>,
        /// Sort direction: asc or desc
        #[arg(short, long)]
        direction: Option<String>,
        /// Continuation cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,
        /// Skip counting the filtered total
        #[arg(long)]
        no_total: bool,
    },
    /// Show post details
    Show {
        /// Post ID (full UUID or prefix)
        id: String,
    },
    /// Edit a post
    Edit {
        /// Post ID (full UUID or prefix)
        id: String,
    },
    /// Delete a post
    #[command(alias = "rm")]
    Delete {
        /// Post ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a new category
    #[command(alias = "add")]
    Create {
        /// Category name
        name: String,
    },
    /// List all categories
    #[command(alias = "ls")]
    List,
    /// Delete a category (fails while posts reference it)
    #[command(alias = "rm")]
    Delete {
        /// Category name or ID
        category: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    #[command(alias = "add")]
    Create {
        /// Email address (unique)
        email: String,
        /// First name
        first_name: String,
        /// Last name
        #[arg(short, long)]
        last_name: Option<String>,
    },
    /// List all users
    #[command(alias = "ls")]
    List,
    /// Select the active user by email or ID
    Use {
        /// User email or ID
        user: String,
    },
    /// Show the active user
    Current,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, default_limit, show_totals)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays scriptable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config doesn't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let mut store = Store::open()?;
    let identity = Identity::with_config(store.config().clone());

    match cli.command {
        Commands::Post { command } => handle_post_command(command, &mut store, &identity, &output),
        Commands::Category { command } => handle_category_command(command, &store, &output),
        Commands::User { command } => handle_user_command(command, &store, &identity, &output),
        Commands::Tags => commands::tag::list(&store, &output),
        Commands::Seed => commands::seed::run(&mut store, &identity, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &identity, &output),
    }
}

fn handle_post_command(
    command: PostCommands,
    store: &mut Store,
    identity: &Identity,
    output: &Output,
) -> Result<()> {
    match command {
        PostCommands::Create {
            title,
            content,
            category,
            tag,
        } => commands::post::create(store, identity, title, content, category, tag, output),
        PostCommands::List {
            term,
            category,
            author,
            mine,
            tag,
            sort,
            direction,
            cursor,
            limit,
            no_total,
        } => {
            let request = commands::post::ListRequest {
                term,
                category,
                author,
                mine,
                tags: tag,
                sort,
                direction,
                cursor,
                limit,
                no_total,
            };
            commands::post::list(store, identity, request, output)
        }
        PostCommands::Show { id } => commands::post::show(store, id, output),
        PostCommands::Edit { id } => commands::post::edit(store, identity, id, output),
        PostCommands::Delete { id } => commands::post::delete(store, identity, id, output),
    }
}

fn handle_category_command(
    command: CategoryCommands,
    store: &Store,
    output: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::Create { name } => commands::category::create(store, name, output),
        CategoryCommands::List => commands::category::list(store, output),
        CategoryCommands::Delete { category } => {
            commands::category::delete(store, category, output)
        }
    }
}

fn handle_user_command(
    command: UserCommands,
    store: &Store,
    identity: &Identity,
    output: &Output,
) -> Result<()> {
    match command {
        UserCommands::Create {
            email,
            first_name,
            last_name,
        } => commands::user::create(store, email, first_name, last_name, output),
        UserCommands::List => commands::user::list(store, output),
        UserCommands::Use { user } => commands::user::switch(store, identity, user, output),
        UserCommands::Current => commands::user::current(store, identity, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
