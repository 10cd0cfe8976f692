use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use watchlog::api::{friends, media, reviews, watchlist};
use watchlog::auth::navigator::{LOGIN_ROUTE, Navigator};
use watchlog::config::ConfigError;
use watchlog::library::{LibraryFilter, LibraryView};
use watchlog::net::types::{MediaType, NewReview, NewWatchlistItem, WatchStatus, WatchlistUpdate};
use watchlog::store::FileTokenStore;
use watchlog::{ApiClient, ApiError, AuthContext, ClientConfig};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `watchlog login <email>` first")]
    NotLoggedIn,
    #[error("no watchlist item with id `{0}`")]
    UnknownItem(String),
    #[error("missing password; pass --password or set WATCHLOG_PASSWORD")]
    MissingPassword,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "watchlog", about = "Track movies and shows against a watchlog server")]
struct Cli {
    #[arg(long, env = "WATCHLOG_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "WATCHLOG_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Repeat for more log output on stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        email: String,
        #[arg(long, env = "WATCHLOG_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Register {
        #[arg(long)]
        name: String,
        email: String,
        #[arg(long, env = "WATCHLOG_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Logout,
    /// Restore the stored session and print the current user.
    Whoami,
    Search {
        query: String,
        #[arg(long = "type")]
        media_type: Option<MediaType>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Media {
        media_type: MediaType,
        id: i64,
    },
    Watchlist(WatchlistCommand),
    Review(ReviewCommand),
    Friends(FriendsCommand),
}

#[derive(Args, Debug)]
struct WatchlistCommand {
    #[command(subcommand)]
    command: WatchlistSubcommand,
}

#[derive(Subcommand, Debug)]
enum WatchlistSubcommand {
    List {
        #[arg(long, default_value = "")]
        filter: String,
        #[arg(long = "type")]
        media_type: Option<MediaType>,
        #[arg(long)]
        status: Option<WatchStatus>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Add {
        media_type: MediaType,
        media_id: i64,
        /// Looked up from media details when omitted.
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "plan_to_watch")]
        status: WatchStatus,
    },
    Status {
        id: String,
        status: WatchStatus,
    },
    Rate {
        id: String,
        rating: u8,
        #[arg(long)]
        notes: Option<String>,
    },
    Rm {
        id: String,
    },
}

#[derive(Args, Debug)]
struct ReviewCommand {
    #[command(subcommand)]
    command: ReviewSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReviewSubcommand {
    List {
        media_type: MediaType,
        media_id: i64,
    },
    Add {
        media_type: MediaType,
        media_id: i64,
        rating: u8,
        content: String,
    },
    Rm {
        id: String,
    },
}

#[derive(Args, Debug)]
struct FriendsCommand {
    #[command(subcommand)]
    command: FriendsSubcommand,
}

#[derive(Subcommand, Debug)]
enum FriendsSubcommand {
    List,
    Add { email: String },
    Activity,
}

/// Prints the redirect where a browser would navigate.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect_to_login(&self) {
        eprintln!("session ended; log in again ({LOGIN_ROUTE})");
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config = config.with_api_url(api_url)?;
    }
    if let Some(state_dir) = cli.state_dir {
        config.state_dir = state_dir;
    }

    let store = Arc::new(FileTokenStore::new(config.session_file()));
    let client = ApiClient::from_config(&config, store, Arc::new(TerminalNavigator))?;
    let auth = AuthContext::new(Arc::new(client), config.timeouts.logout());

    match cli.command {
        Command::Login { email, password } => run_login(&auth, &email, password).await,
        Command::Register { name, email, password } => run_register(&auth, &name, &email, password).await,
        Command::Logout => {
            auth.logout().await;
            eprintln!("logged out");
            Ok(())
        }
        Command::Whoami => {
            let session = auth.bootstrap().await;
            let user = session.user.ok_or(CliError::NotLoggedIn)?;
            print_json(&user)
        }
        command => {
            require_session(&auth).await?;
            run_authenticated(auth.client(), command).await
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();
}

async fn require_session(auth: &AuthContext) -> Result<(), CliError> {
    if auth.bootstrap().await.is_authenticated { Ok(()) } else { Err(CliError::NotLoggedIn) }
}

async fn run_login(auth: &AuthContext, email: &str, password: Option<String>) -> Result<(), CliError> {
    let password = password.ok_or(CliError::MissingPassword)?;
    let user = auth.login(email, &password).await?;
    eprintln!("logged in as {}", user.display_name());
    Ok(())
}

async fn run_register(auth: &AuthContext, name: &str, email: &str, password: Option<String>) -> Result<(), CliError> {
    let password = password.ok_or(CliError::MissingPassword)?;
    let resp = auth.register(name, email, &password).await?;
    eprintln!("{}", resp.message.as_deref().unwrap_or("account created; log in to continue"));
    Ok(())
}

async fn run_authenticated(client: &ApiClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::Search { query, media_type, page } => {
            let results = media::search(client, &query, media_type, page).await?;
            eprintln!("page {} of {}", results.page, results.total_pages);
            print_json(&results.results)
        }
        Command::Media { media_type, id } => print_json(&media::details(client, media_type, id).await?),
        Command::Watchlist(cmd) => run_watchlist(client, cmd.command).await,
        Command::Review(cmd) => run_review(client, cmd.command).await,
        Command::Friends(cmd) => run_friends(client, cmd.command).await,
        Command::Login { .. } | Command::Register { .. } | Command::Logout | Command::Whoami => Ok(()),
    }
}

async fn run_watchlist(client: &ApiClient, command: WatchlistSubcommand) -> Result<(), CliError> {
    match command {
        WatchlistSubcommand::List { filter, media_type, status, json } => {
            let items = watchlist::list(client).await?;
            let filter = LibraryFilter { term: filter, media_type, status };
            if json {
                // Server order; grouping is only for the text view.
                return print_json(&filter.select(&items));
            }
            print_library(&LibraryView::build(&items, &filter));
            Ok(())
        }
        WatchlistSubcommand::Add { media_type, media_id, title, status } => {
            let title = match title {
                Some(title) => title,
                None => media::details(client, media_type, media_id).await?.title,
            };
            let item = watchlist::add(client, &NewWatchlistItem { media_id, media_type, title, status }).await?;
            print_json(&item)
        }
        WatchlistSubcommand::Status { id, status } => {
            let items = watchlist::list(client).await?;
            let item = items.iter().find(|item| item.id == id).ok_or(CliError::UnknownItem(id))?;
            print_json(&watchlist::transition(client, item, status).await?)
        }
        WatchlistSubcommand::Rate { id, rating, notes } => {
            let update = WatchlistUpdate { rating: Some(rating), notes, ..WatchlistUpdate::default() };
            print_json(&watchlist::update(client, &id, &update).await?)
        }
        WatchlistSubcommand::Rm { id } => {
            watchlist::remove(client, &id).await?;
            eprintln!("removed {id}");
            Ok(())
        }
    }
}

async fn run_review(client: &ApiClient, command: ReviewSubcommand) -> Result<(), CliError> {
    match command {
        ReviewSubcommand::List { media_type, media_id } => {
            print_json(&reviews::for_media(client, media_type, media_id).await?)
        }
        ReviewSubcommand::Add { media_type, media_id, rating, content } => {
            let review = NewReview { media_id, media_type, rating, content };
            print_json(&reviews::create(client, &review).await?)
        }
        ReviewSubcommand::Rm { id } => {
            reviews::remove(client, &id).await?;
            eprintln!("removed review {id}");
            Ok(())
        }
    }
}

async fn run_friends(client: &ApiClient, command: FriendsSubcommand) -> Result<(), CliError> {
    match command {
        FriendsSubcommand::List => print_json(&friends::list(client).await?),
        FriendsSubcommand::Add { email } => {
            friends::send_request(client, &email).await?;
            eprintln!("friend request sent to {}", email.trim());
            Ok(())
        }
        FriendsSubcommand::Activity => print_json(&friends::activity(client).await?),
    }
}

fn print_library(view: &LibraryView<'_>) {
    if view.is_empty() {
        println!("(no matching items)");
        return;
    }
    for section in &view.sections {
        println!("== {} ({}) ==", section.media_type, section.len());
        for group in &section.groups {
            println!("  {} ({})", group.status, group.items.len());
            for item in &group.items {
                match item.rating {
                    Some(rating) => println!("    {}  {}  [{rating}/10]", item.id, item.title),
                    None => println!("    {}  {}", item.id, item.title),
                }
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
