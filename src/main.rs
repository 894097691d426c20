use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::broadcast::error::TryRecvError;

use articles::app::article::{ArticleScreen, ArticleState, Intent, Notify, search};
use articles::app::config::Config;
use articles::env::Env;
use articles::fs::Fs;
use articles::log::Log;
use articles::repository::{Catalog, Repository};
use articles::{ArcStr, arc_path};

const SCOPE: &str = "main";

#[derive(Parser)]
#[command(name = "articles")]
#[command(about = "Read articles from the catalog and act on them")]
struct Cli {
    /// Configuration file, `~/.config/articles/config.toml` by default
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the articles of the catalog
    Catalog,
    /// Open an article and perform actions on it
    Read {
        /// Article id
        #[arg(required = true)]
        id: String,
        /// Actions to perform, in order
        #[arg(short, long, value_enum)]
        intent: Vec<Action>,
        /// Search the content for this text
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    Like,
    Bookmark,
    Share,
    Menu,
    NightMode,
    UpText,
    DownText,
}

impl From<Action> for Intent {
    fn from(action: Action) -> Self {
        match action {
            Action::Like => Intent::Like,
            Action::Bookmark => Intent::Bookmark,
            Action::Share => Intent::Share,
            Action::Menu => Intent::ToggleMenu,
            Action::NightMode => Intent::NightMode,
            Action::UpText => Intent::UpText,
            Action::DownText => Intent::DownText,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = Env::spawn();
    let fs = Fs::spawn();

    let config_path = match cli.config {
        Some(path) => path,
        None => {
            let home = env
                .var(ArcStr::from("HOME"))
                .await
                .context("Locating home directory")?;
            PathBuf::from(home.as_ref())
                .join(".config")
                .join("articles")
                .join("config.toml")
        }
    };
    let config = Config::spawn(fs.clone(), arc_path(&config_path));
    if config.load().await.is_err() {
        config.save().await?;
    }

    let settings = config.get().await;

    let log = Log::spawn(
        fs.clone(),
        settings.log.level,
        settings.log.max_age,
        settings.log_dir(),
    )
    .await?;
    log.collect_garbage().await;

    let catalog = match Catalog::load(&fs, settings.catalog_path()).await {
        Ok(catalog) => catalog,
        Err(err) => {
            log.warn(SCOPE, format!("Using the bundled catalog: {err:#}"));
            Catalog::sample()?
        }
    };
    let repository = Repository::spawn(catalog, settings.latency(), log.clone());

    log.info(SCOPE, "Starting articles CLI");

    let result = match cli.command {
        Commands::Catalog => handle_catalog_command(&repository).await,
        Commands::Read { id, intent, search } => {
            handle_read_command(&repository, &log, id, intent, search).await
        }
    };

    let result = log.error_on_error(SCOPE, result);
    log.flush().await;
    result
}

/// Handle the catalog command to list the known articles
async fn handle_catalog_command(repository: &Repository) -> anyhow::Result<()> {
    let articles = repository.articles().await;
    if articles.is_empty() {
        println!("The catalog is empty");
        return Ok(());
    }

    for article in articles {
        println!("{}. {} [{}]", article.id, article.title, article.category);
        if let Some(author) = article.author {
            println!("   Author: {author}");
        }
        println!("   Date: {}", article.date.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("   Link: {}", article.share_link);
        println!();
    }
    Ok(())
}

/// Handle the read command: wait for the article, then replay the actions
async fn handle_read_command(
    repository: &Repository,
    log: &Log,
    id: String,
    actions: Vec<Action>,
    search: Option<String>,
) -> anyhow::Result<()> {
    let screen =
        ArticleScreen::spawn(ArcStr::from(id.clone()), repository.clone(), log.clone()).await;
    let mut notifications = screen.notifications().await;
    let mut state = screen.state().await;

    println!("Loading article '{id}'...");
    let wait = state.wait_for(|s| s.title.is_some() && !s.is_loading_content);
    match tokio::time::timeout(Duration::from_secs(10), wait).await {
        Ok(Ok(_)) => {}
        _ => {
            screen.close().await;
            anyhow::bail!("Article '{id}' is not available");
        }
    }
    print_state(&screen.current().await);

    for action in actions {
        screen.perform(action.into()).await;
        print_notifications(&mut notifications);
    }

    if let Some(query) = search {
        screen.handle_search_mode(true).await;
        screen.handle_search(Some(query.clone())).await;
        print_search(&screen.current().await, &query);
    }

    println!();
    print_state(&screen.current().await);
    screen.close().await;
    Ok(())
}

fn print_state(state: &ArticleState) {
    let flag = |on: bool| if on { "yes" } else { "no" };

    println!("{}", state.title.as_deref().unwrap_or("<untitled>"));
    if let Some(category) = &state.category {
        println!("   Category: {category}");
    }
    if let Some(date) = &state.date {
        println!("   Date: {date}");
    }
    if let Some(link) = &state.share_link {
        println!("   Link: {link}");
    }
    println!(
        "   Liked: {} | Bookmarked: {} | Menu: {} | Dark mode: {} | Big text: {}",
        flag(state.is_like),
        flag(state.is_bookmark),
        flag(state.is_show_menu),
        flag(state.is_dark_mode),
        flag(state.is_big_text),
    );
    println!("   Blocks: {}", state.content.len());
}

fn print_notifications(notifications: &mut tokio::sync::broadcast::Receiver<Notify>) {
    loop {
        match notifications.try_recv() {
            Ok(Notify::Text { message }) => println!("> {message}"),
            Ok(Notify::Action { message, label, .. }) => println!("> {message} [{label}]"),
            Ok(Notify::Error { message, label, .. }) => println!("! {message} [{label}]"),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

fn print_search(state: &ArticleState, query: &str) {
    let text: Vec<char> = search::plain_text(&state.content)
        .chars()
        .collect();
    println!("Found {} match(es) for '{query}'", state.search_results.len());
    for (i, &(start, end)) in state.search_results.iter().enumerate() {
        let from = start.saturating_sub(20);
        let to = (end + 20).min(text.len());
        let context: String = text[from..to].iter().collect();
        println!("{}. ...{}...", i + 1, context.replace('\n', " "));
    }
}
