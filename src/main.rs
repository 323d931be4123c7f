use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use vinylcli::{
    cli, config,
    discogs::{DiscogsClient, MusicSource},
    error,
    gate::FetchGate,
    management::Collection,
    server::{self, AppState},
    session::{Session, SessionSettings, StdinLines},
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan or type barcodes and titles interactively (default)
    Session(SessionOptions),

    /// Only run the HTTP barcode listener
    Serve,

    /// List the collection with price totals
    List,

    /// Search the collection
    Find(FindOptions),

    /// Sort the collection by genre
    Sort,

    /// Delete a record from the collection
    Delete(DeleteOptions),

    /// Fetch tracklists for every record
    Update,

    /// Download cover images for every record
    Cache,

    /// Look up a barcode or title and offer to save it
    Lookup(LookupOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct SessionOptions {
    /// Also accept barcodes over HTTP while the session runs
    #[clap(long)]
    pub listen: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FindOptions {
    /// Text to look for in key, title, country, year, label, genre and style
    pub query: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteOptions {
    /// Key (barcode or title) the record was saved under
    pub key: String,

    /// Do not ask for confirmation
    #[clap(long)]
    pub yes: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct LookupOptions {
    /// Barcode or title
    pub query: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or(Command::Session(SessionOptions::default()));

    let collection = Collection::open(config::collection_path());
    let gate = Arc::new(FetchGate::new(config::request_interval()));
    let source: Result<Arc<dyn MusicSource>, String> = DiscogsClient::from_env(gate)
        .map(|client| Arc::new(client) as Arc<dyn MusicSource>)
        .map_err(|e| e.to_string());

    match command {
        Command::Session(opt) => {
            if opt.listen {
                let state = Arc::new(AppState::new(
                    collection.clone(),
                    require_source(&source),
                ));
                tokio::spawn(async move {
                    if let Err(e) = server::start_api_server(state).await {
                        warning!("Barcode listener stopped. Err: {}", e);
                    }
                });
            }

            new_session(collection, source.ok()).run().await;
        }
        Command::Serve => {
            let state = Arc::new(AppState::new(collection, require_source(&source)));
            if let Err(e) = server::start_api_server(state).await {
                error!("Barcode listener stopped. Err: {}", e);
            }
        }
        Command::List => {
            cli::list(&collection).await;
        }
        Command::Find(opt) => {
            cli::find(&collection, &opt.query).await;
        }
        Command::Sort => {
            cli::sort(&collection).await;
        }
        Command::Delete(opt) => {
            if opt.yes {
                cli::delete(&collection, &opt.key).await;
            } else {
                new_session(collection, source.ok()).delete(&opt.key).await;
            }
        }
        Command::Update => {
            cli::update(&collection, require_source(&source).as_ref()).await;
        }
        Command::Cache => {
            let assets_dir = config::assets_dir();
            cli::cache(&collection, require_source(&source).as_ref(), &assets_dir).await;
        }
        Command::Lookup(opt) => {
            new_session(collection, source.ok()).lookup(&opt.query).await;
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

fn new_session(
    collection: Collection,
    source: Option<Arc<dyn MusicSource>>,
) -> Session<StdinLines> {
    Session::new(
        StdinLines::new(),
        collection,
        source,
        SessionSettings {
            assets_dir: config::assets_dir(),
            currency: config::currency(),
        },
    )
}

fn require_source(source: &Result<Arc<dyn MusicSource>, String>) -> Arc<dyn MusicSource> {
    match source {
        Ok(source) => Arc::clone(source),
        Err(e) => error!("Cannot set up the Discogs client. Err: {}", e),
    }
}
