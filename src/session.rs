//! Interactive session.
//!
//! Reads one line at a time from an input producer and handles it completely
//! before reading the next one. Lines starting with a slash are collection
//! commands, anything else is looked up in the music database.
//!
//! ```text
//! /list            whole collection with price totals
//! /find <query>    search the collection
//! /sort            sort the collection by genre
//! /delete <key>    delete a record after confirmation
//! /update          fetch tracklists for all records
//! /cache           download cover images for all records
//! <barcode|title>  look up and offer to save
//! ```

use std::{io::Write, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::{
    cli::{self, Outcome, render, store_failed},
    discogs::MusicSource,
    info,
    lookup::{self, LookupResult},
    management::{Collection, StoreError},
    success,
    types::Record,
    utils, warning,
};

pub const PROMPT: &str = "Scan barcode or enter name manually:";

/// Producer of input lines, e.g. a terminal or a barcode scanner.
#[async_trait]
pub trait LineSource: Send {
    /// Next line without its line break, `None` once input has ended.
    async fn next_line(&mut self) -> Option<String>;
}

pub struct StdinLines {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinLines {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineSource for StdinLines {
    async fn next_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                warning!("Cannot read input. Err: {}", e);
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Find(String),
    Sort,
    Delete(String),
    Update,
    Cache,
    Empty,
    Lookup(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line.is_empty() {
            return Command::Empty;
        }
        if line == "/list" {
            return Command::List;
        }
        if let Some(rest) = argument(line, "/find") {
            return Command::Find(rest.to_string());
        }
        if line.starts_with("/sort") {
            return Command::Sort;
        }
        if let Some(rest) = argument(line, "/delete") {
            return Command::Delete(rest.to_string());
        }
        if line.starts_with("/update") {
            return Command::Update;
        }
        if line.starts_with("/cache") {
            return Command::Cache;
        }

        Command::Lookup(line.to_string())
    }
}

/// `rest` for `"<command> rest"` or `""` for a bare `"<command>"`.
fn argument<'a>(line: &'a str, command: &str) -> Option<&'a str> {
    if line == command {
        return Some("");
    }
    line.strip_prefix(command)
        .and_then(|rest| rest.strip_prefix(' '))
        .map(str::trim)
}

/// Steps of the dialog creating a record by hand. Each step consumes exactly
/// one input line.
enum CustomEntry {
    AwaitingConfirmation,
    AwaitingTitle,
    AwaitingPrice { title: String },
}

pub struct SessionSettings {
    pub assets_dir: PathBuf,
    pub currency: String,
}

pub struct Session<L: LineSource> {
    input: L,
    collection: Collection,
    source: Option<Arc<dyn MusicSource>>,
    settings: SessionSettings,
}

impl<L: LineSource> Session<L> {
    pub fn new(
        input: L,
        collection: Collection,
        source: Option<Arc<dyn MusicSource>>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            input,
            collection,
            source,
            settings,
        }
    }

    /// Prompts and handles lines until input ends.
    pub async fn run(&mut self) {
        loop {
            println!("{}", PROMPT);
            let Some(line) = self.input.next_line().await else {
                break;
            };
            self.handle_line(&line).await;
        }
    }

    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        match Command::parse(line) {
            Command::Empty => Outcome::Idle,
            Command::List => cli::list(&self.collection).await,
            Command::Find(query) => cli::find(&self.collection, &query).await,
            Command::Sort => cli::sort(&self.collection).await,
            Command::Delete(key) => self.delete(&key).await,
            Command::Update => match self.source.clone() {
                Some(source) => cli::update(&self.collection, source.as_ref()).await,
                None => source_missing(),
            },
            Command::Cache => match self.source.clone() {
                Some(source) => {
                    cli::cache(&self.collection, source.as_ref(), &self.settings.assets_dir).await
                }
                None => source_missing(),
            },
            Command::Lookup(query) => self.lookup(&query).await,
        }
    }

    /// Asks for confirmation, then deletes.
    pub async fn delete(&mut self, key: &str) -> Outcome {
        if key.is_empty() {
            warning!("Usage: /delete <key>");
            return Outcome::Idle;
        }

        match self.collection.exists(key).await {
            Ok(true) => {}
            Ok(false) => {
                warning!("No record with key {} in collection.", key);
                return Outcome::Missing(key.to_string());
            }
            Err(e) => return read_failed(e),
        }

        match self.ask(&format!("Delete {}? (y/n)", key)).await {
            Some(answer) if utils::is_confirmation(&answer) => {
                cli::delete(&self.collection, key).await
            }
            _ => {
                info!("Nothing deleted.");
                Outcome::Declined
            }
        }
    }

    pub async fn lookup(&mut self, query: &str) -> Outcome {
        let Some(source) = self.source.clone() else {
            return source_missing();
        };

        info!("Looking up {}...", query);
        match lookup::lookup(source.as_ref(), query).await {
            Ok(LookupResult::Found(record)) => self.offer_save(record).await,
            Ok(LookupResult::NotFound { key }) => self.offer_custom(key).await,
            Err(e) => {
                warning!("{}", e);
                Outcome::Failed(e.to_string())
            }
        }
    }

    async fn offer_save(&mut self, record: Record) -> Outcome {
        render::print_record(&record);

        match self.collection.exists(&record.key).await {
            Ok(true) => {
                info!("Record {} is already in the collection.", record.key);
                return Outcome::AlreadyStored(record.key);
            }
            Ok(false) => {}
            Err(e) => return read_failed(e),
        }

        match self.ask("Save to collection? (y/n)").await {
            Some(answer) if utils::is_confirmation(&answer) => self.save(record).await,
            _ => Outcome::Declined,
        }
    }

    async fn offer_custom(&mut self, key: String) -> Outcome {
        warning!("No record found for {}.", key);

        match self.collection.exists(&key).await {
            Ok(true) => {
                info!("Record {} is already in the collection.", key);
                return Outcome::AlreadyStored(key);
            }
            Ok(false) => {}
            Err(e) => return read_failed(e),
        }

        let mut step = CustomEntry::AwaitingConfirmation;
        loop {
            let prompt = match &step {
                CustomEntry::AwaitingConfirmation => "Create a custom record? (y/n)",
                CustomEntry::AwaitingTitle => "Title:",
                CustomEntry::AwaitingPrice { .. } => "Price:",
            };
            let Some(answer) = self.ask(prompt).await else {
                return Outcome::Declined;
            };

            step = match step {
                CustomEntry::AwaitingConfirmation if utils::is_confirmation(&answer) => {
                    CustomEntry::AwaitingTitle
                }
                CustomEntry::AwaitingConfirmation => return Outcome::Declined,
                CustomEntry::AwaitingTitle => {
                    let title = answer.trim();
                    CustomEntry::AwaitingPrice {
                        title: if title.is_empty() { key.clone() } else { title.to_string() },
                    }
                }
                CustomEntry::AwaitingPrice { title } => {
                    let record = Record::custom(key, &title, &answer, &self.settings.currency);
                    return self.save(record).await;
                }
            };
        }
    }

    async fn save(&mut self, record: Record) -> Outcome {
        let key = record.key.clone();
        match self.collection.insert(record).await {
            Ok(()) => {
                success!("Record {} saved to {}.", key, self.collection.location());
                Outcome::Saved(key)
            }
            Err(StoreError::DuplicateKey(key)) => {
                warning!("Record {} is already in the collection.", key);
                Outcome::AlreadyStored(key)
            }
            Err(e) => store_failed(&self.collection, e),
        }
    }

    async fn ask(&mut self, question: &str) -> Option<String> {
        print!("{} ", question);
        if let Err(e) = std::io::stdout().flush() {
            warning!("Cannot write prompt. Err: {}", e);
        }
        self.input.next_line().await
    }
}

fn source_missing() -> Outcome {
    warning!("Discogs is not configured. Set DISCOGS_TOKEN or DISCOGS_KEY and DISCOGS_SECRET.");
    Outcome::Failed("music source not configured".to_string())
}

fn read_failed(e: StoreError) -> Outcome {
    warning!("Failed to load collection. Err: {}", e);
    Outcome::Failed(e.to_string())
}
