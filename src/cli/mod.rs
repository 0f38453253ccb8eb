//! Top-level CLI parsing and command execution.
//!
//! The subcommands run the same pipeline the chat handler uses, which
//! makes them handy for poking at the registry without a workspace.

use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::entities::{NO_RECORDS_TEXT, is_no_records};
use crate::error::BotError;
use crate::query::{self, Query};
use crate::render::{jurisdictions, pretty_time};
use crate::sources::registry::RegistryClient;
use crate::transform::{dedupe_records, filings_from_records};

#[derive(Parser, Debug)]
#[command(
    name = "filings-bot",
    about = "Look up organizations in the public-records registry and list their filings",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON instead of text
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interpret free text the way the chat handler would and run the
    /// lookup pipeline
    Lookup {
        /// Query text: an identifier, an organization name, or a
        /// braced key-value literal
        text: Vec<String>,
    },
    /// List an organization's filings in relay order
    Filings {
        /// Organization identifier (hyphens allowed)
        identifier: String,
    },
}

pub async fn run(cli: Cli) -> Result<(), BotError> {
    match cli.command {
        Commands::Lookup { text } => lookup(&text.join(" "), cli.json).await,
        Commands::Filings { identifier } => filings(&identifier, cli.json).await,
    }
}

async fn lookup(text: &str, json: bool) -> Result<(), BotError> {
    let started = Instant::now();
    let registry = RegistryClient::new()?;

    let query = query::interpret(&query::normalize(text.trim()));
    let records = registry.lookup_with_variants(&query).await?;
    if is_no_records(&records) {
        println!("{NO_RECORDS_TEXT}");
        return Ok(());
    }

    let entries = dedupe_records(&records);
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{} results in {}\n",
        entries.len(),
        pretty_time(started.elapsed())
    );
    for entry in &entries {
        println!(
            "{}  {} ({})",
            entry.identifier,
            entry.organization_name,
            jurisdictions::label_or_code(&entry.jurisdiction)
        );
    }
    Ok(())
}

async fn filings(identifier: &str, json: bool) -> Result<(), BotError> {
    let registry = RegistryClient::new()?;

    let digits = identifier.replace('-', "");
    let records = registry.lookup(&Query::identifier(digits)).await?;
    if is_no_records(&records) {
        println!("{NO_RECORDS_TEXT}");
        return Ok(());
    }

    let filings = filings_from_records(&records);
    if json {
        println!("{}", serde_json::to_string_pretty(&filings)?);
        return Ok(());
    }

    let total = filings.len();
    for (index, filing) in filings.iter().enumerate() {
        println!(
            "{}/{}  {:>4}  {:<8}  {}",
            index + 1,
            total,
            filing.filing_year,
            filing.filing_form,
            filing.document_link
        );
    }
    Ok(())
}
