use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use offerdeck::api::{ApiClient, ApiClientBuilder};
use offerdeck::compare::{compare_users, compare_with_bounce_back};
use offerdeck::credentials::{CredentialSource, EnvCredentials, EnvOrPromptCredentials};
use offerdeck::extract::extract_all_sailings;
use offerdeck::fetch::{UserOffers, fetch_two_users, fetch_user_offers};
use offerdeck::models::Filters;
use offerdeck::normalize::parse_calendar_date;
use offerdeck::{bounceback, report};

/// offerdeck - casino cruise offer comparison CLI
#[derive(Parser)]
#[command(name = "offerdeck")]
#[command(about = "Fetches casino cruise offers and compares them across sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one account's offers against a bounce-back CSV
    BounceBack(BounceBackCommand),
    /// Compare two accounts' offers against each other
    CompareUsers(CompareUsersCommand),
}

#[derive(Args)]
struct BounceBackCommand {
    /// Path to the bounce-back CSV file
    #[arg(long, value_name = "PATH", default_value = "./bounce-back.csv")]
    csv_file: PathBuf,

    /// Output format for the saved comparison results
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Args)]
struct CompareUsersCommand {
    /// Output format for the saved comparison results
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

/// Filter flags shared by both subcommands.
#[derive(Args)]
struct FilterArgs {
    /// Comma-separated ship names (case-insensitive substring match)
    #[arg(long, value_name = "SHIPS")]
    ships: Option<String>,

    /// Keep sailings departing on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    start_date: Option<String>,

    /// Keep sailings departing on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    end_date: Option<String>,

    /// Comma-separated departure ports (case-insensitive substring match)
    #[arg(long, value_name = "PORTS")]
    ports: Option<String>,

    /// Minimum number of nights (sailings with an unknown count are kept)
    #[arg(long, value_name = "N")]
    min_days: Option<u32>,

    /// Five-character offer-code prefix
    #[arg(long, value_name = "PREFIX")]
    offer_prefix: Option<String>,
}

impl FilterArgs {
    fn to_filters(&self) -> Filters {
        Filters {
            ships: self.ships.as_deref().map(split_list),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            ports: self.ports.as_deref().map(split_list),
            min_days: self.min_days,
            offer_code_prefix: self.offer_prefix.clone(),
        }
    }
}

fn main() {
    if Path::new(".env").exists() {
        let _ = dotenvy::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::BounceBack(cmd) => handle_bounce_back(cmd),
        Commands::CompareUsers(cmd) => handle_compare_users(cmd),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors cover bad flag values and missing configuration; internal
/// errors cover network and I/O failures.
fn is_user_error(error: &anyhow::Error) -> bool {
    let message = format!("{error:#}");
    message.contains("is not set")
        || message.contains("invalid ")
        || message.contains("cannot be before")
        || message.contains("is not configured")
}

fn handle_bounce_back(cmd: &BounceBackCommand) -> Result<()> {
    let filters = cmd.filters.to_filters();
    validate_date_filters(&filters)?;

    let credentials = EnvOrPromptCredentials.credentials("USER1")?;
    let client = build_client()?;
    let user = fetch_user_offers(&client, &credentials, "USER1")?;

    write_json("offers.json", &user.offers_with_details)?;
    println!("Offer data saved to offers.json");

    let csv_text = fs::read_to_string(&cmd.csv_file).with_context(|| {
        format!(
            "failed to read bounce-back CSV {}",
            cmd.csv_file.display()
        )
    })?;
    let bounce_back = bounceback::parse_bounce_back(&csv_text);
    let api_sailings = extract_all_sailings(&user.offers_with_details);
    let result = compare_with_bounce_back(api_sailings, bounce_back, &filters);

    println!("{}", report::bounce_back_console_report(&result));

    match cmd.format {
        OutputFormat::Csv => {
            fs::write("comparison-results.csv", report::bounce_back_csv(&result))
                .context("failed to write comparison-results.csv")?;
            println!("Detailed comparison results saved to comparison-results.csv");
        }
        OutputFormat::Json => {
            write_json("comparison-results.json", &result)?;
            println!("Detailed comparison results saved to comparison-results.json");
        }
    }

    Ok(())
}

fn handle_compare_users(cmd: &CompareUsersCommand) -> Result<()> {
    let filters = cmd.filters.to_filters();
    validate_date_filters(&filters)?;

    let user1_credentials = EnvCredentials.credentials("USER1")?;
    let user2_credentials = EnvCredentials.credentials("USER2")?;
    let client = build_client()?;

    let (user1, user2) = fetch_two_users(&client, &user1_credentials, &user2_credentials)?;

    write_json("offers-user1.json", &user1)?;
    write_json("offers-user2.json", &user2)?;
    write_json("offers-combined.json", &combined_payload(&user1, &user2))?;
    println!("Offer data saved to offers-user1.json, offers-user2.json, offers-combined.json");

    let result = compare_users(
        &user1.offers_with_details,
        &user2.offers_with_details,
        &filters,
    );

    println!("{}", report::user_comparison_console_report(&result));

    match cmd.format {
        OutputFormat::Json => {
            write_json("comparison-results.json", &result)?;
            println!("Detailed comparison results saved to comparison-results.json");
        }
        OutputFormat::Csv => {
            fs::write("comparison-results.csv", report::user_comparison_csv(&result))
                .context("failed to write comparison-results.csv")?;
            println!("Detailed comparison results saved to comparison-results.csv");
        }
    }

    Ok(())
}

fn build_client() -> Result<ApiClient> {
    ApiClientBuilder::new()
        .build()
        .context("failed to build API client")
}

fn combined_payload(user1: &UserOffers, user2: &UserOffers) -> serde_json::Value {
    serde_json::json!({
        "user1": {
            "userInfo": user1.user_info,
            "offerCount": user1.offers_with_details.len(),
            "offers": user1.offers_with_details,
        },
        "user2": {
            "userInfo": user2.user_info,
            "offerCount": user2.offers_with_details.len(),
            "offers": user2.offers_with_details,
        },
    })
}

fn write_json(path: &str, value: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {path}"))?;
    fs::write(path, json).with_context(|| format!("failed to write {path}"))
}

/// Rejects unparseable date bounds and inverted ranges before any network
/// call is made.
fn validate_date_filters(filters: &Filters) -> Result<()> {
    let start = match filters.start_date.as_deref() {
        Some(raw) => Some(
            parse_calendar_date(raw)
                .with_context(|| format!("invalid start date {raw:?}; expected YYYY-MM-DD"))?,
        ),
        None => None,
    };
    let end = match filters.end_date.as_deref() {
        Some(raw) => Some(
            parse_calendar_date(raw)
                .with_context(|| format!("invalid end date {raw:?}; expected YYYY-MM-DD"))?,
        ),
        None => None,
    };
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        bail!(
            "end date ({}) cannot be before start date ({})",
            filters.end_date.as_deref().unwrap_or_default(),
            filters.start_date.as_deref().unwrap_or_default(),
        );
    }
    Ok(())
}

/// Splits comma-separated flag values, trimming whitespace and dropping
/// empty entries.
fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
