use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use streamflow::config::AppConfig;
use streamflow::models::{EventStatus, LeadStatus};
use streamflow::pipeline;
use streamflow::sources;
use streamflow::{export, Reconciler, Store};

#[derive(Parser, Debug)]
#[command(name = "streamflow", version, about = "Event lead aggregator")]
struct Cli {
    /// Database file; defaults to the platform data dir
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pull every enabled source and reconcile into the store
    Sync,
    /// Event counts by status
    Stats,
    /// Upcoming events, soonest first
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Registered sources
    Sources,
    /// Event or lead CSV export
    Export {
        #[arg(value_parser = ["events", "leads"])]
        kind: String,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Lead funnel value by stage
    Pipeline,
    /// Price a package selection
    Quote {
        package: String,
        /// Comma-separated add-on codes
        #[arg(long, value_delimiter = ',')]
        services: Vec<String>,
        #[arg(long, default_value_t = Decimal::ZERO)]
        discount: Decimal,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_default();
    let database = cli
        .database
        .clone()
        .unwrap_or_else(|| config.database_path());

    match cli.command {
        Command::Sync => {
            let store = Store::open(&database)?;
            let mut reconciler = Reconciler::new(&store);
            for adapter in sources::default_adapters() {
                if config.source_enabled(adapter.name()) {
                    reconciler.register(adapter);
                }
            }
            let report = reconciler.run()?;
            println!(
                "Found {} events from {} sources",
                report.total_found, report.sources_synced
            );
        }
        Command::Stats => {
            let stats = Store::open(&database)?.stats()?;
            println!("Total:      {}", stats.total);
            println!("New:        {}", stats.new);
            println!("Contacted:  {}", stats.contacted);
            println!("Qualified:  {}", stats.qualified);
            println!("Offer sent: {}", stats.offer_sent);
            println!("Won:        {}", stats.won);
            println!("Lost:       {}", stats.lost);
            println!("Rejected:   {}", stats.rejected);
        }
        Command::List { status, limit } => {
            let status = status
                .as_deref()
                .map(EventStatus::from_str)
                .transpose()?;
            let events = Store::open(&database)?.events(status, limit)?;
            for event in events {
                println!(
                    "[{}★] {} | {} | {}",
                    event.potential_score, event.name, event.date_start, event.location
                );
            }
        }
        Command::Sources => {
            for source in sources::list_sources() {
                println!("{} ({})", source.name, source.url);
            }
        }
        Command::Export { kind, output } => {
            let store = Store::open(&database)?;
            let csv = match kind.as_str() {
                "events" => export::events_to_csv(&store.events(None, u32::MAX)?)?,
                _ => export::leads_to_csv(&store.leads(None, u32::MAX)?)?,
            };
            match output {
                Some(path) => fs::write(path, csv)?,
                None => print!("{csv}"),
            }
        }
        Command::Pipeline => {
            let store = Store::open(&database)?;
            let leads = store.leads(None, u32::MAX)?;
            let value = pipeline::pipeline_value(&leads);
            let won = leads
                .iter()
                .filter(|lead| lead.status == LeadStatus::Won)
                .count() as u64;
            println!("New:         {:.2}", value.new);
            println!("Active:      {:.2}", value.active);
            println!("Offer sent:  {:.2}", value.offer_sent);
            println!("Negotiation: {:.2}", value.negotiation);
            println!("Won:         {:.2}", value.won);
            println!("Lost:        {:.2}", value.lost);
            println!("Total:       {:.2}", value.total);
            println!(
                "Conversion:  {}%",
                pipeline::conversion_rate(leads.len() as u64, won)
            );
        }
        Command::Quote {
            package,
            services,
            discount,
        } => {
            let breakdown = streamflow::quote(
                &package,
                services.iter().map(String::as_str),
                discount,
            );
            println!("Package:    {package}");
            println!("Base:       {}", breakdown.base_price);
            println!("Add-ons:    {}", breakdown.additional_total);
            println!("Subtotal:   {}", breakdown.subtotal);
            println!("Discount:   {}", breakdown.discount_amount);
            println!("Net:        {}", breakdown.net);
            println!("VAT (23%):  {}", breakdown.vat);
            println!("Gross:      {}", breakdown.gross);
            if package == "enterprise" {
                println!("Enterprise pricing is quoted individually.");
            }
        }
    }

    Ok(())
}
