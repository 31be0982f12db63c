// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// setzkasten — administer CUPS queues over IPP and maintain the PPD
// driver index from the command line.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use setzkasten_core::config::AgentConfig;
use setzkasten_core::error::Result;
use setzkasten_core::types::{
    ClassSettings, DestKind, JobSheets, PrinterSettings, PrinterState,
};
use setzkasten_cups::CupsClient;
use setzkasten_ppd::PpdIndexer;

#[derive(Parser)]
#[command(name = "setzkasten", about = "CUPS queue administration and PPD driver index")]
struct Cli {
    /// CUPS server hostname (overrides CUPS_SERVER).
    #[arg(long, global = true)]
    server: Option<String>,

    /// IPP port (overrides IPP_PORT).
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the PPD database if the driver directory changed
    BuildDb {
        /// Rebuild even when the database looks current
        #[arg(long)]
        force: bool,
    },
    /// Report whether the PPD database is stale or current
    CheckDb,
    /// Parse a single PPD file and show its derived index record
    FileInfo { path: PathBuf },
    /// Query the PPD database for a vendor's models or a model's drivers
    Lookup {
        vendor: String,
        model: Option<String>,
    },
    /// Create or modify a printer queue
    AddPrinter {
        name: String,
        #[arg(long)]
        info: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        device_uri: Option<String>,
        /// Name of a PPD known to cupsd
        #[arg(long)]
        ppd: Option<String>,
        /// Queue state: idle or stopped
        #[arg(long, value_parser = parse_state)]
        state: Option<PrinterState>,
        #[arg(long)]
        state_message: Option<String>,
        /// Whether the queue accepts new jobs (true/false)
        #[arg(long)]
        accepting: Option<bool>,
        #[arg(long)]
        banner_start: Option<String>,
        #[arg(long)]
        banner_end: Option<String>,
        /// Users allowed to print (repeatable; wins over --deny)
        #[arg(long = "allow")]
        allow: Vec<String>,
        /// Users denied printing (repeatable)
        #[arg(long = "deny")]
        deny: Vec<String>,
    },
    /// Delete a printer queue
    DelPrinter { name: String },
    /// Create or modify a class of printers
    AddClass {
        name: String,
        /// Member printer name (repeatable)
        #[arg(long = "member")]
        members: Vec<String>,
        #[arg(long)]
        info: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, value_parser = parse_state)]
        state: Option<PrinterState>,
        #[arg(long)]
        accepting: Option<bool>,
        #[arg(long = "allow")]
        allow: Vec<String>,
        #[arg(long = "deny")]
        deny: Vec<String>,
    },
    /// Delete a class
    DelClass { name: String },
    /// Show the default destination, or set it when a name is given
    Default { name: Option<String> },
    /// List classes with their member printers
    Classes,
    /// Enumerate the destinations a server exports
    Remote {
        host: String,
        /// Enumerate classes instead of printers
        #[arg(long)]
        classes: bool,
    },
    /// Fetch the PPD associated with a destination
    GetPpd {
        dest: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_state(s: &str) -> std::result::Result<PrinterState, String> {
    PrinterState::from_keyword(s).ok_or_else(|| format!("'{s}' is not 'idle' or 'stopped'"))
}

fn banners(start: Option<String>, end: Option<String>) -> Option<JobSheets> {
    if start.is_none() && end.is_none() {
        return None;
    }
    let defaults = JobSheets::default();
    Some(JobSheets {
        start: start.unwrap_or(defaults.start),
        end: end.unwrap_or(defaults.end),
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "command failed");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AgentConfig::from_env();
    if let Some(server) = cli.server {
        config.server = server;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    match cli.command {
        Command::BuildDb { force } => {
            let outcome = PpdIndexer::from_config(&config).ensure_fresh(force)?;
            if outcome.rebuilt {
                println!("indexed {} PPD files", outcome.indexed);
            } else {
                println!("database is current");
            }
        }
        Command::CheckDb => {
            let indexer = PpdIndexer::from_config(&config);
            println!(
                "{}",
                if indexer.is_stale()? { "stale" } else { "current" }
            );
        }
        Command::FileInfo { path } => {
            let info = PpdIndexer::file_info(&path)?;
            println!("vendor:  {}", info.vendor);
            println!("model:   {}", info.model);
            println!("driver:  {}", info.driver);
            if !info.lang.is_empty() {
                println!("lang:    {}", info.lang);
            }
            if !info.pnp_vendor.is_empty() || !info.pnp_model.is_empty() {
                println!("pnp:     {} {}", info.pnp_vendor, info.pnp_model);
            }
        }
        Command::Lookup { vendor, model } => {
            let db = PpdIndexer::from_config(&config).load()?;
            match model {
                None => {
                    let Some(models) = db.models(&vendor) else {
                        eprintln!("unknown vendor '{vendor}'");
                        process::exit(1);
                    };
                    for model in models.keys() {
                        println!("{model}");
                    }
                }
                Some(model) => {
                    let Some(drivers) = db.drivers(&vendor, &model) else {
                        eprintln!("no drivers for '{vendor} {model}'");
                        process::exit(1);
                    };
                    for (driver, info) in drivers {
                        println!("{driver}\t{}", info.filename);
                    }
                }
            }
        }
        Command::AddPrinter {
            name,
            info,
            location,
            device_uri,
            ppd,
            state,
            state_message,
            accepting,
            banner_start,
            banner_end,
            allow,
            deny,
        } => {
            let settings = PrinterSettings {
                name,
                info,
                location,
                device_uri,
                ppd_name: ppd,
                state,
                state_message,
                accepting,
                banners: banners(banner_start, banner_end),
                allow_users: allow.into_iter().collect(),
                deny_users: deny.into_iter().collect(),
            };
            CupsClient::from_config(&config).add_printer(&settings).await?;
        }
        Command::DelPrinter { name } => {
            CupsClient::from_config(&config).delete_printer(&name).await?;
        }
        Command::AddClass {
            name,
            members,
            info,
            location,
            state,
            accepting,
            allow,
            deny,
        } => {
            let settings = ClassSettings {
                name,
                info,
                location,
                state,
                accepting,
                allow_users: allow.into_iter().collect(),
                deny_users: deny.into_iter().collect(),
                members: members.into_iter().collect::<BTreeSet<_>>(),
                ..ClassSettings::default()
            };
            CupsClient::from_config(&config).add_class(&settings).await?;
        }
        Command::DelClass { name } => {
            CupsClient::from_config(&config).delete_class(&name).await?;
        }
        Command::Default { name } => {
            let client = CupsClient::from_config(&config);
            match name {
                Some(name) => client.set_default(&name).await?,
                None => match client.default_destination().await? {
                    Some(dest) => println!("{dest}"),
                    None => println!("no default destination"),
                },
            }
        }
        Command::Classes => {
            for class in CupsClient::from_config(&config).classes().await? {
                println!("{}: {}", class.name, class.members.join(", "));
            }
        }
        Command::Remote { host, classes } => {
            let client = CupsClient::new(host, config.port);
            let kind = if classes {
                DestKind::Classes
            } else {
                DestKind::Printers
            };
            for uri in client.remote_destinations(kind).await? {
                println!("{uri}");
            }
        }
        Command::GetPpd { dest, output } => {
            let client = CupsClient::from_config(&config);
            match client.fetch_ppd(&dest).await? {
                Some(body) => match output {
                    Some(path) => std::fs::write(path, body)?,
                    None => print!("{}", String::from_utf8_lossy(&body)),
                },
                None => {
                    eprintln!("no PPD associated with '{dest}'");
                    process::exit(1);
                }
            }
        }
    }
    Ok(())
}
