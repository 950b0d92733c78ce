//! CLI tool for ticket-type setup and list-view inspection.
//!
//! Works directly on the site snapshot in the data directory:
//! - seed or disable ticket types
//! - grant roles to users
//! - print field catalogs, sort keys and list views as JSON

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use helpdesk_core::config::DeskConfig;
use helpdesk_core::ops::{self, ListRequest};
use helpdesk_core::persistence::SnapshotManager;
use helpdesk_core::{seed, Session, Site};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory holding the site snapshot
    #[arg(long, global = true, default_value = "./data")]
    data_dir: PathBuf,

    /// User the read commands run as
    #[arg(long, global = true, default_value = "Administrator")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the fallback "Unspecified" ticket type
    CreateFallback,
    /// Create the out-of-the-box ticket types
    CreateOotb,
    /// Disable every ticket type outside the enabled catalogue
    Disable,
    /// Give a role to a user
    GrantRole { user: String, role: String },
    /// Print the filterable fields of a doctype
    Fields { doctype: String },
    /// Print the sort keys of a doctype
    SortOptions { doctype: String },
    /// Print a list view of a doctype
    List {
        doctype: String,
        /// Filters as JSON, e.g. '{"status": "Open"}'
        #[arg(long)]
        filters: Option<String>,
        #[arg(long)]
        order_by: Option<String>,
        /// Zero prints every record
        #[arg(long)]
        page_length: Option<usize>,
        /// List the tickets visible to this manager
        #[arg(long)]
        manager: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DeskConfig {
        data_dir: cli.data_dir.clone(),
        ..DeskConfig::default()
    };
    let snapshots = SnapshotManager::new(&config);
    let site = snapshots
        .open_site(&config)
        .with_context(|| format!("Failed to open site in {}", config.data_dir.display()))?;
    let session = Session::new(cli.user.as_str());

    match cli.command {
        Command::CreateFallback => {
            let created = seed::create_fallback_ticket_type(site.database.as_ref())?;
            println!(
                "{}",
                if created {
                    "Created fallback ticket type"
                } else {
                    "Fallback ticket type already exists"
                }
            );
            save(&snapshots, &site)?;
        }
        Command::CreateOotb => {
            let created = seed::create_ootb_ticket_types(site.database.as_ref())?;
            println!("Created {} ticket type(s)", created.len());
            for name in created {
                println!("  {}", name);
            }
            save(&snapshots, &site)?;
        }
        Command::Disable => {
            let report = seed::disable_ticket_types(site.database.as_ref())?;
            print_json(&report)?;
            save(&snapshots, &site)?;
        }
        Command::GrantRole { user, role } => {
            site.permissions.assign_role(&user, &role)?;
            println!("Granted role '{}' to {}", role, user);
            save(&snapshots, &site)?;
        }
        Command::Fields { doctype } => {
            let fields = ops::get_filterable_fields(&site.services(), &session, &doctype)?;
            print_json(&fields)?;
        }
        Command::SortOptions { doctype } => {
            let options = ops::sort_options(&site.services(), &session, &doctype)?;
            print_json(&options)?;
        }
        Command::List {
            doctype,
            filters,
            order_by,
            page_length,
            manager,
        } => {
            let mut filters: Value = match filters {
                Some(text) => serde_json::from_str(&text).context("--filters is not valid JSON")?,
                None => Value::Null,
            };
            let mut request = ListRequest::new(&doctype);
            if let Some(order_by) = order_by {
                request = request.with_order_by(&order_by);
            }
            if let Some(page_length) = page_length {
                request = request.with_page_length(page_length);
            }

            let payload = match manager {
                Some(manager) => {
                    if !filters.is_object() {
                        filters = Value::Object(Default::default());
                    }
                    if let Value::Object(map) = &mut filters {
                        map.insert("owner".to_string(), Value::String(manager));
                    }
                    ops::get_tickets_list(&site.services(), &session, &request.with_filters(filters))?
                }
                None => ops::get_list_data(&site.services(), &session, &request.with_filters(filters))?,
            };
            print_json(&payload)?;
        }
    }
    Ok(())
}

fn save(snapshots: &SnapshotManager, site: &Site) -> anyhow::Result<()> {
    snapshots
        .save(site)
        .with_context(|| format!("Failed to save {}", snapshots.path().display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
