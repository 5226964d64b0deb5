use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ClientConfig, ConfigOverrides, InventoryStore, RemoteInventory};
use shared::domain::{Item, ItemDraft, ItemId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Manage the cloud inventory table from a terminal")]
struct Args {
    /// Config file; defaults to the per-user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    project_url: Option<String>,
    #[arg(long, global = true)]
    api_key: Option<String>,
    #[arg(long, global = true)]
    table: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print every item, newest first.
    List,
    Add {
        name: String,
        quantity: String,
    },
    Update {
        /// Row identifier as shown by `list`; integer or text.
        id: String,
        name: String,
        quantity: String,
    },
    Delete {
        id: String,
    },
}

/// Both fields must be non-empty before anything is sent.
fn item_draft(name: &str, quantity: &str) -> Result<ItemDraft> {
    let draft = ItemDraft::new(name, quantity);
    if draft.has_empty_field() {
        bail!("name and quantity must both be non-empty");
    }
    Ok(draft)
}

fn item_id(raw: &str) -> Result<ItemId> {
    if raw.is_empty() {
        bail!("item id must not be empty");
    }
    Ok(ItemId::parse(raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::load(
        args.config.as_deref(),
        ConfigOverrides {
            project_url: args.project_url,
            api_key: args.api_key,
            table: args.table,
        },
    )
    .context("loading client configuration")?;
    let inventory = RemoteInventory::from_config(&config).context("building table client")?;
    tracing::debug!(project_url = %config.project_url, table = %config.table, "using table");

    match args.command {
        Command::List => {
            let items = inventory.list_items().await.context("Error loading")?;
            print!("{}", format_items(&items));
        }
        Command::Add { name, quantity } => {
            let draft = item_draft(&name, &quantity)?;
            inventory.create_item(&draft).await.context("Error creating")?;
            println!("Added {}", draft.name);
        }
        Command::Update { id, name, quantity } => {
            let id = item_id(&id)?;
            let draft = item_draft(&name, &quantity)?;
            inventory
                .update_item(&id, &draft)
                .await
                .context("Error updating")?;
            println!("Updated item {id}");
        }
        Command::Delete { id } => {
            let id = item_id(&id)?;
            inventory.delete_item(&id).await.context("Error deleting")?;
            println!("Deleted item {id}");
        }
    }
    Ok(())
}

fn format_items(items: &[Item]) -> String {
    if items.is_empty() {
        return "No items.\n".to_string();
    }

    let id_width = items
        .iter()
        .map(|item| item.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    let name_width = items
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Product".len());

    let mut out = format!("{:<id_width$}  {:<name_width$}  Quantity\n", "ID", "Product");
    for item in items {
        out.push_str(&format!(
            "{:<id_width$}  {:<name_width$}  {}\n",
            item.id.to_string(),
            item.name,
            item.quantity
        ));
    }
    out
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
