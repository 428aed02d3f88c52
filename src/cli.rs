use clap::{Parser, Subcommand};

use crate::config::{mask_password, Config};
use crate::domain::{transition, Actor, TransactionStatus};
use crate::ports::TransactionStore;
use crate::services::{apply_transition, TransitionOutcome};

#[derive(Parser)]
#[command(name = "storefront-core")]
#[command(about = "Storefront Core - Payment notification and order status service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Transaction inspection and operator actions
    #[command(subcommand)]
    Tx(TxCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Show a transaction and its status history
    Show {
        #[arg(value_name = "ORDER_ID")]
        order_id: String,
    },

    /// List the statuses a transaction may move to next
    Next {
        #[arg(value_name = "ORDER_ID")]
        order_id: String,
    },

    /// Move a transaction to a new status through the transition guard
    SetStatus {
        #[arg(value_name = "ORDER_ID")]
        order_id: String,

        /// Target status, e.g. SENT or COMPLETED
        #[arg(value_name = "STATUS")]
        status: TransactionStatus,

        /// Operator recorded as the author of the change
        #[arg(short, long)]
        operator: String,

        /// Free-text note stored in the audit log
        #[arg(short, long, default_value = "manual status change")]
        note: String,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_tx_show(store: &dyn TransactionStore, order_id: &str) -> anyhow::Result<()> {
    let tx = match store.find_by_order_id(order_id).await? {
        Some(tx) => tx,
        None => anyhow::bail!("Transaction {} not found", order_id),
    };

    println!("Order:   {}", tx.order_id);
    if transition::is_terminal(tx.status) {
        println!("Status:  {} (final)", tx.status);
    } else {
        println!("Status:  {}", tx.status);
    }
    println!("Amount:  {}", tx.total_amount);
    println!("User:    {}", tx.user_id);
    println!("Created: {}", tx.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Updated: {}", tx.updated_at.format("%Y-%m-%d %H:%M:%S"));

    let logs = store.list_logs(order_id).await?;
    if logs.is_empty() {
        println!("\nNo status history");
        return Ok(());
    }

    println!("\n{:<20} {:<10} {:<20} {}", "Timestamp", "Status", "Author", "Note");
    println!("{}", "-".repeat(85));
    for log in logs {
        println!(
            "{:<20} {:<10} {:<20} {}",
            log.created_at.format("%Y-%m-%d %H:%M:%S"),
            log.status,
            log.author,
            log.note
        );
    }

    Ok(())
}

pub async fn handle_tx_next(store: &dyn TransactionStore, order_id: &str) -> anyhow::Result<()> {
    let tx = match store.find_by_order_id(order_id).await? {
        Some(tx) => tx,
        None => anyhow::bail!("Transaction {} not found", order_id),
    };

    println!("{}", describe_next(&tx.order_id, tx.status));

    Ok(())
}

fn describe_next(order_id: &str, status: TransactionStatus) -> String {
    if transition::is_terminal(status) {
        return format!("{} ({}): final, no further transitions", order_id, status);
    }

    let allowed: Vec<&str> = transition::allowed_next(status)
        .iter()
        .map(TransactionStatus::as_str)
        .collect();
    format!("{} ({}): {}", order_id, status, allowed.join(", "))
}

pub async fn handle_tx_set_status(
    store: &dyn TransactionStore,
    order_id: &str,
    status: TransactionStatus,
    operator: &str,
    note: &str,
) -> anyhow::Result<()> {
    let actor = Actor::Operator(operator.to_string());
    let outcome = apply_transition(store, order_id, status, note, &actor).await?;

    match outcome {
        TransitionOutcome::Changed { from, transaction } => {
            tracing::info!(
                order_id = %order_id,
                from = %from,
                to = %transaction.status,
                operator = %operator,
                "Transaction status changed by operator"
            );
            println!("✓ Transaction {} moved from {} to {}", order_id, from, transaction.status);
        }
        TransitionOutcome::Unchanged(transaction) => {
            println!("✓ Transaction {} already {}", order_id, transaction.status);
        }
    }

    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    crate::startup::validate_env_vars(config)?;

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  Payment Server Key: ****");
    println!("  Log Format: {:?}", config.log_format);

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}
