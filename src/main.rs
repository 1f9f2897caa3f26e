use clap::Parser;
use lanchonete::application::service::OrderService;
use lanchonete::domain::payment;
use lanchonete::domain::ports::PaymentGatewayBox;
use lanchonete::infrastructure::http_gateway::HttpPaymentGateway;
use lanchonete::infrastructure::in_memory::InMemoryOrderStore;
use lanchonete::interfaces::csv::order_writer::OrderWriter;
use lanchonete::interfaces::json::event_reader::{Event, EventReader};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input event stream (JSON lines)
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Base URL of the payment provider. Omit to create orders without
    /// payment initiation.
    #[arg(long)]
    payment_url: Option<String>,

    /// Client identifier sent with payment-order requests.
    #[arg(long)]
    payment_client_id: Option<String>,
}

fn build_store(db_path: Option<PathBuf>) -> Result<lanchonete::domain::ports::OrderStoreBox> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = db_path {
        let store = lanchonete::infrastructure::rocksdb::RocksDBOrderStore::open(db_path)
            .into_diagnostic()?;
        return Ok(Box::new(store));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    Ok(Box::new(InMemoryOrderStore::new()))
}

async fn apply_event(service: &OrderService, event: Event) -> lanchonete::error::Result<()> {
    match event {
        Event::CreateOrder { order } => {
            service.create_order(&order).await?;
        }
        Event::UpdateOrder { order } => {
            service.update_order(&order).await?;
        }
        Event::PaymentNotification {
            order_id,
            r#type,
            signature: _,
            status,
        } => {
            payment::validate_kind(&r#type)?;
            service
                .apply_payment_notification(order_id, status.as_deref())
                .await?;
        }
        Event::StartPreparation { order_id } => service.start_preparation(order_id).await?,
        Event::FinishPreparation { order_id } => service.finish_preparation(order_id).await?,
        Event::Finalize { order_id } => service.finalize(order_id).await?,
        Event::Cancel { order_id } => service.cancel(order_id).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let store = build_store(cli.db_path)?;
    let gateway: Option<PaymentGatewayBox> = cli
        .payment_url
        .map(|url| Box::new(HttpPaymentGateway::new(url)) as PaymentGatewayBox);
    let service = OrderService::new(store, gateway, cli.payment_client_id);

    // Process events
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = EventReader::new(file);
    for event_result in reader.events() {
        match event_result {
            Ok(event) => {
                if let Err(e) = apply_event(&service, event).await {
                    eprintln!("Error processing event: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading event: {}", e);
            }
        }
    }

    // Collect final state from the service
    let orders = service.into_orders().await.into_diagnostic()?;

    // Output final state
    let stdout = io::stdout();
    let mut writer = OrderWriter::new(stdout.lock());
    writer.write_orders(orders).into_diagnostic()?;

    Ok(())
}
