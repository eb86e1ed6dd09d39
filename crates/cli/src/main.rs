use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use tabsplit_cli::{CliConfig, Repl};
use tabsplit_events::{EventEnvelope, InMemoryEventBus};
use tabsplit_receipt::{JsonFileSource, ReceiptData, ReceiptSource, StaticSource};
use tabsplit_splitting::{LedgerEvent, SplitSession};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    tabsplit_observability::init_with_format(config.log_format);

    let receipt: ReceiptData = match &config.receipt_path {
        Some(path) => JsonFileSource::new(path)
            .fetch()
            .with_context(|| format!("could not load receipt {}", path.display()))?,
        None => {
            tracing::warn!("no receipt given; starting from an empty one");
            StaticSource::default().fetch()?
        }
    };

    let bus: Arc<InMemoryEventBus<EventEnvelope<LedgerEvent>>> = Arc::new(InMemoryEventBus::new());
    let session = SplitSession::new(Arc::clone(&bus));
    tracing::info!(ledger_id = %session.ledger().id_typed(), "editing session started");

    let stdout = io::stdout();
    let mut repl = Repl::new(session, receipt, config.display_decimals, stdout.lock())?;
    repl.run(io::stdin().lock())?;

    tracing::info!(
        events = bus.delivered_count(),
        "editing session ended; nothing saved"
    );
    Ok(())
}
