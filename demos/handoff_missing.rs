//! Hand missing invoices from a reconciliation run to a workflow tracker

use recon_raptor::{InvoiceTracker, MemoryTracker, RawTable, ReconciliationEngine};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("📋 ReconRaptor - Missing Invoice Handoff Example\n");

    let erp = RawTable::new(
        vec!["Invoice".into(), "Credit".into(), "Company".into()],
        vec![
            vec!["INV-10".into(), "120.00".into(), "HQ".into()],
            vec!["INV-11".into(), "64.90".into(), "HQ".into()],
        ],
    );
    let vendor = RawTable::new(
        vec!["Reference".into(), "Amount".into(), "Supplier".into()],
        vec![
            vec!["INV-10".into(), "120.00".into(), "Northwind".into()],
            vec!["INV-12".into(), "310.00".into(), "Northwind".into()],
        ],
    );

    let engine = ReconciliationEngine::default();
    let report = engine.reconcile(&erp, &vendor, "Northwind Ltd")?;
    let records = report.missing_invoice_records(&engine.config().currency);

    let mut tracker = MemoryTracker::new();
    let accepted = tracker.submit_missing(&records).await?;
    println!("Submitted {} records, {} accepted", records.len(), accepted);

    // Re-running the same statements must not create duplicates
    let again = tracker.submit_missing(&records).await?;
    println!("Resubmitted, {} accepted", again);

    for record in tracker.list_submitted().await? {
        println!(
            "  • {} {} {} {} ({}) ref {}",
            record.direction,
            record.invoice_number,
            record.amount,
            record.currency,
            record.vendor,
            record.external_ref
        );
    }

    Ok(())
}
