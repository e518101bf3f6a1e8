//! Reconcile a sample ERP export against a vendor statement

use recon_raptor::{write_report_table, RawTable, ReconConfig, ReconciliationEngine, ReportTable};
use tracing_subscriber::EnvFilter;

fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("🧾 ReconRaptor - Statement Reconciliation Example\n");

    let erp = table(
        &["Fecha", "Nº Factura", "Concepto", "Debe", "Haber"],
        &[
            &["05/01/2024", "FAC-100", "Material oficina", "", "500,00"],
            &["06/01/2024", "FAC-200", "Servicio", "", "300,00"],
            &["20/01/2024", "FAC-200", "Abono FAC-200", "300,00", ""],
            &["07/01/2024", "FAC300", "Licencias", "", "1.000,00"],
            &["09/01/2024", "", "Transferencia", "250,00", ""],
            &["10/01/2024", "FAC-400", "Transporte", "", "80,00"],
        ],
    );
    let vendor = table(
        &["Date", "Document", "Description", "Debit", "Credit"],
        &[
            &["2024-01-05", "FAC-100", "Office supplies", "500.00", ""],
            &["2024-01-07", "FAC-300", "Licences", "995.00", ""],
            &["2024-01-09", "", "Payment received", "", "250.00"],
            &["2024-01-12", "FAC-999", "Late fee", "42.10", ""],
        ],
    );

    let config = ReconConfig::from_env()?;
    let engine = ReconciliationEngine::new(config);
    let report = engine.reconcile(&erp, &vendor, "Acme SL")?;

    println!("📊 Summary for {}", report.vendor_name);
    println!("  ✓ Perfect matches:    {}", report.summary.perfect_matches);
    println!("  ✓ Difference matches: {}", report.summary.difference_matches);
    println!("  ✓ Payment matches:    {}", report.summary.payment_matches);
    println!("  ✗ Missing in ERP:     {}", report.summary.missing_in_erp);
    println!("  ✗ Missing in vendor:  {}", report.summary.missing_in_vendor);
    println!("  Total difference:     {}", report.summary.total_difference);
    println!();

    for table in ReportTable::ALL {
        println!("--- {} ---", table.file_stem());
        write_report_table(std::io::stdout(), &report, table)?;
        println!();
    }

    Ok(())
}
