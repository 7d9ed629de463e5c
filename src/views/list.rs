//! Transaction List View

use super::format_grouped;
use crate::router::Route;
use crate::types::{Measure, WeightTransaction};

/// Render the recent-transactions list
pub fn render_transactions(transactions: &[WeightTransaction]) -> String {
    if transactions.is_empty() {
        return "No transactions in the selected window\n".to_string();
    }

    let mut out = String::new();
    for (i, tx) in transactions.iter().enumerate() {
        if i > 0 {
            out.push_str(&"-".repeat(60));
            out.push('\n');
        }
        render_card(&mut out, tx);
    }
    out
}

fn render_card(out: &mut String, tx: &WeightTransaction) {
    let neto = match tx.neto {
        Some(Measure::Known(v)) => format!("{} kg", format_grouped(v)),
        Some(Measure::Unavailable) | None => "N/A".to_string(),
    };
    let produce = tx.produce.as_deref().filter(|p| !p.is_empty()).unwrap_or("N/A");

    out.push_str(&format!(
        "ID: {:<20} [{}]\n",
        tx.id,
        tx.direction.as_str().to_uppercase()
    ));
    out.push_str(&format!("  Bruto:      {} kg\n", format_grouped(tx.bruto)));
    out.push_str(&format!("  Neto:       {}\n", neto));
    out.push_str(&format!("  Produce:    {}\n", produce));
    out.push_str(&format!("  Containers: {}\n", tx.container_count()));
    out.push_str(&format!("  Session:    {}\n", Route::Session(tx.id.clone())));
    if let Some(truck) = tx.truck.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("  Truck:      {}\n", Route::Item(truck.to_string())));
    }
}

/// Render the list as CSV, one row per transaction
pub fn render_transactions_csv(transactions: &[WeightTransaction]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "direction",
        "bruto",
        "neto",
        "produce",
        "containers",
        "truck",
    ])?;

    for tx in transactions {
        let neto = match &tx.neto {
            Some(m) => m
                .known()
                .map(|v| v.to_string())
                .unwrap_or_else(|| crate::types::UNAVAILABLE_SENTINEL.to_string()),
            None => String::new(),
        };
        let containers = tx
            .containers
            .as_ref()
            .map(|c| c.join(";"))
            .unwrap_or_default();

        let bruto = tx.bruto.to_string();

        writer.write_record([
            tx.id.as_str(),
            tx.direction.as_str(),
            bruto.as_str(),
            neto.as_str(),
            tx.produce.as_deref().unwrap_or(""),
            containers.as_str(),
            tx.truck.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
