//! Session Detail View

use super::{format_measure, format_weight};
use crate::types::{Measure, SessionData};

/// Render a weighing session and its weight summary.
///
/// A known neto of zero is shown as `0 kg`; only the `"na"` sentinel reads
/// as "Not Available".
pub fn render_session(session: &SessionData) -> String {
    let mut out = String::new();

    out.push_str(&format!("Session {}\n", session.id));
    out.push_str(&format!(
        "Truck ID: {}\n",
        session.truck_known().unwrap_or("Not Available")
    ));
    if let Some(direction) = session.direction {
        out.push_str(&format!("Direction: {}\n", direction.as_str().to_uppercase()));
    }
    if let Some(produce) = session.produce.as_deref().filter(|p| !p.is_empty()) {
        out.push_str(&format!("Produce: {}\n", produce));
    }
    if let Some(containers) = session.containers.as_ref().filter(|c| !c.is_empty()) {
        out.push_str(&format!("Containers: {}\n", containers.join(", ")));
    }
    out.push('\n');

    out.push_str(&format!("Bruto Weight: {} kg\n", format_weight(session.bruto)));
    if let Some(tara) = session.truck_tara {
        out.push_str(&format!("Truck Tara:   {} kg\n", format_weight(tara)));
    }
    if let Some(neto) = &session.neto {
        out.push_str(&format!(
            "Neto Weight:  {}\n",
            format_measure(neto, "Not Available")
        ));
    }

    out.push('\n');
    out.push_str("Weight Summary\n");
    if let Some(Measure::Known(neto)) = session.neto {
        out.push_str(&format!("  Net Weight:   {} kg\n", format_weight(neto)));
    }
    out.push_str(&format!("  Gross Weight: {} kg\n", format_weight(session.bruto)));
    if let Some(tara) = session.truck_tara {
        out.push_str(&format!("  Tara Weight:  {} kg\n", format_weight(tara)));
    }

    out
}
