//! Item Detail View

use super::format_measure;
use crate::router::Route;
use crate::types::ItemData;

/// Render a truck or container with its tara and recent sessions
pub fn render_item(item: &ItemData) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} ({})\n", item.id, item.kind().label()));
    out.push_str(&format!(
        "Tara Weight: {}\n",
        format_measure(&item.tara, "Not Available")
    ));
    out.push('\n');
    out.push_str("Recent Sessions\n");

    if item.sessions.is_empty() {
        out.push_str("  No sessions found\n");
    } else {
        for session in &item.sessions {
            out.push_str(&format!(
                "  Session ID: {:<12} {}\n",
                session,
                Route::Session(session.clone())
            ));
        }
    }

    out
}
