//! Views
//!
//! Text rendering of each route. Views only shape data for display; they
//! never fetch.

pub mod form;
pub mod item;
pub mod list;
pub mod session;

pub use form::render_form;
pub use item::render_item;
pub use list::{render_transactions, render_transactions_csv};
pub use session::render_session;

use crate::types::Measure;

/// Render a weight without a trailing `.0` for whole numbers
pub fn format_weight(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Render a weight with thousands separators, e.g. `12,500`
pub fn format_grouped(value: f64) -> String {
    let plain = format_weight(value.abs());
    let (whole, fraction) = match plain.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (plain.clone(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Render a measure in kg, or `unavailable` for the sentinel
pub fn format_measure(measure: &Measure, unavailable: &str) -> String {
    match measure {
        Measure::Known(v) => format!("{} kg", format_weight(*v)),
        Measure::Unavailable => unavailable.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(500.0), "500");
        assert_eq!(format_weight(0.0), "0");
        assert_eq!(format_weight(453.592), "453.59");
        assert_eq!(format_weight(12.5), "12.5");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1234567.0), "1,234,567");
        assert_eq!(format_grouped(12500.5), "12,500.5");
        assert_eq!(format_grouped(-2500.0), "-2,500");
    }

    #[test]
    fn test_format_measure() {
        assert_eq!(format_measure(&Measure::Unavailable, "N/A"), "N/A");
        assert_eq!(format_measure(&Measure::Known(0.0), "N/A"), "0 kg");
    }
}
