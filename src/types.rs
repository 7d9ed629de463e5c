//! Data Model
//!
//! Records exchanged with the weighing backend and the form draft that
//! produces new ones.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Wire sentinel for a value the backend intentionally does not know
pub const UNAVAILABLE_SENTINEL: &str = "na";

/// Conversion factor used by the backend for pound readings
pub const KG_PER_LB: f64 = 0.453592;

// ============ Enums ============

/// Whether cargo enters the yard, leaves it, or the weighing is neutral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    In,
    Out,
    None,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::None => "none",
        }
    }

    /// Truck, containers and produce are only required for in/out weighings
    pub fn requires_cargo(&self) -> bool {
        !matches!(self, Direction::None)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            "none" => Ok(Direction::None),
            other => Err(format!("Unknown direction: {}", other)),
        }
    }
}

/// Unit a weight was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }

    /// Convert a reading in this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * KG_PER_LB,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" => Ok(WeightUnit::Kg),
            "lbs" | "lb" => Ok(WeightUnit::Lbs),
            other => Err(format!("Unknown unit: {}", other)),
        }
    }
}

// ============ Measure ============

/// A weight the backend either knows or reports as unavailable (`"na"`).
///
/// `Unavailable` is distinct from `Known(0.0)`: a zero tara is a real
/// reading, a missing one is not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMeasure", into = "RawMeasure")]
pub enum Measure {
    Known(f64),
    Unavailable,
}

impl Measure {
    pub fn known(&self) -> Option<f64> {
        match self {
            Measure::Known(v) => Some(*v),
            Measure::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Measure::Unavailable)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawMeasure {
    Number(f64),
    Text(String),
}

impl TryFrom<RawMeasure> for Measure {
    type Error = String;

    fn try_from(raw: RawMeasure) -> Result<Self, Self::Error> {
        match raw {
            RawMeasure::Number(v) => Ok(Measure::Known(v)),
            RawMeasure::Text(s) if s == UNAVAILABLE_SENTINEL => Ok(Measure::Unavailable),
            RawMeasure::Text(s) => Err(format!(
                "expected a number or \"{}\", got \"{}\"",
                UNAVAILABLE_SENTINEL, s
            )),
        }
    }
}

impl From<Measure> for RawMeasure {
    fn from(measure: Measure) -> Self {
        match measure {
            Measure::Known(v) => RawMeasure::Number(v),
            Measure::Unavailable => RawMeasure::Text(UNAVAILABLE_SENTINEL.to_string()),
        }
    }
}

// ============ Records ============

/// One completed weighing event as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTransaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub direction: Direction,
    pub bruto: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neto: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck: Option<String>,
}

impl WeightTransaction {
    pub fn container_count(&self) -> usize {
        self.containers.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// What an item id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Truck,
    Container,
}

impl ItemKind {
    /// Truck ids carry a `T` prefix; everything else is a container
    pub fn of(id: &str) -> Self {
        if id.starts_with('T') {
            ItemKind::Truck
        } else {
            ItemKind::Container
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Truck => "Truck",
            ItemKind::Container => "Container",
        }
    }
}

/// Truck or container detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub tara: Measure,
    #[serde(default)]
    pub sessions: Vec<String>,
}

impl ItemData {
    pub fn kind(&self) -> ItemKind {
        ItemKind::of(&self.id)
    }
}

/// Weighing session detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub truck: String,
    pub bruto: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck_tara: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neto: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<String>>,
}

impl SessionData {
    /// The backend reports an unknown truck with the same sentinel as weights
    pub fn truck_known(&self) -> Option<&str> {
        if self.truck == UNAVAILABLE_SENTINEL {
            None
        } else {
            Some(&self.truck)
        }
    }
}

// ============ Form draft and payload ============

/// Mutable draft of a transaction being entered.
///
/// `weight` holds the raw text as typed; it becomes a number only once the
/// draft validates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightFormData {
    pub direction: Direction,
    pub truck: String,
    pub containers: String,
    pub weight: String,
    pub unit: WeightUnit,
    pub force: bool,
    pub produce: String,
}

/// JSON body posted to `/api/weight`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSubmission {
    pub direction: Direction,
    pub truck: String,
    pub containers: String,
    pub weight: f64,
    pub unit: WeightUnit,
    pub force: bool,
    pub produce: String,
}

impl WeightSubmission {
    pub fn weight_kg(&self) -> f64 {
        self.unit.to_kg(self.weight)
    }
}

/// Backend acknowledgement of a submitted weighing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    #[serde(deserialize_with = "string_or_number")]
    pub session_id: String,
}

/// Accept ids sent either as JSON strings or as numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(f) => f.to_string(),
    })
}
