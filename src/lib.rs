//! # Weighbridge
//!
//! Client for a truck and container weighing backend: record weighings,
//! browse recent transactions, and inspect items and sessions.
//!
//! ## Modules
//!
//! - [`client`]: REST client for the weighing backend, with cancellation
//! - [`form`]: Weight form validation and submission workflow
//! - [`shell`]: Application shell owning the transaction list and route
//! - [`views`]: Text rendering of every screen
//! - [`router`]: Client routes
//! - [`dates`]: Backend timestamp formatting
//! - [`types`]: Wire types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use weighbridge::client::{ClientConfig, WeightClient};
//! use weighbridge::form::WeightForm;
//! use weighbridge::shell::AppShell;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WeightClient::new(ClientConfig::default())?;
//!     let mut shell = AppShell::new(client, 7);
//!     shell.mount().await;
//!
//!     let mut form = WeightForm::new();
//!     form.set_truck("T-14409");
//!     form.set_weight("12500");
//!     form.set_produce("orange");
//!     shell.submit_form(&mut form).await;
//!
//!     println!("{}", shell.open(shell.route().clone()).await);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dates;
pub mod form;
pub mod logging;
pub mod router;
pub mod shell;
pub mod types;
pub mod views;

pub use client::{ApiResponse, CancelToken, ClientConfig, ClientError, WeightApi, WeightClient};

pub use config::{Config, ConfigError, LoggingConfig};

pub use form::{validate, FieldErrors, FormField, FormPhase, SubmitOutcome, WeightForm};

pub use router::Route;

pub use shell::{AppShell, ShutdownHandle, ViewState};

pub use types::{
    Direction, ItemData, ItemKind, Measure, SessionData, SubmitReceipt, WeightFormData,
    WeightSubmission, WeightTransaction, WeightUnit,
};
