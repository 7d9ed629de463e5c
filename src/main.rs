//! Weighbridge CLI
//!
//! Command-line client for the weighing backend:
//! - List recent transactions
//! - Record a weighing
//! - Inspect trucks, containers and sessions
//! - Check backend status

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use weighbridge::client::{ApiResponse, WeightClient};
use weighbridge::config::{generate_default_config, Config};
use weighbridge::dates::{is_valid_window_days, TimeWindow, MAX_WINDOW_DAYS};
use weighbridge::form::{SubmitOutcome, WeightForm};
use weighbridge::router::Route;
use weighbridge::shell::{AppShell, ViewState};
use weighbridge::types::{Direction, WeightUnit};
use weighbridge::views;

#[derive(Parser)]
#[command(name = "weighbridge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Record truck and container weighings")]
#[command(long_about = "Weighbridge is a client for a weighing backend.\nRecord weighings, browse recent transactions, and inspect trucks, containers and sessions.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List recent transactions
    List {
        /// Trailing window in days (default: from config)
        #[arg(short, long, conflicts_with_all = ["from", "to"])]
        days: Option<i64>,
        /// Window start, YYYYMMDDHHMMSS
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// Window end, YYYYMMDDHHMMSS
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// Record a weighing
    Add {
        /// Direction (in, out, none)
        #[arg(short, long, default_value = "in")]
        direction: Direction,
        /// Truck ID
        #[arg(short, long, default_value = "")]
        truck: String,
        /// Comma-separated container IDs
        #[arg(short, long, default_value = "")]
        containers: String,
        /// Weight as read from the scale
        #[arg(short, long)]
        weight: String,
        /// Unit (kg, lbs)
        #[arg(short, long, default_value = "kg")]
        unit: WeightUnit,
        /// Produce type
        #[arg(short, long, default_value = "")]
        produce: String,
        /// Overwrite an existing weighing for the same session
        #[arg(long)]
        force: bool,
    },

    /// Show a truck or container
    Item {
        /// Item ID
        id: String,
    },

    /// Show a weighing session
    Session {
        /// Session ID
        id: String,
    },

    /// Look up an item by ID
    Search {
        /// Search text
        text: String,
    },

    /// Open a client route by path, e.g. /item/T-100
    Open {
        /// Route path
        path: String,
    },

    /// Show backend status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    if let Err(e) = weighbridge::logging::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    tracing::debug!(
        base_url = %config.api.base_url,
        window_days = config.view.window_days,
        "configuration loaded"
    );

    let client = WeightClient::new(config.api.client_config())
        .context("Failed to build HTTP client")?;
    let mut shell = AppShell::new(client, config.view.window_days);

    let shutdown = shell.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling requests");
            shutdown.cancel();
        }
    });

    let ok = match cli.command {
        Commands::List { days, from, to } => {
            let window = match (from, to) {
                (Some(from), Some(to)) => TimeWindow::between(&from, &to).ok_or_else(|| {
                    anyhow!("Invalid window {}..{}: expected YYYYMMDDHHMMSS, start before end", from, to)
                })?,
                _ => {
                    let days = days.unwrap_or(shell.window_days());
                    if !is_valid_window_days(days) {
                        bail!("--days must be between 1 and {}, got {}", MAX_WINDOW_DAYS, days);
                    }
                    TimeWindow::trailing_days(days)
                        .ok_or_else(|| anyhow!("Cannot compute a {}-day window", days))?
                }
            };
            show_list(&mut shell, &window, cli.format).await?
        }

        Commands::Add {
            direction,
            truck,
            containers,
            weight,
            unit,
            produce,
            force,
        } => {
            let mut form = WeightForm::new();
            form.set_direction(direction);
            form.set_truck(truck);
            form.set_containers(containers);
            form.set_weight(weight);
            form.set_unit(unit);
            form.set_produce(produce);
            form.set_force(force);

            shell.navigate(Route::Add);
            submit(&mut shell, &mut form, cli.format).await?
        }

        Commands::Item { id } => show_item(&mut shell, &id, cli.format).await?,

        Commands::Session { id } => show_session(&mut shell, &id, cli.format).await?,

        Commands::Search { text } => match Route::search_item(&text) {
            Some(Route::Item(id)) => show_item(&mut shell, &id, cli.format).await?,
            _ => bail!("Please enter an item ID"),
        },

        Commands::Open { path } => open(&mut shell, Route::parse(&path), cli.format).await?,

        Commands::Status => status(&shell, cli.format).await?,

        Commands::Config { .. } => unreachable!("handled before loading config"),
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}

async fn open(
    shell: &mut AppShell<WeightClient>,
    route: Route,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    match route {
        Route::List => {
            let days = shell.window_days();
            let window = TimeWindow::trailing_days(days)
                .ok_or_else(|| anyhow!("Cannot compute a {}-day window", days))?;
            show_list(shell, &window, format).await
        }
        Route::Item(id) => show_item(shell, &id, format).await,
        Route::Session(id) => show_session(shell, &id, format).await,
        Route::Add => {
            print!("{}", shell.open(Route::Add).await);
            Ok(true)
        }
        Route::NotFound(_) => {
            print!("{}", shell.open(route).await);
            Ok(false)
        }
    }
}

async fn show_list(
    shell: &mut AppShell<WeightClient>,
    window: &TimeWindow,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    shell.navigate(Route::List);
    if !shell.refresh_window(window).await {
        report_failure(shell.banner().unwrap_or("Request cancelled"));
        return Ok(false);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(shell.transactions())?),
        OutputFormat::Csv => print!("{}", views::render_transactions_csv(shell.transactions())?),
        OutputFormat::Table => {
            let body = views::render_transactions(shell.transactions());
            print!("{}", shell.frame(&body));
        }
    }
    Ok(true)
}

async fn submit(
    shell: &mut AppShell<WeightClient>,
    form: &mut WeightForm,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    match shell.submit_form(form).await {
        SubmitOutcome::Succeeded { session_id } => {
            match format {
                OutputFormat::Json => {
                    let receipt = serde_json::json!({ "session_id": session_id });
                    println!("{}", serde_json::to_string_pretty(&receipt)?);
                }
                OutputFormat::Csv => {
                    print!("{}", views::render_transactions_csv(shell.transactions())?)
                }
                OutputFormat::Table => {
                    println!("Recorded as session {}", session_id);
                    if let Some(banner) = shell.banner() {
                        report_failure(banner);
                    }
                    println!();
                    let body = views::render_transactions(shell.transactions());
                    print!("{}", shell.frame(&body));
                }
            }
            Ok(true)
        }
        SubmitOutcome::Invalid(errors) => {
            match format {
                OutputFormat::Json => {
                    let fields: BTreeMap<&str, &str> = errors
                        .iter()
                        .map(|(field, message)| (field.name(), message.as_str()))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&fields)?);
                }
                _ => print!("{}", shell.frame(&views::render_form(form))),
            }
            Ok(false)
        }
        SubmitOutcome::Failed(message) => {
            if format == OutputFormat::Table {
                print!("{}", shell.frame(&views::render_form(form)));
            }
            report_failure(&message);
            Ok(false)
        }
        SubmitOutcome::Busy => {
            report_failure("A submission is already in progress");
            Ok(false)
        }
    }
}

async fn show_item(
    shell: &mut AppShell<WeightClient>,
    id: &str,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    let state = shell.load_item(id).await;
    emit_detail(shell, state, format, views::render_item)
}

async fn show_session(
    shell: &mut AppShell<WeightClient>,
    id: &str,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    let state = shell.load_session(id).await;
    emit_detail(shell, state, format, views::render_session)
}

fn emit_detail<T: Serialize>(
    shell: &AppShell<WeightClient>,
    state: ViewState<T>,
    format: OutputFormat,
    render: fn(&T) -> String,
) -> anyhow::Result<bool> {
    match state {
        ViewState::Ready(data) => {
            match format {
                OutputFormat::Json | OutputFormat::Csv => {
                    println!("{}", serde_json::to_string_pretty(&data)?)
                }
                OutputFormat::Table => print!("{}", shell.frame(&render(&data))),
            }
            Ok(true)
        }
        ViewState::Failed(message) => {
            report_failure(&message);
            Ok(false)
        }
        ViewState::Discarded => {
            report_failure("Request cancelled");
            Ok(false)
        }
    }
}

async fn status(shell: &AppShell<WeightClient>, format: OutputFormat) -> anyhow::Result<bool> {
    let client = shell.api();
    let response = shell.check_health().await;

    match format {
        OutputFormat::Json | OutputFormat::Csv => {
            let report = serde_json::json!({
                "base_url": client.base_url(),
                "healthy": response.is_data(),
                "error": response.error(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!("Weighbridge v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Backend: {}", client.base_url());
            match &response {
                ApiResponse::Data(()) => println!("Status:  healthy"),
                ApiResponse::Error(message) => {
                    println!("Status:  unavailable");
                    eprintln!();
                    eprintln!("Error: {}", message);
                }
            }
        }
    }

    Ok(response.is_data())
}

fn report_failure(message: &str) {
    eprintln!("Error: {}", message);
}
