//! Application Shell
//!
//! Owns the recent-transaction list and the current route, and orchestrates
//! fetching: once on mount, and again after every successful submission.
//!
//! A failed refresh raises a dismissible banner and keeps whatever list was
//! loaded before; stale data stays visible rather than being cleared.

use chrono::{DateTime, Local};

use crate::client::{ApiResponse, CancelToken, WeightApi, WeightClient};
use crate::dates::TimeWindow;
use crate::form::{SubmitOutcome, WeightForm};
use crate::router::Route;
use crate::types::{ItemData, SessionData, WeightTransaction};
use crate::views;

/// Default trailing window for the transaction list, in days
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Application title shown above every view
pub const APP_TITLE: &str = "Weight Management System";

/// Outcome of loading a detail view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Ready(T),
    Failed(String),
    /// The view was left before the response arrived; the response was dropped
    Discarded,
}

/// Root state of the client
pub struct AppShell<A> {
    api: A,
    window_days: i64,
    transactions: Vec<WeightTransaction>,
    banner: Option<String>,
    last_refreshed: Option<DateTime<Local>>,
    route: Route,
    /// Lives as long as the shell; guards list refreshes
    shell_cancel: CancelToken,
    /// Child of `shell_cancel`, replaced on every navigation
    view_cancel: CancelToken,
}

impl<A: WeightApi> AppShell<A> {
    pub fn new(api: A, window_days: i64) -> Self {
        let shell_cancel = CancelToken::new();
        let view_cancel = shell_cancel.child();
        Self {
            api,
            window_days,
            transactions: Vec::new(),
            banner: None,
            last_refreshed: None,
            route: Route::List,
            shell_cancel,
            view_cancel,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn transactions(&self) -> &[WeightTransaction] {
        &self.transactions
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Handle that aborts every request the shell has in flight, e.g. from a
    /// signal handler running on another task
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            cancel: self.shell_cancel.clone(),
        }
    }

    /// Switch routes, abandoning requests made for the previous view
    pub fn navigate(&mut self, route: Route) {
        if route != self.route {
            tracing::debug!(from = %self.route, to = %route, "navigate");
        }
        self.view_cancel.cancel();
        self.view_cancel = self.shell_cancel.child();
        self.route = route;
    }

    /// Initial fetch of the trailing window
    pub async fn mount(&mut self) -> bool {
        self.refresh().await
    }

    /// Refetch the trailing window ending now
    pub async fn refresh(&mut self) -> bool {
        match TimeWindow::trailing_days(self.window_days) {
            Some(window) => self.refresh_window(&window).await,
            None => {
                tracing::warn!(days = self.window_days, "window out of range, refresh skipped");
                self.banner = Some(format!("Invalid window of {} days", self.window_days));
                false
            }
        }
    }

    /// Refetch an explicit window. Returns whether the list was replaced.
    pub async fn refresh_window(&mut self, window: &TimeWindow) -> bool {
        tracing::debug!(from = %window.from, to = %window.to, "refreshing transactions");

        let response = self.api.get_transactions(window, &self.shell_cancel).await;

        if self.shell_cancel.is_cancelled() {
            tracing::debug!("refresh result discarded after shutdown");
            return false;
        }

        match response {
            ApiResponse::Data(transactions) => {
                tracing::info!(count = transactions.len(), "transactions loaded");
                self.transactions = transactions;
                self.last_refreshed = Some(Local::now());
                true
            }
            ApiResponse::Error(message) => {
                tracing::warn!(error = %message, "transaction refresh failed");
                self.banner = Some(message);
                false
            }
        }
    }

    /// Submit the form; on success refresh the list once and return to `/`.
    ///
    /// On failure the route stays on `/add` and the form keeps its draft.
    pub async fn submit_form(&mut self, form: &mut WeightForm) -> SubmitOutcome {
        if self.route != Route::Add {
            self.navigate(Route::Add);
        }

        let cancel = self.view_cancel.clone();
        let outcome = form.submit(&self.api, &cancel).await;

        if let SubmitOutcome::Succeeded { .. } = outcome {
            self.refresh().await;
            self.navigate(Route::List);
        }

        outcome
    }

    /// Navigate to `/item/:id` and fetch the item
    pub async fn load_item(&mut self, id: &str) -> ViewState<ItemData> {
        self.navigate(Route::Item(id.to_string()));
        let cancel = self.view_cancel.clone();
        let response = self.api.get_item_details(id, &cancel).await;
        settle(response, &cancel)
    }

    /// Navigate to `/session/:id` and fetch the session
    pub async fn load_session(&mut self, id: &str) -> ViewState<SessionData> {
        self.navigate(Route::Session(id.to_string()));
        let cancel = self.view_cancel.clone();
        let response = self.api.get_session_details(id, &cancel).await;
        settle(response, &cancel)
    }

    /// Navigate to `route` and render the resulting screen
    pub async fn open(&mut self, route: Route) -> String {
        let body = match &route {
            Route::List => {
                self.navigate(Route::List);
                views::render_transactions(&self.transactions)
            }
            Route::Add => {
                self.navigate(Route::Add);
                views::render_form(&WeightForm::new())
            }
            Route::Item(id) => match self.load_item(id).await {
                ViewState::Ready(item) => views::render_item(&item),
                ViewState::Failed(message) => format!("Error: {}\n", message),
                ViewState::Discarded => String::new(),
            },
            Route::Session(id) => match self.load_session(id).await {
                ViewState::Ready(session) => views::render_session(&session),
                ViewState::Failed(message) => format!("Error: {}\n", message),
                ViewState::Discarded => String::new(),
            },
            Route::NotFound(path) => {
                self.navigate(route.clone());
                format!("No page at {}\nGo to {}\n", path, Route::List)
            }
        };

        self.frame(&body)
    }

    /// Wrap a view body with the title, route heading and banner
    pub fn frame(&self, body: &str) -> String {
        let mut out = String::new();
        out.push_str(APP_TITLE);
        out.push('\n');
        out.push_str(&"=".repeat(APP_TITLE.len()));
        out.push('\n');

        if let Some(banner) = &self.banner {
            out.push_str(&format!("[error] {}\n", banner));
        }

        out.push('\n');
        out.push_str(&self.route.title());
        out.push('\n');
        out.push_str(&"-".repeat(self.route.title().len()));
        out.push('\n');
        out.push_str(body);
        out
    }
}

impl AppShell<WeightClient> {
    /// Check the backend's health; aborted by the shutdown handle like every
    /// other shell request
    pub async fn check_health(&self) -> ApiResponse<()> {
        self.api.check_health(&self.shell_cancel).await
    }
}

/// Cancels the shell's in-flight requests from outside the shell
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    cancel: CancelToken,
}

impl ShutdownHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

fn settle<T>(response: ApiResponse<T>, cancel: &CancelToken) -> ViewState<T> {
    if cancel.is_cancelled() {
        return ViewState::Discarded;
    }
    match response {
        ApiResponse::Data(data) => ViewState::Ready(data),
        ApiResponse::Error(message) => ViewState::Failed(message),
    }
}
