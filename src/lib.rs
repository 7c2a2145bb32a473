//! Course Craft
//!
//! A two-pane "chat your way to a course outline" editor, a mock dashboard
//! and static legal pages, served as HTML from an Axum server.
//!
//! # Architecture
//!
//! - **Server**: Axum router rendering pages and pushing live fragments over SSE
//! - **Sessions**: per-page chat and outline state with cancellable replies
//! - **Theme**: observable light/dark/system preference resolved against the OS signal
//! - **UI**: `format!`-based HTML templates with Tailwind classes and HTMX attributes
//!
//! # Modules
//!
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`course`]: messages, outlines and mock content
//! - [`session`]: chat sessions and the reply planner
//! - [`theme`]: theme preference store and resolution
//! - [`ui`]: page and fragment rendering
//! - [`server`]: routes and handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod course;
pub mod error;
pub mod resilience;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod theme;
pub mod ui;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::resilience::RateLimiter;
use crate::session::{MockPlanner, SessionStore};
use crate::theme::{FileBackend, MemoryBackend, ThemeStore};

pub use error::{Error, Result};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Open editor sessions.
    pub sessions: SessionStore,
    /// Theme preference shared by every page.
    pub theme: ThemeStore,
    /// Request budget shared by all routes.
    pub rate_limiter: Arc<RateLimiter>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the state described by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let theme = match &config.theme.store_path {
            Some(path) => ThemeStore::new(FileBackend::new(path))?,
            None => ThemeStore::new(MemoryBackend::default())?,
        };
        let planner = Arc::new(MockPlanner::new(config.chat.reply_delay()));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        ));

        Ok(Self {
            sessions: SessionStore::new(planner),
            theme,
            rate_limiter,
            config: Arc::new(config),
        })
    }
}
