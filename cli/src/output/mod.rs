//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use alamo_common::ServerRecord;
use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;

use crate::application::services::bootstrap::BootstrapOutcome;
use crate::domain::table::ColumnSpec;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Dispatches command results to the active output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// Returns `FormatError` for unknown columns, or a serialization error.
    pub fn render_servers(&self, columns: &ColumnSpec, servers: &[ServerRecord]) -> Result<()> {
        match self {
            Self::Human(r) => r.render_servers(columns, servers),
            Self::Json(_) => JsonRenderer::render_servers(servers),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_created(&self, server: &ServerRecord) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_created(server);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_server(server),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_deleted(&self, server_id: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_deleted(server_id);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_deleted(server_id),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_bootstrap(&self, outcome: &BootstrapOutcome) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_bootstrap(outcome);
                Ok(())
            }
            Self::Json(_) => JsonRenderer::render_bootstrap(outcome),
        }
    }
}

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `!`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "!".style(self.styles.warning));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<11}{value}", key.style(self.styles.dim));
        }
    }
}
