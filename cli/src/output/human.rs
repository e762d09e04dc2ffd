//! Human-readable terminal renderer.

use alamo_common::ServerRecord;
use anyhow::Result;
use owo_colors::OwoColorize as _;

use crate::application::services::bootstrap::BootstrapOutcome;
use crate::domain::table::{self, ColumnSpec};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Print the server table. The table is the command's result, so it is
    /// printed even in quiet mode.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` if `columns` names an unknown field.
    pub fn render_servers(&self, columns: &ColumnSpec, servers: &[ServerRecord]) -> Result<()> {
        let mut lines = table::format_table(columns, servers)?.into_iter();
        if let Some(header) = lines.next() {
            println!("{}", header.style(self.ctx.styles.header));
        }
        for line in lines {
            println!("{line}");
        }
        if servers.is_empty() && !self.ctx.quiet {
            println!("{}", "No servers.".style(self.ctx.styles.dim));
        }
        Ok(())
    }

    /// Print the record returned by a create request.
    pub fn render_created(&self, server: &ServerRecord) {
        self.ctx.success(&format!("Server {} ({}) created", server.name, server.id));
        self.ctx.kv("Status:", &styled_status(self.ctx, &server.status));
        if server.has_address() {
            let addresses: Vec<&str> = server.all_addresses().map(|a| a.addr.as_str()).collect();
            self.ctx.kv("Addresses:", &addresses.join(","));
        }
    }

    /// Print the acknowledgement of a delete request.
    pub fn render_deleted(&self, server_id: &str) {
        self.ctx.success(&format!("Delete requested for server {server_id}"));
    }

    /// Print the summary of a bootstrap run.
    pub fn render_bootstrap(&self, outcome: &BootstrapOutcome) {
        if !self.ctx.quiet && !outcome.chef_output.trim().is_empty() {
            println!();
            for line in outcome.chef_output.lines() {
                println!("    {}", line.style(self.ctx.styles.dim));
            }
            println!();
        }
        self.ctx.success(&format!(
            "Server {} bootstrapped into the Chef fleet",
            outcome.server.id
        ));
        self.ctx.kv("Address:", &outcome.address);
        self.ctx.kv("Route:", &outcome.route);
    }
}

fn styled_status(ctx: &OutputContext, status: &str) -> String {
    status.style(ctx.styles.for_status(status)).to_string()
}
