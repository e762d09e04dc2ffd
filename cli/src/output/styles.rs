//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Success messages (green)
    pub success: Style,
    /// Warning messages (yellow)
    pub warning: Style,
    /// Info and progress arrows (cyan)
    pub info: Style,
    /// Dimmed/secondary text
    pub dim: Style,
    /// Table header row
    pub header: Style,
    pub status_active: Style,
    pub status_building: Style,
    pub status_error: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.info = Style::new().cyan();
        self.dim = Style::new().dimmed();
        self.header = Style::new().bold();
        self.status_active = Style::new().green();
        self.status_building = Style::new().yellow();
        self.status_error = Style::new().red().bold();
    }

    /// Style for a compute server status word.
    #[must_use]
    pub fn for_status(&self, status: &str) -> Style {
        match status.to_ascii_uppercase().as_str() {
            "ACTIVE" => self.status_active,
            "BUILD" | "REBUILD" | "REBOOT" | "HARD_REBOOT" | "RESIZE" => self.status_building,
            "ERROR" => self.status_error,
            _ => Style::new(),
        }
    }
}
