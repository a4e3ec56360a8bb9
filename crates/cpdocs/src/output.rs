//! Styled terminal output.

use console::{Style, Term};

/// Stderr writer for progress and diagnostics.
///
/// Everything goes to stderr so that JSON written to stdout stays clean.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    bold: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            bold: Style::new().bold(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Plain line.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// `name: value` line with the name in bold.
    pub(crate) fn field(&self, name: &str, value: &str) {
        let _ = self
            .term
            .write_line(&format!("{}: {value}", self.bold.apply_to(name)));
    }

    /// Green line.
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Yellow line.
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Red line.
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Indented red bullet for one of several problems.
    pub(crate) fn problem(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&format!("  {} {msg}", self.red.apply_to("✗")));
    }

    /// Cyan bold heading.
    pub(crate) fn heading(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }
}
