//! Output formatter trait

use council_domain::{DeliberationTrace, OutputFormat};

/// Trait for formatting deliberation traces
pub trait OutputFormatter {
    /// Format every stage of the trace
    fn format(&self, trace: &DeliberationTrace) -> String;

    /// Format as JSON
    fn format_json(&self, trace: &DeliberationTrace) -> String;

    /// Format the chairman's verdict only (concise output)
    fn format_verdict(&self, trace: &DeliberationTrace) -> String;

    /// Dispatch on the requested format
    fn render(&self, trace: &DeliberationTrace, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(trace),
            OutputFormat::Verdict => self.format_verdict(trace),
            OutputFormat::Json => self.format_json(trace),
        }
    }
}
