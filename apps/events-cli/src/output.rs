//! Rendering of command results for the terminal.

use domain_events::{
    BulkUpdateSummary, DeleteAllSummary, DeleteOutcome, Event, Page, format_datetime,
};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Result of one command.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Event(Event),
    Page(Page<Event>),
    Deleted(DeleteOutcome),
    DeletedAll(DeleteAllSummary),
    BulkUpdated(BulkUpdateSummary),
}

impl Outcome {
    pub fn render(&self, format: OutputFormat) -> eyre::Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(self.to_text()),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Outcome::Event(event) => event_line(event),
            Outcome::Page(page) => page_text(page),
            Outcome::Deleted(outcome) => outcome.message.clone(),
            Outcome::DeletedAll(summary) => summary.message.clone(),
            Outcome::BulkUpdated(summary) => summary.message.clone(),
        }
    }
}

fn event_line(event: &Event) -> String {
    let stop = event
        .stop
        .as_ref()
        .map(format_datetime)
        .unwrap_or_else(|| "open".to_string());
    format!(
        "{}  {} -> {}  [{}]",
        event.id,
        format_datetime(&event.start),
        stop,
        event.tags.join(", ")
    )
}

fn page_text(page: &Page<Event>) -> String {
    let mut lines = vec![format!(
        "Showing {} of {} events (skip {}, limit {})",
        page.results.len(),
        page.total,
        page.skip,
        page.limit
    )];
    lines.extend(page.results.iter().map(event_line));
    lines.join("\n")
}
