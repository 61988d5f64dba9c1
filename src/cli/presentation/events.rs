//! Change event presentation for `apply` and `watch`.

use crate::error::ApiError;
use crate::notify::ChangeEvent;

pub fn format_events_text(events: &[ChangeEvent]) -> String {
    if events.is_empty() {
        return "No settings changed.".to_string();
    }
    let mut output = String::new();
    for (index, event) in events.iter().enumerate() {
        output.push_str(&format!("Change event {} at {}\n", index + 1, event.ts));
        for (name, value) in &event.changes {
            output.push_str(&format!("  {:<28} {}\n", name, value));
        }
    }
    output
}

pub fn format_events_json(events: &[ChangeEvent]) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// Single-line JSON, one event per line.
pub fn format_event_line(event: &ChangeEvent) -> Result<String, ApiError> {
    Ok(serde_json::to_string(event)?)
}
