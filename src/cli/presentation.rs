//! CLI presentation: text, json and toml formatters per command family.

mod events;
mod settings;

pub use events::{format_event_line, format_events_json, format_events_text};
pub use settings::{
    format_descriptor_json, format_descriptor_text, format_descriptors_json,
    format_descriptors_text, format_section_heading, format_settings_json,
    format_settings_text, format_settings_toml, format_value_json, format_value_text,
    SettingRow,
};
