//! CLI domain: parse, route, output and presentation only.
//! No resolution logic; a single route table dispatches to the resolver.

mod help;
mod output;
mod parse;
mod presentation;
mod route;
mod watch;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, InputArgs};
pub use presentation::{
    format_descriptor_json, format_descriptor_text, format_descriptors_json,
    format_descriptors_text, format_event_line, format_events_json, format_events_text,
    format_section_heading, format_settings_json, format_settings_text, format_settings_toml,
    format_value_json, format_value_text, SettingRow,
};
pub use route::RunContext;
pub use watch::SettingsWatcher;
