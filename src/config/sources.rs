//! Configuration file sources, in override order.

pub mod global_file;
pub mod workspace_file;
