//! Integration tests for the bootstrap settings resolver

mod cli_commands;
mod config_loading;
mod init_protocol;
mod notifications;
mod precedence;
mod storage;
mod test_utils;
