//! # WET CLI
//!
//! Command-line front end for the localization layer.
//!
//! Loads configuration, opens the persisted override and runs one command
//! against it: resolve a message, apply a language document, reset, or show
//! the active locale.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod commands;
pub mod error;

pub use app::*;
pub use commands::*;
pub use error::*;

use wet_config::Config;

/// Build the layer for `config`, run `command` and wait for its writes
pub async fn run(command: Command, config: &Config) -> CliResult<String> {
    let layer = build_layer(config).await?;
    let output = execute(command, &layer, &config.events.apply_action).await?;
    layer.flush().await;
    Ok(output)
}
