//! Subcommands of the `wet` binary.

use crate::app::read_language;
use crate::error::{CliError, CliResult};
use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use wet_layer::{channel, InboundMessage, Substitutions, WetLayer};

/// What to do with the active language override
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve a message key
    Get {
        /// Message key
        key: String,
        /// Positional substitution values
        substitutions: Vec<String>,
    },
    /// Apply a language document as the new override
    Apply {
        /// JSON file holding the language
        file: PathBuf,
    },
    /// Remove the override
    Reset,
    /// Show the active UI language and the accepted languages
    Locale,
}

/// Run `command` against `layer`, returning what to print
pub async fn execute(
    command: Command,
    layer: &Arc<WetLayer>,
    apply_action: &str,
) -> CliResult<String> {
    match command {
        Command::Get { key, substitutions } => {
            let substitutions =
                (!substitutions.is_empty()).then(|| Substitutions::from(substitutions));
            Ok(layer.get_message(&key, substitutions.as_ref()))
        }
        Command::Apply { file } => {
            let language = read_language(&file)?;
            let summary = format!(
                "Applied {} ({} message(s))",
                language.locale,
                language.messages_by_key.len()
            );

            let (tx, rx) = channel();
            let task = layer.subscribe(rx);
            tx.send(InboundMessage::apply_language(apply_action, language))
                .map_err(|e| CliError::Channel(e.to_string()))?;
            drop(tx);
            task.await.map_err(|e| CliError::Channel(e.to_string()))?;

            info!("{}", summary);
            Ok(summary)
        }
        Command::Reset => {
            layer.reset();
            Ok("Override removed".to_string())
        }
        Command::Locale => {
            let accepted = layer.accept_languages().await;
            Ok(format!(
                "{}\naccepted: {}",
                layer.ui_language(),
                accepted.join(", ")
            ))
        }
    }
}
