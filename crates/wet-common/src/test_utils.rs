//! Test utilities and shared test helpers.
//!
//! Helpers used by unit and integration tests across the workspace.

use std::sync::Once;
use tokio::runtime::Runtime;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a tokio runtime for testing async functions from synchronous tests.
pub fn create_test_runtime() -> Runtime {
    Runtime::new().expect("Failed to create test runtime")
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Configuration-related test fixtures.
pub mod config_fixtures {
    /// A minimal valid configuration as YAML.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
storage:
  locale_key: "wet-locale"
  map_key: "wet-map"
"#
    }

    /// A configuration setting every section as YAML.
    pub fn full_config_yaml() -> &'static str {
        concat!(
            "storage:\n",
            "  locale_key: \"custom-locale\"\n",
            "  map_key: \"custom-map\"\n",
            "  path: \"/tmp/wet-store.json\"\n",
            "\n",
            "events:\n",
            "  apply_action: \"apply-language\"\n",
            "\n",
            "host:\n",
            "  ui_language: \"de-DE\"\n",
            "  accept_languages:\n",
            "    - \"de-DE\"\n",
            "    - \"en\"\n",
            "\n",
            "logging:\n",
            "  level: \"debug\"\n",
            "  format: \"compact\"\n",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_initialization_is_idempotent() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_runtime_creation() {
        let rt = create_test_runtime();
        let value = rt.block_on(async { 42 });
        assert_eq!(value, 42);
    }

    #[test]
    fn test_config_fixtures_are_valid_yaml() {
        let minimal: serde_yaml::Value =
            serde_yaml::from_str(config_fixtures::minimal_config_yaml()).unwrap();
        assert!(minimal.get("storage").is_some());

        let full: serde_yaml::Value =
            serde_yaml::from_str(config_fixtures::full_config_yaml()).unwrap();
        assert!(full.get("host").is_some());
        assert!(full.get("logging").is_some());
    }
}
