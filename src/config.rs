use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Floradex";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Floradex/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Floradex")
}

/// Path of the plant record database.
pub fn database_path() -> PathBuf {
    app_data_dir().join("floradex.db")
}

/// Settings for the content-generation backend.
///
/// Read from the environment so deployments can point at a proxy or a
/// recording stub without a rebuild.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    /// Model for identification and record synthesis (JSON output).
    pub record_model: String,
    /// Model for the free-text recommendation essay.
    pub essay_model: String,
    pub timeout_secs: u64,
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("FLORADEX_GENERATOR_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
            api_key: std::env::var("FLORADEX_GENERATOR_API_KEY").unwrap_or_default(),
            record_model: std::env::var("FLORADEX_RECORD_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-lite".into()),
            essay_model: std::env::var("FLORADEX_ESSAY_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".into()),
            timeout_secs: std::env::var("FLORADEX_GENERATOR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }
}
