use std::env;
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TICK_MS: u64 = 250;

/// Runtime configuration, read once at startup from the environment.
pub struct Config {
    /// Base URL of the events API.
    pub api_base_url: String,
    /// Where the logged-in user record is persisted between runs.
    pub session_file: PathBuf,
    /// Log output goes to a file; the terminal is owned by the UI.
    pub log_file: PathBuf,
    /// How long the event loop waits for input before a redraw tick.
    pub tick_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = data_dir();
        Self {
            api_base_url: env::var("UNIEVENT_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            session_file: env::var("UNIEVENT_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("session.json")),
            log_file: env::var("UNIEVENT_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("client.log")),
            tick_ms: env::var("UNIEVENT_TICK_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TICK_MS),
        }
    }
}

fn data_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".unievent"))
        .unwrap_or_else(|_| PathBuf::from(".unievent"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test touches the process environment, so the cases run in
    // sequence rather than as separate (parallel) tests.
    #[test]
    fn env_defaults_and_fallbacks() {
        std::env::remove_var("UNIEVENT_API_URL");
        std::env::remove_var("UNIEVENT_TICK_MS");
        let config = Config::from_env();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.tick_ms, DEFAULT_TICK_MS);
        assert!(config.session_file.ends_with("session.json"));

        std::env::set_var("UNIEVENT_TICK_MS", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.tick_ms, DEFAULT_TICK_MS);
        std::env::remove_var("UNIEVENT_TICK_MS");
    }
}
