use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Materna";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address when `MATERNA_ADDR` is unset.
pub const DEFAULT_ADDR: &str = "127.0.0.1:7780";

/// Get the application data directory
/// ~/Materna/ on all platforms (user-visible by design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Materna")
}

/// Get the SQLite database path
pub fn database_path() -> PathBuf {
    app_data_dir().join("materna.db")
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "info".to_string()
}

/// Bind address for the API server, from `MATERNA_ADDR` or the default.
pub fn bind_addr() -> SocketAddr {
    let raw = std::env::var("MATERNA_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(addr = %raw, "Unparseable MATERNA_ADDR, using default");
        DEFAULT_ADDR.parse().expect("default address is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Materna"));
    }

    #[test]
    fn database_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("materna.db"));
    }

    #[test]
    fn app_name_is_materna() {
        assert_eq!(APP_NAME, "Materna");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_addr_parses() {
        assert!(DEFAULT_ADDR.parse::<SocketAddr>().is_ok());
    }
}
