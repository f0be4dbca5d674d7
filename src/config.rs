use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "patient-registry";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    "patient_registry=info,tower_http=info".to_string()
}

const DEFAULT_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
    8000,
);

/// Address the HTTP server binds to.
/// `PATIENT_REGISTRY_ADDR`, default 0.0.0.0:8000.
pub fn bind_addr() -> SocketAddr {
    addr_from(std::env::var("PATIENT_REGISTRY_ADDR").ok())
}

fn addr_from(raw: Option<String>) -> SocketAddr {
    match raw {
        Some(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(
                value = %v,
                "Invalid PATIENT_REGISTRY_ADDR, falling back to {DEFAULT_ADDR}"
            );
            DEFAULT_ADDR
        }),
        None => DEFAULT_ADDR,
    }
}

/// Path of the SQLite database file.
/// `PATIENT_REGISTRY_DB`, default ./patients.db.
pub fn database_path() -> PathBuf {
    std::env::var("PATIENT_REGISTRY_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("patients.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_addr_is_port_8000() {
        // Only meaningful when the env var is unset, which is the default test env.
        if std::env::var("PATIENT_REGISTRY_ADDR").is_err() {
            assert_eq!(bind_addr().port(), 8000);
        }
    }

    #[test]
    fn configured_addr_is_parsed() {
        let addr = addr_from(Some("127.0.0.1:9000".into()));
        assert_eq!(addr.port(), 9000);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn unset_addr_uses_default() {
        assert_eq!(addr_from(None), DEFAULT_ADDR);
    }

    #[test]
    fn invalid_addr_falls_back_to_default() {
        assert_eq!(addr_from(Some("not-an-address".into())), DEFAULT_ADDR);
        assert_eq!(addr_from(Some("localhost".into())), DEFAULT_ADDR);
    }

    #[test]
    fn default_database_path() {
        if std::env::var("PATIENT_REGISTRY_DB").is_err() {
            assert_eq!(database_path(), PathBuf::from("patients.db"));
        }
    }

    #[test]
    fn log_filter_names_the_crate() {
        assert!(default_log_filter().starts_with("patient_registry="));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
