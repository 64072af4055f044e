use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use slidesketch_core::config_file::ServerConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_BODY_MB: usize = 20;

/// Listener and request-size settings for the web server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_MB * 1024 * 1024,
        }
    }
}

impl ServerSettings {
    /// Resolve settings: env vars (`BIND_ADDR`, `PORT`, `MAX_BODY_MB`) >
    /// `[server]` config table > defaults. Unparsable values are skipped.
    pub fn resolve(file: Option<&ServerConfig>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        let bind_addr = lookup("BIND_ADDR").or_else(|| file.and_then(|f| f.bind_addr.clone()));
        if let Some(raw) = bind_addr {
            match raw.parse() {
                Ok(addr) => settings.bind_addr = addr,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid bind address"),
            }
        }

        let port = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .or_else(|| file.and_then(|f| f.port));
        if let Some(port) = port {
            settings.port = port;
        }

        let max_body_mb = lookup("MAX_BODY_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .or_else(|| file.and_then(|f| f.max_body_mb));
        if let Some(mb) = max_body_mb {
            match mb.checked_mul(1024 * 1024) {
                Some(bytes) => settings.max_body_bytes = bytes,
                None => tracing::warn!(max_body_mb = mb, "ignoring oversized body limit"),
            }
        }

        settings
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let settings = ServerSettings::resolve(None, no_env);
        assert_eq!(settings.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(settings.max_body_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn env_beats_config_file() {
        let file = ServerConfig {
            port: Some(4000),
            bind_addr: Some("127.0.0.1".into()),
            max_body_mb: Some(5),
        };
        let settings = ServerSettings::resolve(Some(&file), |name| match name {
            "PORT" => Some("8080".into()),
            _ => None,
        });
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.bind_addr.to_string(), "127.0.0.1");
        assert_eq!(settings.max_body_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn garbage_values_fall_back() {
        let settings = ServerSettings::resolve(None, |name| match name {
            "PORT" => Some("eighty".into()),
            "BIND_ADDR" => Some("not-an-ip".into()),
            "MAX_BODY_MB" => Some("-1".into()),
            _ => None,
        });
        assert_eq!(settings, ServerSettings::default());
    }

    #[test]
    fn overflowing_body_limit_keeps_default() {
        let settings = ServerSettings::resolve(None, |name| {
            (name == "MAX_BODY_MB").then(|| "17592186044416".into())
        });
        assert_eq!(settings.max_body_bytes, DEFAULT_MAX_BODY_MB * 1024 * 1024);

        let file = ServerConfig {
            max_body_mb: Some(usize::MAX),
            ..Default::default()
        };
        let settings = ServerSettings::resolve(Some(&file), no_env);
        assert_eq!(settings.max_body_bytes, DEFAULT_MAX_BODY_MB * 1024 * 1024);
    }
}
