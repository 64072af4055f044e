use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Config;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub openai: Option<OpenAiConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub bind_addr: Option<String>,
    pub max_body_mb: Option<usize>,
}

/// Platform config directory path: `<config_dir>/slidesketch/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("slidesketch").join("config.toml"))
}

/// Load config by cascading CWD `.slidesketch.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".slidesketch.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_ai = base.openai.unwrap_or_default();
    let over_ai = overlay.openai.unwrap_or_default();
    let base_srv = base.server.unwrap_or_default();
    let over_srv = overlay.server.unwrap_or_default();

    ConfigFile {
        openai: Some(OpenAiConfig {
            api_key: over_ai.api_key.or(base_ai.api_key),
            model: over_ai.model.or(base_ai.model),
            api_base: over_ai.api_base.or(base_ai.api_base),
            timeout_secs: over_ai.timeout_secs.or(base_ai.timeout_secs),
        }),
        server: Some(ServerConfig {
            port: over_srv.port.or(base_srv.port),
            bind_addr: over_srv.bind_addr.or(base_srv.bind_addr),
            max_body_mb: over_srv.max_body_mb.or(base_srv.max_body_mb),
        }),
    }
}

impl ConfigFile {
    /// Lay the `[openai]` table over [`Config::default`].
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();
        if let Some(ai) = &self.openai {
            config.api_key = ai.api_key.clone().filter(|k| !k.is_empty());
            if let Some(model) = ai.model.clone().filter(|m| !m.is_empty()) {
                config.model = model;
            }
            if let Some(base) = ai.api_base.clone().filter(|b| !b.is_empty()) {
                config.api_base = base;
            }
            config.timeout_secs = ai.timeout_secs;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_parses() {
        let toml_str = "[openai]\nmodel = \"gpt-4o\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let ai = parsed.openai.unwrap();
        assert_eq!(ai.model.as_deref(), Some("gpt-4o"));
        assert!(ai.api_key.is_none());
        assert!(parsed.server.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            openai: Some(OpenAiConfig {
                model: Some("base-model".into()),
                api_key: Some("base-key".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            openai: Some(OpenAiConfig {
                model: Some("overlay-model".into()),
                ..Default::default()
            }),
            server: Some(ServerConfig {
                port: Some(8080),
                ..Default::default()
            }),
        };
        let merged = merge(base, overlay);
        let ai = merged.openai.unwrap();
        assert_eq!(ai.model.as_deref(), Some("overlay-model"));
        assert_eq!(ai.api_key.as_deref(), Some("base-key"));
        assert_eq!(merged.server.unwrap().port, Some(8080));
    }

    #[test]
    fn to_config_ignores_empty_strings() {
        let file = ConfigFile {
            openai: Some(OpenAiConfig {
                api_key: Some(String::new()),
                model: Some(String::new()),
                api_base: Some("http://localhost:9999/v1".into()),
                timeout_secs: Some(30),
            }),
            ..Default::default()
        };
        let config = file.to_config();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, crate::DEFAULT_MODEL);
        assert_eq!(config.api_base, "http://localhost:9999/v1");
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn load_from_path_reads_file_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[server]\nport = 4000\n").unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "this is = = not toml").unwrap();

        let loaded = load_from_path(&good).unwrap();
        assert_eq!(loaded.server.unwrap().port, Some(4000));
        assert!(load_from_path(&bad).is_none());
        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());
    }
}
