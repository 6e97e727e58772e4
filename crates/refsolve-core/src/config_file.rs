use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub http: Option<HttpConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: Option<u64>,
    pub mailto: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub formats: Option<Vec<String>>,
}

/// Platform config directory path: `<config_dir>/refsolve/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("refsolve").join("config.toml"))
}

/// Load config by cascading CWD `.refsolve.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".refsolve.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        http: Some(HttpConfig {
            timeout_secs: overlay
                .http
                .as_ref()
                .and_then(|h| h.timeout_secs)
                .or_else(|| base.http.as_ref().and_then(|h| h.timeout_secs)),
            mailto: overlay
                .http
                .as_ref()
                .and_then(|h| h.mailto.clone())
                .or_else(|| base.http.as_ref().and_then(|h| h.mailto.clone())),
        }),
        output: Some(OutputConfig {
            formats: overlay
                .output
                .as_ref()
                .and_then(|o| o.formats.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.formats.clone())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_round_trip_toml() {
        let config = ConfigFile {
            http: Some(HttpConfig {
                timeout_secs: Some(30),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.http.unwrap().timeout_secs.unwrap(), 30);
    }

    #[test]
    fn mailto_absent_deserializes_as_none() {
        let toml_str = "[http]\ntimeout_secs = 5\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert!(parsed.http.unwrap().mailto.is_none());
    }

    #[test]
    fn merge_formats_overlay_wins() {
        let base = ConfigFile {
            output: Some(OutputConfig {
                formats: Some(vec!["bibtex".to_string()]),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            output: Some(OutputConfig {
                formats: Some(vec!["md".to_string(), "rst".to_string()]),
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(
            merged.output.unwrap().formats.unwrap(),
            vec!["md".to_string(), "rst".to_string()]
        );
    }

    #[test]
    fn merge_mailto_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            http: Some(HttpConfig {
                mailto: Some("mail@example.org".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile::default();
        let merged = merge(base, overlay);
        assert_eq!(merged.http.unwrap().mailto.unwrap(), "mail@example.org");
    }
}
