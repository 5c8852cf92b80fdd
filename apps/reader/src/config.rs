use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::SyncOptions;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://demo.wp-api.org/wp-json/wp/v2/posts";
pub const DEFAULT_CONFIG_FILE: &str = "reader.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub request_timeout_secs: Option<u64>,
    pub validate_posts: bool,
    pub seed: bool,
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            request_timeout_secs: None,
            validate_posts: false,
            seed: true,
            offline: false,
        }
    }
}

impl Settings {
    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        Url::parse(self.endpoint.trim())
            .with_context(|| format!("invalid posts endpoint '{}'", self.endpoint))
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            request_timeout: self
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            validate_posts: self.validate_posts,
        }
    }
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// Defaults, then the optional TOML file, then environment overrides.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        for (key, value) in &file_cfg {
            let value = match value {
                toml::Value::String(v) => v.clone(),
                other => other.to_string(),
            };
            apply(&mut settings, key, &value);
        }
    }

    if let Some(v) = env("POSTS_ENDPOINT") {
        settings.endpoint = v;
    }
    for key in ["endpoint", "request_timeout_secs", "validate_posts", "seed", "offline"] {
        if let Some(v) = env(&format!("APP__{}", key.to_ascii_uppercase())) {
            apply(&mut settings, key, &v);
        }
    }

    Ok(settings)
}

fn apply(settings: &mut Settings, key: &str, value: &str) {
    match key {
        "endpoint" => settings.endpoint = value.to_string(),
        "request_timeout_secs" => match value.trim().parse::<u64>() {
            Ok(secs) => settings.request_timeout_secs = Some(secs),
            Err(_) => tracing::warn!(value, "ignoring non-numeric request_timeout_secs"),
        },
        "validate_posts" => set_flag(&mut settings.validate_posts, key, value),
        "seed" => set_flag(&mut settings.seed, key, value),
        "offline" => set_flag(&mut settings.offline, key, value),
        other => tracing::debug!(key = other, "ignoring unknown setting"),
    }
}

fn set_flag(slot: &mut bool, key: &str, value: &str) {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => *slot = true,
        "0" | "false" | "no" | "off" => *slot = false,
        _ => tracing::warn!(key, value, "ignoring non-boolean setting"),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_config(contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("post_reader_settings_{suffix}.toml"));
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings =
            load_settings_with(Path::new("/nonexistent/reader.toml"), |_| None).expect("load");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.sync_options().request_timeout, None);
        assert!(!settings.sync_options().validate_posts);
    }

    #[test]
    fn file_values_accept_native_toml_types() {
        let path = temp_config(
            "endpoint = \"http://cms.local/wp-json/wp/v2/posts\"\n\
             request_timeout_secs = 15\n\
             validate_posts = true\n\
             seed = \"no\"\n",
        );
        let settings = load_settings_with(&path, |_| None).expect("load");
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.endpoint, "http://cms.local/wp-json/wp/v2/posts");
        assert_eq!(settings.request_timeout_secs, Some(15));
        assert!(settings.validate_posts);
        assert!(!settings.seed);
        assert_eq!(
            settings.sync_options().request_timeout,
            Some(Duration::from_secs(15))
        );
    }

    #[test]
    fn env_overrides_file() {
        let path = temp_config("endpoint = \"http://from-file/posts\"\noffline = false\n");
        let settings = load_settings_with(&path, |key| match key {
            "APP__ENDPOINT" => Some("http://from-env/posts".to_string()),
            "APP__OFFLINE" => Some("1".to_string()),
            _ => None,
        })
        .expect("load");
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.endpoint, "http://from-env/posts");
        assert!(settings.offline);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_config("endpoint = ");
        let result = load_settings_with(&path, |_| None);
        fs::remove_file(&path).expect("cleanup");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        let settings = Settings {
            endpoint: "not a url".into(),
            ..Settings::default()
        };
        assert!(settings.endpoint_url().is_err());
        assert!(Settings::default().endpoint_url().is_ok());
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        let settings = Settings {
            request_timeout_secs: Some(0),
            ..Settings::default()
        };
        assert_eq!(settings.sync_options().request_timeout, None);
    }
}
