use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Target page to scrape. Required, unless supplied via INPUT_URL.
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Optional `host:port` proxy routed through the browser.
    #[serde(default)]
    pub proxy: Option<String>,

    /// Upper bound in seconds for the render-completion wait.
    #[serde(default = "default_render_timeout")]
    pub render_timeout: u64,

    /// CSS class whose appearance signals that client-side rendering is done.
    #[serde(default = "default_marker_class")]
    pub marker_class: String,

    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            output_file: default_output_file(),
            proxy: None,
            render_timeout: default_render_timeout(),
            marker_class: default_marker_class(),
            webdriver_url: default_webdriver_url(),
            logging: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a toml file, then apply environment
    /// overrides. A missing file is fine as long as the environment
    /// supplies the target URL.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// INPUT_URL, OUTPUT_FILE and PROXY take precedence over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("INPUT_URL") {
            if !url.is_empty() {
                self.url = url;
            }
        }
        if let Ok(output) = std::env::var("OUTPUT_FILE") {
            if !output.is_empty() {
                self.output_file = output;
            }
        }
        if let Ok(proxy) = std::env::var("PROXY") {
            if !proxy.is_empty() {
                self.proxy = Some(proxy);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(ConfigError::MissingField("url".to_string()).into());
        }
        if !self.url.starts_with("http") {
            return Err(ConfigError::InvalidValue(format!(
                "url must start with http(s): {}",
                self.url
            ))
            .into());
        }

        if self.output_file.is_empty() {
            return Err(ConfigError::InvalidValue("output_file cannot be empty".to_string()).into());
        }

        if self.render_timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "render_timeout must be greater than 0".to_string(),
            )
            .into());
        }

        if self.marker_class.is_empty() {
            return Err(
                ConfigError::InvalidValue("marker_class cannot be empty".to_string()).into(),
            );
        }

        if !self.webdriver_url.starts_with("http") {
            return Err(ConfigError::InvalidValue(format!(
                "webdriver_url must start with http(s): {}",
                self.webdriver_url
            ))
            .into());
        }

        if let Some(proxy) = &self.proxy {
            if !proxy.contains(':') {
                return Err(ConfigError::InvalidValue(format!(
                    "proxy must be host:port: {}",
                    proxy
                ))
                .into());
            }
        }

        Ok(())
    }
}

fn default_output_file() -> String {
    "quotes.jsonl".to_string()
}

fn default_render_timeout() -> u64 {
    600
}

fn default_marker_class() -> String {
    "quote".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "quotes-scraper.log".to_string()
}
