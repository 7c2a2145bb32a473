use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default configuration file picked up from the working directory.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// File persisting the theme preference (in-memory if unset)
    #[arg(long, env = "THEME_STORE")]
    pub theme_store: Option<String>,

    /// Delay before the assistant answers, in milliseconds
    #[arg(long, env = "REPLY_DELAY_MS")]
    pub reply_delay_ms: Option<u64>,

    /// Enable rate limiting
    #[arg(long, env = "RATE_LIMIT_ENABLED")]
    pub rate_limit_enabled: Option<bool>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub theme: ThemeConfig,
    pub chat: ChatConfig,
    pub resilience: ResilienceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeConfig {
    pub store_path: Option<String>,
    pub reload_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub reply_delay_ms: u64,
    pub session_idle_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub rate_limit_enabled: bool,
    pub timeout_disabled: bool,
    pub requests_per_second: f32,
    pub burst_size: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
}

impl ThemeConfig {
    /// Reload period, never shorter than one millisecond.
    #[must_use]
    pub fn reload_interval(&self) -> Duration {
        Duration::from_millis(self.reload_interval_ms.max(1))
    }
}

impl ChatConfig {
    #[must_use]
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    #[must_use]
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::iter::once("course-craft"))
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.static_dir", "static")?
            .set_default("theme.reload_interval_ms", 100)?
            .set_default("chat.reply_delay_ms", 1000)?
            .set_default("chat.session_idle_timeout_secs", 30 * 60)?
            .set_default("resilience.rate_limit_enabled", false)?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("resilience.requests_per_second", 20.0)?
            .set_default("resilience.burst_size", 40.0)?
            .set_default("logging.json", false)?;

        // 2. Config file: explicit path, else ./config.yaml if present
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::new(path, FileFormat::Yaml));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::new(CWD_CONFIG_FILE, FileFormat::Yaml));
        }

        // 3. Environment variables, e.g. COURSE_CRAFT_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("COURSE_CRAFT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their plain env aliases) win over everything
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(path) = cli.theme_store {
            builder = builder.set_override("theme.store_path", path)?;
        }
        if let Some(delay) = cli.reply_delay_ms {
            builder = builder.set_override("chat.reply_delay_ms", delay)?;
        }
        if let Some(rl) = cli.rate_limit_enabled {
            builder = builder.set_override("resilience.rate_limit_enabled", rl)?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let config = AppConfig::load_from_args([
            "course-craft",
            "--port",
            "4040",
            "--reply-delay-ms",
            "250",
            "--theme-store",
            "/tmp/theme.json",
        ])
        .unwrap();
        assert_eq!(config.server.port, 4040);
        assert_eq!(config.chat.reply_delay(), Duration::from_millis(250));
        assert_eq!(config.theme.store_path.as_deref(), Some("/tmp/theme.json"));
        assert_eq!(config.theme.reload_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_reload_interval_is_raised() {
        let theme = ThemeConfig {
            store_path: None,
            reload_interval_ms: 0,
        };
        assert_eq!(theme.reload_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(AppConfig::load_from_args(["course-craft", "--nope"]).is_err());
    }
}
