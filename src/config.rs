use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
    pub publishing: PublishingConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// UDP socket the hub broadcasts to.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenerConfig {
    #[serde(default = "default_listener_host")]
    pub host: String,
    #[serde(default = "default_listener_port")]
    pub port: u16,
    /// Largest datagram accepted; hub packets are well under 1 KiB.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Wait before rebinding after a bind or receive failure.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: default_listener_host(),
            port: default_listener_port(),
            buffer_size: default_buffer_size(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

fn default_listener_host() -> String {
    "0.0.0.0".into()
}

fn default_listener_port() -> u16 {
    50222
}

fn default_buffer_size() -> usize {
    4096
}

fn default_retry_delay_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of snapshots kept in the broadcast channel for /ws/snapshots (slow clients may lag).
    pub broadcast_capacity: usize,
}

/// Periodic log line with the latest snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    #[serde(default = "default_reporting_enabled")]
    pub enabled: bool,
    #[serde(default = "default_report_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            enabled: default_reporting_enabled(),
            interval_secs: default_report_interval_secs(),
        }
    }
}

fn default_reporting_enabled() -> bool {
    true
}

fn default_report_interval_secs() -> u64 {
    55
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            self.listener.port > 0,
            "listener.port must be between 1 and 65535, got {}",
            self.listener.port
        );
        anyhow::ensure!(
            !self.listener.host.is_empty(),
            "listener.host must be non-empty"
        );
        anyhow::ensure!(
            self.listener.buffer_size > 0,
            "listener.buffer_size must be > 0, got {}",
            self.listener.buffer_size
        );
        anyhow::ensure!(
            self.listener.retry_delay_secs > 0,
            "listener.retry_delay_secs must be > 0, got {}",
            self.listener.retry_delay_secs
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        if self.reporting.enabled {
            anyhow::ensure!(
                self.reporting.interval_secs > 0,
                "reporting.interval_secs must be > 0 when reporting is enabled, got {}",
                self.reporting.interval_secs
            );
        }
        Ok(())
    }
}
