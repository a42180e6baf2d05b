use std::time::Duration;

use ds389_core::error::{ExporterError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub web: WebSection,

    #[serde(default)]
    pub ldap: LdapSection,

    #[serde(default)]
    pub scrape: ScrapeSection,

    #[serde(default)]
    pub log: LogSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            web: WebSection::default(),
            ldap: LdapSection::default(),
            scrape: ScrapeSection::default(),
            log: LogSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ExporterError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.web.validate()?;
        self.ldap.validate()?;
        self.scrape.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_telemetry_path")]
    pub telemetry_path: String,
}

impl Default for WebSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            telemetry_path: default_telemetry_path(),
        }
    }
}

impl WebSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.telemetry_path.starts_with('/') || self.telemetry_path == "/" {
            return Err(ExporterError::Config(
                "web.telemetry_path must start with '/' and must not be '/'".into(),
            ));
        }
        Ok(())
    }

    /// `host:port` handed to the listener; hostnames resolve at bind time.
    pub fn listen_addr(&self) -> Result<String> {
        // Go-style ":9496" means all interfaces.
        let raw = if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        };
        match raw.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(raw),
            _ => Err(ExporterError::Config(format!(
                "web.listen must be host:port, got {:?}",
                self.listen
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LdapSection {
    #[serde(default = "default_ldap_addr")]
    pub addr: String,

    #[serde(default = "default_ldap_user")]
    pub user: String,

    #[serde(default)]
    pub pass: String,

    #[serde(default)]
    pub ipa_domain: String,

    #[serde(default = "default_conn_timeout_secs")]
    pub conn_timeout_secs: u64,
}

impl Default for LdapSection {
    fn default() -> Self {
        Self {
            addr: default_ldap_addr(),
            user: default_ldap_user(),
            pass: String::new(),
            ipa_domain: String::new(),
            conn_timeout_secs: default_conn_timeout_secs(),
        }
    }
}

impl LdapSection {
    pub fn validate(&self) -> Result<()> {
        if self.pass.is_empty() {
            return Err(ExporterError::Config("ldap.pass cannot be empty".into()));
        }
        if self.ipa_domain.is_empty() {
            return Err(ExporterError::Config("ldap.ipa_domain cannot be empty".into()));
        }
        if self.ipa_domain.split('.').any(str::is_empty) {
            return Err(ExporterError::Config(format!(
                "ldap.ipa_domain has an empty label: {:?}",
                self.ipa_domain
            )));
        }
        if self.addr.is_empty() {
            return Err(ExporterError::Config("ldap.addr cannot be empty".into()));
        }
        if !(1..=300).contains(&self.conn_timeout_secs) {
            return Err(ExporterError::Config(
                "ldap.conn_timeout_secs must be between 1 and 300".into(),
            ));
        }
        Ok(())
    }

    /// Connection URL; a bare `host:port` is treated as plain `ldap://`.
    pub fn url(&self) -> String {
        if self.addr.contains("://") {
            self.addr.clone()
        } else {
            format!("ldap://{}", self.addr)
        }
    }

    pub fn conn_timeout(&self) -> Duration {
        Duration::from_secs(self.conn_timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapeSection {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Upper bound for one whole scrape cycle. Unset means no deadline.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ScrapeSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timeout_secs: None,
        }
    }
}

impl ScrapeSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=86400).contains(&self.interval_secs) {
            return Err(ExporterError::Config(
                "scrape.interval_secs must be between 1 and 86400".into(),
            ));
        }
        if let Some(t) = self.timeout_secs {
            if t == 0 || t > self.interval_secs {
                return Err(ExporterError::Config(
                    "scrape.timeout_secs must be between 1 and scrape.interval_secs".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub json: bool,
}

fn default_version() -> u32 {
    1
}
fn default_listen() -> String {
    "0.0.0.0:9496".into()
}
fn default_telemetry_path() -> String {
    "/metrics".into()
}
fn default_ldap_addr() -> String {
    "localhost:389".into()
}
fn default_ldap_user() -> String {
    "cn=Directory Manager".into()
}
fn default_conn_timeout_secs() -> u64 {
    10
}
fn default_interval_secs() -> u64 {
    60
}
