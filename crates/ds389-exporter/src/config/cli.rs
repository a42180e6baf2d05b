//! Command line flags. Every flag overrides the matching YAML key.

use clap::Parser;

use ds389_core::error::Result;

use super::{parse_file, ExporterConfig};

#[derive(Debug, Default, Parser)]
#[command(
    name = "ds389-exporter",
    version,
    about = "Prometheus exporter for 389 Directory Server / FreeIPA"
)]
pub struct Cli {
    /// Optional YAML config file.
    #[arg(long)]
    pub config: Option<String>,

    /// Bind address for the prometheus HTTP metrics server.
    #[arg(long = "web.listen-address")]
    pub listen_address: Option<String>,

    /// Path to expose metrics on.
    #[arg(long = "web.telemetry-path")]
    pub telemetry_path: Option<String>,

    /// Address of the 389ds server.
    #[arg(long = "ldap.addr")]
    pub ldap_addr: Option<String>,

    /// 389ds Directory Manager user.
    #[arg(long = "ldap.user")]
    pub ldap_user: Option<String>,

    /// 389ds Directory Manager password.
    #[arg(long = "ldap.pass", env = "LDAP_PASS", hide_env_values = true)]
    pub ldap_pass: Option<String>,

    /// FreeIPA domain e.g. example.org
    #[arg(long = "ipa-domain")]
    pub ipa_domain: Option<String>,

    /// Scrape interval, e.g. 60s, 5m, 1h or 1m30s.
    #[arg(long, value_parser = parse_interval)]
    pub interval: Option<u64>,

    /// Debug logging.
    #[arg(long)]
    pub debug: bool,

    /// JSON formatted log messages.
    #[arg(long = "log-json")]
    pub log_json: bool,
}

impl Cli {
    /// Load the config file (if any), apply flag overrides, then validate.
    pub fn resolve(self) -> Result<ExporterConfig> {
        let base = match &self.config {
            Some(path) => parse_file(path)?,
            None => ExporterConfig::default(),
        };
        let cfg = self.apply(base);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply(self, mut cfg: ExporterConfig) -> ExporterConfig {
        if let Some(v) = self.listen_address {
            cfg.web.listen = v;
        }
        if let Some(v) = self.telemetry_path {
            cfg.web.telemetry_path = v;
        }
        if let Some(v) = self.ldap_addr {
            cfg.ldap.addr = v;
        }
        if let Some(v) = self.ldap_user {
            cfg.ldap.user = v;
        }
        if let Some(v) = self.ldap_pass {
            cfg.ldap.pass = v;
        }
        if let Some(v) = self.ipa_domain {
            cfg.ldap.ipa_domain = v;
        }
        if let Some(v) = self.interval {
            cfg.scrape.interval_secs = v;
        }
        cfg.log.debug |= self.debug;
        cfg.log.json |= self.log_json;
        cfg
    }
}

/// Parse `90`, `90s`, `5m`, `1h` or compounds such as `1h30m` and `1m30s`
/// into whole seconds. A bare number means seconds.
pub fn parse_interval(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    let invalid = || format!("invalid interval {s:?}, expected e.g. 60s, 5m, 1h or 1m30s");
    let too_large = || format!("interval {s:?} is too large");

    if s.is_empty() {
        return Err(invalid());
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().map_err(|_| too_large());
    }

    let mut total: u64 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
        if digits == 0 {
            return Err(invalid());
        }
        let n: u64 = rest[..digits].parse().map_err(|_| too_large())?;
        let unit = rest[digits..].chars().next().ok_or_else(invalid)?;
        let mult = match unit {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return Err(invalid()),
        };
        total = n
            .checked_mul(mult)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(too_large)?;
        rest = &rest[digits + 1..];
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_units() {
        assert_eq!(parse_interval("60"), Ok(60));
        assert_eq!(parse_interval("60s"), Ok(60));
        assert_eq!(parse_interval("5m"), Ok(300));
        assert_eq!(parse_interval("1h"), Ok(3600));
        assert!(parse_interval("soon").is_err());
        assert!(parse_interval("").is_err());
    }

    #[test]
    fn interval_compound_units() {
        assert_eq!(parse_interval("1m30s"), Ok(90));
        assert_eq!(parse_interval("1h5m"), Ok(3900));
        assert_eq!(parse_interval("2h0m10s"), Ok(7210));
        assert!(parse_interval("1m30").is_err());
        assert!(parse_interval("m30s").is_err());
        assert!(parse_interval("1.5m").is_err());
        assert!(parse_interval("1d").is_err());
        assert!(parse_interval("99999999999999999999h").is_err());
    }
}
