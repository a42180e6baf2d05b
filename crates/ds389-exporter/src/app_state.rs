//! Shared application state for the exporter.
//!
//! Owns the validated config and the process-wide metric registry. The HTTP
//! handlers read the registry through this state; the scrape loop gets the
//! same registry through [`AppState::scraper`].

use std::sync::Arc;

use ds389_core::error::Result;

use crate::config::ExporterConfig;
use crate::directory::{DirectoryConnector, LdapConnector};
use crate::obs::ExporterMetrics;
use crate::scrape::{ScrapeParams, Scraper};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<ExporterMetrics>,
}

struct AppStateInner {
    cfg: ExporterConfig,
}

impl AppState {
    /// Build application state from a config. Validation is repeated so a
    /// hand-built config cannot skip it.
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            metrics: Arc::new(ExporterMetrics::new()),
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<ExporterMetrics> {
        Arc::clone(&self.metrics)
    }

    fn scrape_params(&self) -> ScrapeParams {
        let ldap = &self.inner.cfg.ldap;
        ScrapeParams {
            user: ldap.user.clone(),
            pass: ldap.pass.clone(),
            domain: ldap.ipa_domain.clone(),
            timeout: self.inner.cfg.scrape.timeout(),
        }
    }

    /// Scraper talking to the configured LDAP server.
    pub fn scraper(&self) -> Scraper {
        let ldap = &self.inner.cfg.ldap;
        let connector = Arc::new(LdapConnector::new(ldap.url(), ldap.conn_timeout()));
        self.scraper_with(connector)
    }

    /// Scraper using an arbitrary directory connector.
    pub fn scraper_with(&self, connector: Arc<dyn DirectoryConnector>) -> Scraper {
        Scraper::new(connector, self.metrics(), self.scrape_params())
    }
}
