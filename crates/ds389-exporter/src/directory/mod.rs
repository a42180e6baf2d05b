//! Directory client seam.
//!
//! The scrape orchestrator only talks to these traits; production wiring uses
//! [`ldap::LdapConnector`], tests plug in in-memory fakes.

pub mod ldap;

use std::collections::HashMap;

use async_trait::async_trait;

use ds389_core::error::Result;
use ds389_core::query::Scope;

pub use ldap::LdapConnector;

/// One search result entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirEntry {
    pub dn: String,
    pub attrs: HashMap<String, Vec<String>>,
}

impl DirEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attrs: HashMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs
            .entry(name.to_string())
            .or_default()
            .push(value.into());
        self
    }

    /// First value of `name`. Attribute names compare case-insensitively.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.first())
            .map(String::as_str)
    }
}

/// An authenticated directory session.
#[async_trait]
pub trait Directory: Send {
    async fn search(
        &mut self,
        base: &str,
        scope: Scope,
        filter: &str,
        attrs: &[&str],
    ) -> Result<Vec<DirEntry>>;

    /// Release the session. Errors are for logging only.
    async fn unbind(&mut self) -> Result<()>;
}

/// Opens and binds a [`Directory`] session.
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    async fn connect(&self, user: &str, pass: &str) -> Result<Box<dyn Directory>>;

    /// Address used in log lines.
    fn addr(&self) -> &str;
}
