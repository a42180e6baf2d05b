//! `ldap3` backed directory client.

use std::time::Duration;

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, SearchEntry};

use ds389_core::error::{ExporterError, Result};
use ds389_core::query::Scope;

use super::{DirEntry, Directory, DirectoryConnector};

pub struct LdapConnector {
    url: String,
    conn_timeout: Duration,
}

impl LdapConnector {
    pub fn new(url: impl Into<String>, conn_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            conn_timeout,
        }
    }
}

fn ldap_scope(scope: Scope) -> ldap3::Scope {
    match scope {
        Scope::Base => ldap3::Scope::Base,
        Scope::OneLevel => ldap3::Scope::OneLevel,
        Scope::Subtree => ldap3::Scope::Subtree,
    }
}

#[async_trait]
impl DirectoryConnector for LdapConnector {
    async fn connect(&self, user: &str, pass: &str) -> Result<Box<dyn Directory>> {
        let settings = LdapConnSettings::new().set_conn_timeout(self.conn_timeout);
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.url)
            .await
            .map_err(|e| ExporterError::Connect {
                addr: self.url.clone(),
                reason: e.to_string(),
            })?;

        let addr = self.url.clone();
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(%addr, error = %e, "ldap connection driver stopped");
            }
        });

        let bound = ldap
            .simple_bind(user, pass)
            .await
            .and_then(|r| r.success());
        if let Err(e) = bound {
            let _ = ldap.unbind().await;
            return Err(ExporterError::Bind {
                user: user.to_string(),
                reason: e.to_string(),
            });
        }

        Ok(Box::new(LdapSession { ldap }))
    }

    fn addr(&self) -> &str {
        &self.url
    }
}

struct LdapSession {
    ldap: Ldap,
}

#[async_trait]
impl Directory for LdapSession {
    async fn search(
        &mut self,
        base: &str,
        scope: Scope,
        filter: &str,
        attrs: &[&str],
    ) -> Result<Vec<DirEntry>> {
        let (entries, _res) = self
            .ldap
            .search(base, ldap_scope(scope), filter, attrs.to_vec())
            .await
            .and_then(|r| r.success())
            .map_err(|e| ExporterError::Search {
                base: base.to_string(),
                filter: filter.to_string(),
                reason: e.to_string(),
            })?;

        Ok(entries
            .into_iter()
            .map(|re| {
                let e = SearchEntry::construct(re);
                DirEntry {
                    dn: e.dn,
                    attrs: e.attrs,
                }
            })
            .collect())
    }

    async fn unbind(&mut self) -> Result<()> {
        self.ldap
            .unbind()
            .await
            .map_err(|e| ExporterError::Internal(format!("unbind failed: {e}")))
    }
}
