//! Scrape orchestration.
//!
//! One cycle: connect + bind, run every [`TARGETS`] entry and the replication
//! agreement search in order, record results, release the connection. A
//! failing sub-query writes its sentinel and the cycle moves on; only a
//! connect/bind failure aborts early.

pub mod scheduler;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use ds389_core::dn;
use ds389_core::error::{ExporterError, Result};
use ds389_core::query::{self, CountMetric, QueryKind, Scope, Target, TARGETS};
use ds389_core::replication::{Agreement, ReplicaHealth};

use crate::directory::{Directory, DirectoryConnector};

/// Value written to a count gauge whose query failed this cycle.
pub const FAILED_SENTINEL: f64 = -1.0;

/// Write side of the metric registry, one method per metric family.
pub trait ScrapeRecorder: Send + Sync {
    fn set_count(&self, metric: CountMetric, value: f64);
    fn set_replication_status(&self, host: &str, value: f64);
    fn record_outcome(&self, ok: bool);
    fn record_duration(&self, seconds: f64);
    fn record_finished_at(&self, unix_seconds: f64);
}

/// Credentials and domain for a scrape cycle.
#[derive(Debug, Clone)]
pub struct ScrapeParams {
    pub user: String,
    pub pass: String,
    pub domain: String,
    pub timeout: Option<Duration>,
}

pub struct Scraper {
    connector: Arc<dyn DirectoryConnector>,
    recorder: Arc<dyn ScrapeRecorder>,
    params: ScrapeParams,
}

impl Scraper {
    pub fn new(
        connector: Arc<dyn DirectoryConnector>,
        recorder: Arc<dyn ScrapeRecorder>,
        params: ScrapeParams,
    ) -> Self {
        Self {
            connector,
            recorder,
            params,
        }
    }

    /// Run one full cycle and record its outcome, duration and finish time.
    /// The returned error has already been logged and counted.
    pub async fn run_once(&self) -> Result<()> {
        let start = Instant::now();
        tracing::debug!(addr = %self.connector.addr(), "starting metrics scrape");

        let res = self.scrape_all().await;

        match &res {
            Ok(()) => self.recorder.record_outcome(true),
            Err(e) => {
                self.recorder.record_outcome(false);
                tracing::error!(kind = e.kind().as_str(), error = %e, "scrape failed");
            }
        }

        let elapsed = start.elapsed().as_secs_f64();
        self.recorder.record_duration(elapsed);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        self.recorder.record_finished_at(now);
        tracing::info!(elapsed_secs = elapsed, "scrape completed");

        res
    }

    /// The deadline covers connect and queries; the unbind after a successful
    /// connect runs outside it so an expired cycle still releases its session.
    async fn scrape_all(&self) -> Result<()> {
        let suffix = dn::base_suffix(&self.params.domain);
        let deadline = self
            .params
            .timeout
            .map(|limit| (tokio::time::Instant::now() + limit, limit));

        let mut conn = within(
            deadline,
            self.connector.connect(&self.params.user, &self.params.pass),
        )
        .await?;

        let res = within(deadline, run_queries(&mut *conn, &*self.recorder, &suffix)).await;

        if let Err(e) = conn.unbind().await {
            tracing::debug!(error = %e, "ldap unbind failed");
        }

        res
    }
}

async fn within<T>(
    deadline: Option<(tokio::time::Instant, Duration)>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match deadline {
        Some((at, limit)) => tokio::time::timeout_at(at, fut)
            .await
            .unwrap_or_else(|_| Err(ExporterError::Timeout(limit))),
        None => fut.await,
    }
}

/// Run every sub-query against an open session, collecting failures.
pub async fn run_queries(
    conn: &mut dyn Directory,
    recorder: &dyn ScrapeRecorder,
    suffix: &str,
) -> Result<()> {
    let mut errs = Vec::new();

    for target in TARGETS {
        tracing::debug!(metric = target.metric.as_str(), "getting count");
        let value = match count(conn, target, suffix).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(metric = target.metric.as_str(), error = %e, "count query failed");
                errs.push(e);
                FAILED_SENTINEL
            }
        };
        recorder.set_count(target.metric, value);
    }

    tracing::debug!("getting replication agreements");
    match replication_agreements(conn, suffix).await {
        Ok(agreements) => {
            for a in agreements {
                let health = a.health();
                if health == ReplicaHealth::Unknown {
                    tracing::warn!(
                        host = %a.host,
                        status = %a.status,
                        "unknown replication status"
                    );
                }
                recorder.set_replication_status(&a.host, health.value());
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "replication query failed");
            errs.push(e);
        }
    }

    ExporterError::from_partial(errs)
}

async fn count(conn: &mut dyn Directory, target: &Target, suffix: &str) -> Result<f64> {
    let base = target.base_dn(suffix);
    let entries = conn
        .search(&base, target.scope, target.filter, &[target.attr])
        .await?;

    match target.kind {
        QueryKind::EntryCount => Ok(entries.len() as f64),
        QueryKind::Subordinates => {
            let raw = entries
                .first()
                .and_then(|e| e.first(target.attr))
                .ok_or_else(|| ExporterError::MissingAttribute {
                    attr: target.attr.to_string(),
                    base: base.clone(),
                })?;
            raw.trim()
                .parse::<f64>()
                .map_err(|_| ExporterError::InvalidNumber {
                    attr: target.attr.to_string(),
                    base,
                    value: raw.to_string(),
                })
        }
    }
}

async fn replication_agreements(conn: &mut dyn Directory, suffix: &str) -> Result<Vec<Agreement>> {
    let base = dn::replica_base(suffix);
    let entries = conn
        .search(
            &base,
            Scope::OneLevel,
            query::replication::FILTER,
            &[query::replication::HOST_ATTR, query::replication::STATUS_ATTR],
        )
        .await?;

    Ok(entries
        .iter()
        .map(|e| Agreement {
            host: e.first(query::replication::HOST_ATTR).unwrap_or_default().to_string(),
            status: e.first(query::replication::STATUS_ATTR).unwrap_or_default().to_string(),
        })
        .collect())
}
