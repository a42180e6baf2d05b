//! Metrics registry for the exporter.
//!
//! Counter and gauge vectors with dynamic labels backed by `DashMap`. Labels
//! are flattened into sorted key vectors to keep deterministic ordering.
//! Gauges hold `f64` bit patterns in an `AtomicU64` so a reader never sees a
//! torn value while a scrape writes.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use ds389_core::query::CountMetric;

use crate::scrape::ScrapeRecorder;

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn write_series(out: &mut String, name: &str, key: &LabelKey, val: impl std::fmt::Display) {
    if key.is_empty() {
        let _ = writeln!(out, "{} {}", name, val);
        return;
    }
    let label_str = key
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
}

/// Sort rendered series so output is stable across scrapes.
fn sorted_keys<V>(map: &DashMap<LabelKey, V>) -> Vec<LabelKey> {
    let mut keys: Vec<LabelKey> = map.iter().map(|r| r.key().clone()).collect();
    keys.sort();
    keys
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value, 0 if the series was never touched.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} counter", name);
        for key in sorted_keys(&self.map) {
            if let Some(v) = self.map.get(&key) {
                write_series(out, name, &key, v.load(Ordering::Relaxed));
            }
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl GaugeVec {
    /// Overwrite the value of one series.
    pub fn set(&self, labels: &[(&str, &str)], v: f64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0f64.to_bits()));
        gauge.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Current value, `None` if the series was never set.
    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.map
            .get(&label_key(labels))
            .map(|g| f64::from_bits(g.load(Ordering::Relaxed)))
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} gauge", name);
        for key in sorted_keys(&self.map) {
            if let Some(v) = self.map.get(&key) {
                write_series(out, name, &key, f64::from_bits(v.load(Ordering::Relaxed)));
            }
        }
    }
}

const SENTINEL_NOTE: &str = "(-1 means the last scrape of this metric failed)";

/// All series published by the exporter. Constructed once at startup and
/// shared via `Arc` between the scrape loop and the HTTP handler.
#[derive(Default)]
pub struct ExporterMetrics {
    pub users: GaugeVec,
    pub groups: GaugeVec,
    pub hosts: GaugeVec,
    pub hostgroups: GaugeVec,
    pub hbac_rules: GaugeVec,
    pub sudo_rules: GaugeVec,
    pub dns_zones: GaugeVec,
    pub replication_conflicts: GaugeVec,
    pub replication_status: GaugeVec,
    pub scrape_count: CounterVec,
    pub scrape_duration: GaugeVec,
    pub last_scrape: GaugeVec,
}

impl ExporterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gauge and label set backing a count metric.
    pub fn count_series(
        &self,
        metric: CountMetric,
    ) -> (&GaugeVec, &'static [(&'static str, &'static str)]) {
        match metric {
            CountMetric::ActiveUsers => (&self.users, &[("type", "active")]),
            CountMetric::StagedUsers => (&self.users, &[("type", "staged")]),
            CountMetric::PreservedUsers => (&self.users, &[("type", "preserved")]),
            CountMetric::Groups => (&self.groups, &[]),
            CountMetric::Hosts => (&self.hosts, &[]),
            CountMetric::HostGroups => (&self.hostgroups, &[]),
            CountMetric::SudoRules => (&self.sudo_rules, &[]),
            CountMetric::HbacRules => (&self.hbac_rules, &[]),
            CountMetric::DnsZones => (&self.dns_zones, &[]),
            CountMetric::ReplicationConflicts => (&self.replication_conflicts, &[]),
        }
    }

    /// Last published value of a count metric.
    pub fn count(&self, metric: CountMetric) -> Option<f64> {
        let (gauge, labels) = self.count_series(metric);
        gauge.get(labels)
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.users.render(
            "ldap_389ds_users",
            &format!("Number of user accounts {SENTINEL_NOTE}"),
            &mut out,
        );
        self.groups.render(
            "ldap_389ds_groups",
            &format!("Number of groups {SENTINEL_NOTE}"),
            &mut out,
        );
        self.hosts.render(
            "ldap_389ds_hosts",
            &format!("Number of hosts {SENTINEL_NOTE}"),
            &mut out,
        );
        self.hostgroups.render(
            "ldap_389ds_hostgroups",
            &format!("Number of hostgroups {SENTINEL_NOTE}"),
            &mut out,
        );
        self.hbac_rules.render(
            "ldap_389ds_hbac_rules",
            &format!("Number of hbac rules {SENTINEL_NOTE}"),
            &mut out,
        );
        self.sudo_rules.render(
            "ldap_389ds_sudo_rules",
            &format!("Number of sudo rules {SENTINEL_NOTE}"),
            &mut out,
        );
        self.dns_zones.render(
            "ldap_389ds_dns_zones",
            &format!("Number of dns zones {SENTINEL_NOTE}"),
            &mut out,
        );
        self.replication_conflicts.render(
            "ldap_389ds_replication_conflicts",
            &format!("Number of ldap replication conflicts {SENTINEL_NOTE}"),
            &mut out,
        );
        self.replication_status.render(
            "ldap_389ds_replication_status",
            "Replication status by server (1 ok, 0 failing or unknown)",
            &mut out,
        );
        self.scrape_count.render(
            "ldap_389ds_scrape_count",
            "successful vs unsuccessful ldap scrape attempts",
            &mut out,
        );
        self.scrape_duration.render(
            "ldap_389ds_scrape_duration_seconds",
            "time taken per scrape",
            &mut out,
        );
        self.last_scrape.render(
            "ldap_389ds_last_scrape_timestamp_seconds",
            "unix time the last scrape finished",
            &mut out,
        );
        out
    }
}

impl ScrapeRecorder for ExporterMetrics {
    fn set_count(&self, metric: CountMetric, value: f64) {
        let (gauge, labels) = self.count_series(metric);
        gauge.set(labels, value);
    }

    fn set_replication_status(&self, host: &str, value: f64) {
        self.replication_status.set(&[("server", host)], value);
    }

    fn record_outcome(&self, ok: bool) {
        let result = if ok { "ok" } else { "fail" };
        self.scrape_count.inc(&[("result", result)]);
    }

    fn record_duration(&self, seconds: f64) {
        self.scrape_duration.set(&[], seconds);
    }

    fn record_finished_at(&self, unix_seconds: f64) {
        self.last_scrape.set(&[], unix_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_renders_without_braces_when_unlabelled() {
        let g = GaugeVec::default();
        g.set(&[], -1.0);
        let mut out = String::new();
        g.render("x", "help", &mut out);
        assert!(out.contains("\nx -1\n"), "{out}");
    }

    #[test]
    fn labels_are_sorted_and_escaped() {
        let c = CounterVec::default();
        c.inc(&[("b", "2"), ("a", "q\"uote")]);
        let mut out = String::new();
        c.render("c", "help", &mut out);
        assert!(out.contains("c{a=\"q\\\"uote\",b=\"2\"} 1"), "{out}");
    }

    #[test]
    fn users_share_one_family() {
        let m = ExporterMetrics::new();
        m.set_count(CountMetric::ActiveUsers, 10.0);
        m.set_count(CountMetric::StagedUsers, 2.0);
        let out = m.render();
        assert!(out.contains("ldap_389ds_users{type=\"active\"} 10"));
        assert!(out.contains("ldap_389ds_users{type=\"staged\"} 2"));
        assert_eq!(out.matches("# TYPE ldap_389ds_users gauge").count(), 1);
    }
}
