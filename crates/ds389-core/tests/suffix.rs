#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use ds389_core::dn;
use ds389_core::query::{CountMetric, QueryKind, Scope, TARGETS};

#[test]
fn suffix_has_one_component_per_label_in_order() {
    for domain in ["org", "example.org", "ipa.example.org", "a.b.c.d.e"] {
        let labels: Vec<&str> = domain.split('.').collect();
        let suffix = dn::base_suffix(domain);
        let parts: Vec<&str> = suffix.split(',').collect();

        assert_eq!(parts.len(), labels.len(), "domain {domain}");
        for (part, label) in parts.iter().zip(&labels) {
            assert_eq!(*part, format!("dc={label}"));
        }
    }
}

#[test]
fn suffix_is_pure() {
    assert_eq!(dn::base_suffix("example.org"), dn::base_suffix("example.org"));
}

#[test]
fn targets_resolve_under_suffix() {
    let suffix = dn::base_suffix("example.org");
    let bases: Vec<(CountMetric, String)> = TARGETS
        .iter()
        .map(|t| (t.metric, t.base_dn(&suffix)))
        .collect();

    assert_eq!(
        bases[0],
        (
            CountMetric::ActiveUsers,
            "cn=users,cn=accounts,dc=example,dc=org".to_string()
        )
    );
    assert!(bases.contains(&(
        CountMetric::StagedUsers,
        "cn=staged users,cn=accounts,cn=provisioning,dc=example,dc=org".to_string()
    )));
    assert!(bases.contains(&(CountMetric::DnsZones, "cn=dns,dc=example,dc=org".to_string())));
}

#[test]
fn entry_count_targets_are_not_base_scoped() {
    for t in TARGETS.iter().filter(|t| t.kind == QueryKind::EntryCount) {
        assert_ne!(t.scope, Scope::Base, "{}", t.metric.as_str());
    }
}
