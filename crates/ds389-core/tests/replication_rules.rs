#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use ds389_core::replication::{classify, Agreement, ReplicaHealth, RULES};

struct Case {
    status: &'static str,
    health: ReplicaHealth,
    value: f64,
}

const CASES: &[Case] = &[
    Case {
        status: "Error (0) Replica acquired successfully: Incremental update succeeded",
        health: ReplicaHealth::Healthy,
        value: 1.0,
    },
    Case {
        status: "Incremental update succeeded",
        health: ReplicaHealth::Healthy,
        value: 1.0,
    },
    Case {
        status: "Error (-1) Problem connecting to replica - LDAP error: Can't contact LDAP server (connection error)",
        health: ReplicaHealth::Unhealthy,
        value: 0.0,
    },
    Case {
        status: "Error (1) Can't acquire busy replica",
        health: ReplicaHealth::Healthy,
        value: 1.0,
    },
    Case {
        status: "garbage",
        health: ReplicaHealth::Unknown,
        value: 0.0,
    },
    Case {
        status: "",
        health: ReplicaHealth::Unknown,
        value: 0.0,
    },
];

#[test]
fn status_table() {
    for c in CASES {
        let got = classify(c.status);
        assert_eq!(got, c.health, "status: {:?}", c.status);
        assert_eq!(got.value(), c.value, "status: {:?}", c.status);
    }
}

#[test]
fn first_rule_wins() {
    // Matches both the "succeeded" and the "problem connecting" rule; order decides.
    let s = "Problem connecting to replica, then Incremental update succeeded";
    assert_eq!(classify(s), ReplicaHealth::Healthy);
    assert_eq!(RULES[0].1, ReplicaHealth::Healthy);
}

#[test]
fn matching_is_case_sensitive() {
    assert_eq!(classify("incremental update succeeded"), ReplicaHealth::Unknown);
}

#[test]
fn agreement_uses_classifier() {
    let a = Agreement {
        host: "ipa2.example.org".into(),
        status: "Error (1) Can't acquire busy replica".into(),
    };
    assert_eq!(a.health(), ReplicaHealth::Healthy);
}
