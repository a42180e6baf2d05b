//! Replication agreement status classification.

/// Health of one replication agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicaHealth {
    Healthy,
    Unhealthy,
    /// Status text not covered by [`RULES`].
    Unknown,
}

impl ReplicaHealth {
    /// Published gauge value. Unknown is reported as unhealthy.
    pub fn value(self) -> f64 {
        match self {
            ReplicaHealth::Healthy => 1.0,
            ReplicaHealth::Unhealthy | ReplicaHealth::Unknown => 0.0,
        }
    }
}

/// Substring rules, evaluated top to bottom; first match wins.
pub const RULES: &[(&str, ReplicaHealth)] = &[
    // Error (0) Replica acquired successfully: Incremental update succeeded
    ("Incremental update succeeded", ReplicaHealth::Healthy),
    // Error (-1) Problem connecting to replica - LDAP error: Can't contact LDAP server
    ("Problem connecting to replica", ReplicaHealth::Unhealthy),
    // Error (1) Can't acquire busy replica; the supplier is just waiting its turn
    ("Can't acquire busy replica", ReplicaHealth::Healthy),
];

pub fn classify(status: &str) -> ReplicaHealth {
    RULES
        .iter()
        .find(|(pattern, _)| status.contains(pattern))
        .map(|(_, health)| *health)
        .unwrap_or(ReplicaHealth::Unknown)
}

/// One agreement as read from the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agreement {
    pub host: String,
    pub status: String,
}

impl Agreement {
    pub fn health(&self) -> ReplicaHealth {
        classify(&self.status)
    }
}
