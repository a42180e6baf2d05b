//! Static table of directory queries run on every scrape.
//!
//! Each [`Target`] describes where to search and how to turn the result into
//! a number. The table order is the execution order.

use crate::dn;

/// LDAP search scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The base entry itself.
    Base,
    /// Immediate children of the base.
    OneLevel,
    /// Base and all descendants.
    Subtree,
}

/// How a search result becomes a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Read `numSubordinates` from the base entry.
    Subordinates,
    /// Count returned entries; attribute values are ignored.
    EntryCount,
}

/// The published count a target feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountMetric {
    ActiveUsers,
    StagedUsers,
    PreservedUsers,
    Groups,
    Hosts,
    HostGroups,
    SudoRules,
    HbacRules,
    DnsZones,
    ReplicationConflicts,
}

impl CountMetric {
    /// Short label used in debug logs.
    pub fn as_str(self) -> &'static str {
        match self {
            CountMetric::ActiveUsers => "active users",
            CountMetric::StagedUsers => "staged users",
            CountMetric::PreservedUsers => "preserved users",
            CountMetric::Groups => "groups",
            CountMetric::Hosts => "hosts",
            CountMetric::HostGroups => "hostgroups",
            CountMetric::SudoRules => "sudo rules",
            CountMetric::HbacRules => "hbac rules",
            CountMetric::DnsZones => "dns zones",
            CountMetric::ReplicationConflicts => "replication conflicts",
        }
    }
}

pub const NUM_SUBORDINATES: &str = "numSubordinates";
pub const ANY_OBJECT: &str = "(objectClass=*)";

/// One declarative directory query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub metric: CountMetric,
    /// DN relative to the base suffix; empty means the suffix itself.
    pub relative_dn: &'static str,
    pub filter: &'static str,
    pub scope: Scope,
    pub attr: &'static str,
    pub kind: QueryKind,
}

impl Target {
    const fn subordinates(metric: CountMetric, relative_dn: &'static str) -> Self {
        Self {
            metric,
            relative_dn,
            filter: ANY_OBJECT,
            scope: Scope::Base,
            attr: NUM_SUBORDINATES,
            kind: QueryKind::Subordinates,
        }
    }

    const fn count(
        metric: CountMetric,
        relative_dn: &'static str,
        filter: &'static str,
        attr: &'static str,
        scope: Scope,
    ) -> Self {
        Self {
            metric,
            relative_dn,
            filter,
            scope,
            attr,
            kind: QueryKind::EntryCount,
        }
    }

    /// Absolute search base for this target under `suffix`.
    pub fn base_dn(&self, suffix: &str) -> String {
        dn::under(self.relative_dn, suffix)
    }
}

/// Count queries, in execution order.
pub const TARGETS: &[Target] = &[
    Target::subordinates(CountMetric::ActiveUsers, "cn=users,cn=accounts"),
    Target::subordinates(
        CountMetric::StagedUsers,
        "cn=staged users,cn=accounts,cn=provisioning",
    ),
    Target::subordinates(
        CountMetric::PreservedUsers,
        "cn=deleted users,cn=accounts,cn=provisioning",
    ),
    Target::subordinates(CountMetric::Groups, "cn=groups,cn=accounts"),
    Target::subordinates(CountMetric::Hosts, "cn=computers,cn=accounts"),
    Target::subordinates(CountMetric::HostGroups, "cn=hostgroups,cn=accounts"),
    Target::subordinates(CountMetric::SudoRules, "cn=sudorules,cn=sudo"),
    Target::count(
        CountMetric::HbacRules,
        "cn=hbac",
        "(objectClass=ipahbacrule)",
        "ipaUniqueID",
        Scope::OneLevel,
    ),
    Target::count(
        CountMetric::DnsZones,
        "cn=dns",
        "(|(objectClass=idnszone)(objectClass=idnsforwardzone))",
        "idnsName",
        Scope::OneLevel,
    ),
    Target::count(
        CountMetric::ReplicationConflicts,
        "",
        "(nsds5ReplConflict=*)",
        "nsds5ReplConflict",
        Scope::Subtree,
    ),
];

/// Replication agreement search, run after all count targets.
pub mod replication {
    pub const FILTER: &str = "(objectClass=nsds5replicationagreement)";
    pub const HOST_ATTR: &str = "nsDS5ReplicaHost";
    pub const STATUS_ATTR: &str = "nsds5replicaLastUpdateStatus";
}
