//! Distinguished name helpers.

/// Map a DNS domain onto its directory base suffix.
///
/// `example.org` becomes `dc=example,dc=org`; label order is preserved.
pub fn base_suffix(domain: &str) -> String {
    domain
        .split('.')
        .map(|label| format!("dc={label}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape a DN so it can be embedded as a single RDN value.
pub fn escape_rdn_value(dn: &str) -> String {
    dn.replace('=', "\\=").replace(',', "\\,")
}

/// Container holding the replication agreements of `suffix`.
pub fn replica_base(suffix: &str) -> String {
    format!(
        "cn=replica,cn={},cn=mapping tree,cn=config",
        escape_rdn_value(suffix)
    )
}

/// Join a relative path onto the suffix. An empty path yields the suffix itself.
pub fn under(relative: &str, suffix: &str) -> String {
    if relative.is_empty() {
        suffix.to_string()
    } else {
        format!("{relative},{suffix}")
    }
}
