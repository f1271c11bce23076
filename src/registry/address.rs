//! Registry address normalization
//!
//! Addresses are compared in exactly one canonical form: the string as given,
//! minus trailing slashes. No scheme stripping and no case folding take place,
//! so `https://ghcr.io` and `ghcr.io` remain distinct registries.

/// Canonicalize a registry address for comparison
pub fn normalize(address: &str) -> String {
    address.trim_end_matches('/').to_string()
}

/// Whether two addresses name the same registry
pub fn same_registry(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
