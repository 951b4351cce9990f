//! Request signing for the Cloudinary upload API.
//!
//! The signature is the hex SHA-256 digest of the signed parameters sorted by
//! key, serialized as `key=value` pairs joined with `&`, followed directly by
//! the API secret. `file`, `api_key`, `resource_type` and `cloud_name` are
//! never part of the signed set. The product environment must be configured
//! for SHA-256 signatures.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

/// Parameters excluded from the signature.
const UNSIGNED: &[&str] = &["file", "api_key", "resource_type", "cloud_name", "signature"];

/// Compute the request signature for `params`.
pub fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(key, value)| !UNSIGNED.contains(*key) && !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{:x}", Sha256::digest(format!("{to_sign}{api_secret}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&'static str, &str)]) -> BTreeMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn signature_matches_sorted_parameter_string() {
        let p = params(&[("timestamp", "1315060510"), ("public_id", "sample_image")]);
        let expected = format!(
            "{:x}",
            Sha256::digest("public_id=sample_image&timestamp=1315060510abcd")
        );
        assert_eq!(sign(&p, "abcd"), expected);
    }

    #[test]
    fn unsigned_and_empty_parameters_are_ignored() {
        let base = params(&[("timestamp", "1"), ("folder", "f")]);
        let noisy = params(&[
            ("timestamp", "1"),
            ("folder", "f"),
            ("api_key", "key"),
            ("file", "bytes"),
            ("public_id", ""),
        ]);
        assert_eq!(sign(&base, "s"), sign(&noisy, "s"));
    }

    #[test]
    fn signature_is_lowercase_hex_sha256() {
        let sig = sign(&params(&[("timestamp", "1")]), "s");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
