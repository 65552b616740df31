//! Signature header parsing and HMAC-SHA256 verification

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const TIMESTAMP_KEY: &str = "ts";
const HASH_KEY: &str = "h1";

/// Components of a `ts=<unix-seconds>;h1=<hex-hmac>` signature header.
///
/// More than one `h1` may be present while a sender rotates secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: String,
    pub hashes: Vec<String>,
}

impl SignatureHeader {
    /// Parse a signature header. Returns `None` unless a non-empty `ts`
    /// and at least one non-empty `h1` are present.
    pub fn parse(header: &str) -> Option<Self> {
        let mut timestamp: Option<&str> = None;
        let mut hashes = Vec::new();

        for segment in header.split(';') {
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                TIMESTAMP_KEY if timestamp.is_none() => timestamp = Some(value),
                HASH_KEY => hashes.push(value.to_string()),
                _ => {}
            }
        }

        let timestamp = timestamp?;
        if hashes.is_empty() {
            return None;
        }

        Some(Self {
            timestamp: timestamp.to_string(),
            hashes,
        })
    }

    /// The timestamp as unix seconds, if it is an integer
    pub fn unix_seconds(&self) -> Option<i64> {
        self.timestamp.parse().ok()
    }
}

/// Lowercase hex HMAC-SHA256 of `timestamp + ":" + body`.
/// Returns `None` for an empty secret.
pub fn compute_hash(body: &[u8], secret: &str, timestamp: &str) -> Option<String> {
    if secret.is_empty() {
        return None;
    }
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Checks `header` against the already parsed signature components
pub(crate) fn header_matches(body: &[u8], secret: &str, header: &SignatureHeader) -> bool {
    let Some(expected) = compute_hash(body, secret, &header.timestamp) else {
        debug!("Refusing to verify webhook with an empty secret");
        return false;
    };

    // Evaluate every candidate so the number of comparisons does not depend on which one matched
    let matched = header
        .hashes
        .iter()
        .fold(false, |acc, provided| acc | constant_time_eq(&expected, provided));

    if !matched {
        debug!("Webhook signature did not match any provided h1 value");
    }
    matched
}

/// Returns true only if `signature_header` carries a hash equal to
/// HMAC-SHA256(secret, ts + ":" + body). Fails closed on a malformed header.
pub fn is_signature_valid(request_body: &[u8], secret_key: &str, signature_header: &str) -> bool {
    match SignatureHeader::parse(signature_header) {
        Some(header) => header_matches(request_body, secret_key, &header),
        None => {
            debug!("Webhook signature header is missing ts or h1");
            false
        }
    }
}

/// Build a signature header for `request_body` at `timestamp`
pub fn sign(request_body: &[u8], secret_key: &str, timestamp: i64) -> String {
    let ts = timestamp.to_string();
    let hash = compute_hash(request_body, secret_key, &ts).unwrap_or_default();
    format!("{TIMESTAMP_KEY}={ts};{HASH_KEY}={hash}")
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "pdl_ntfset_test_secret";
    const BODY: &[u8] = br#"{"type":"transaction.completed","amount":"10.00"}"#;

    #[test]
    fn test_parse_header() {
        let header = SignatureHeader::parse("ts=1671552777;h1=abc123").unwrap();
        assert_eq!(header.timestamp, "1671552777");
        assert_eq!(header.hashes, vec!["abc123".to_string()]);
        assert_eq!(header.unix_seconds(), Some(1671552777));
    }

    #[test]
    fn test_parse_header_tolerates_whitespace_and_unknown_keys() {
        let header = SignatureHeader::parse(" ts=1 ; v0=zzz ; h1=aa ;h1=bb").unwrap();
        assert_eq!(header.timestamp, "1");
        assert_eq!(header.hashes, vec!["aa".to_string(), "bb".to_string()]);
    }

    #[test]
    fn test_parse_header_missing_parts() {
        assert!(SignatureHeader::parse("").is_none());
        assert!(SignatureHeader::parse("h1=abc").is_none());
        assert!(SignatureHeader::parse("ts=123").is_none());
        assert!(SignatureHeader::parse("ts=;h1=abc").is_none());
        assert!(SignatureHeader::parse("ts=123;h1=").is_none());
        assert!(SignatureHeader::parse("ts123;h1abc").is_none());
    }

    #[test]
    fn test_sign_then_verify() {
        let header = sign(BODY, SECRET, 1_700_000_000);
        assert!(header.starts_with("ts=1700000000;h1="));
        assert!(is_signature_valid(BODY, SECRET, &header));
    }

    #[test]
    fn test_known_vector() {
        // HMAC-SHA256("key", "1:hello")
        let hash = compute_hash(b"hello", "key", "1").unwrap();
        assert_eq!(
            hash,
            "cdda439a5a47454c284510a8395dfd32773a45500562bc1ac0849ad6febb3e6d"
        );
    }

    #[test]
    fn test_tampered_body_fails() {
        let header = sign(BODY, SECRET, 1_700_000_000);
        for i in 0..BODY.len() {
            let mut tampered = BODY.to_vec();
            tampered[i] ^= 0x01;
            assert!(!is_signature_valid(&tampered, SECRET, &header), "byte {i}");
        }
    }

    #[test]
    fn test_wrong_secret_fails() {
        let header = sign(BODY, SECRET, 1_700_000_000);
        assert!(!is_signature_valid(BODY, "another_secret", &header));
    }

    #[test]
    fn test_timestamp_is_covered_by_hash() {
        let header = sign(BODY, SECRET, 1_700_000_000);
        let replayed = header.replace("ts=1700000000", "ts=1700000001");
        assert!(!is_signature_valid(BODY, SECRET, &replayed));
    }

    #[test]
    fn test_empty_secret_fails_closed() {
        let header = sign(BODY, "", 1_700_000_000);
        assert!(!is_signature_valid(BODY, "", &header));
    }

    #[test]
    fn test_uppercase_or_truncated_hash_fails() {
        let hash = compute_hash(BODY, SECRET, "1700000000").unwrap();
        let upper = format!("ts=1700000000;h1={}", hash.to_uppercase());
        let short = format!("ts=1700000000;h1={}", &hash[..63]);
        assert!(!is_signature_valid(BODY, SECRET, &upper));
        assert!(!is_signature_valid(BODY, SECRET, &short));
    }

    #[test]
    fn test_any_of_multiple_hashes_matches() {
        let hash = compute_hash(BODY, SECRET, "1700000000").unwrap();
        let header = format!("ts=1700000000;h1=deadbeef;h1={hash}");
        assert!(is_signature_valid(BODY, SECRET, &header));
    }

    #[test]
    fn test_missing_components_fail() {
        let hash = compute_hash(BODY, SECRET, "1700000000").unwrap();
        assert!(!is_signature_valid(BODY, SECRET, &format!("h1={hash}")));
        assert!(!is_signature_valid(BODY, SECRET, "ts=1700000000"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(constant_time_eq("", ""));
    }
}
