use sha2::{Digest, Sha256};

/// Number of leading hex characters of the SHA-256 digest used for bucketing.
const HASH_PREFIX_HEX_LEN: usize = 8;

/// Returns the bucket in `[0, 100)` for `key`.
///
/// The bucket is the first 8 hex characters of the SHA-256 digest read as an
/// unsigned integer, modulo 100. Existing rollouts depend on this exact
/// mapping.
pub fn bucket_for(key: &str) -> u32 {
    let digest = Sha256::digest(key.as_bytes());
    let prefix = &digest[..HASH_PREFIX_HEX_LEN / 2];
    let value = prefix
        .iter()
        .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte));
    value % 100
}

/// Decides whether `key` falls inside a rollout of `percentage` percent.
///
/// `percentage >= 100` is always enabled and `percentage <= 0` never is;
/// neither case hashes the key.
pub fn deterministic_bucket(key: &str, percentage: i64) -> bool {
    if percentage >= 100 {
        return true;
    }
    if percentage <= 0 {
        return false;
    }

    i64::from(bucket_for(key)) < percentage
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    #[test]
    fn known_vectors() {
        // sha256("user-1RISK_RADAR") starts with 8f85a06b
        assert_eq!(bucket_for("user-1RISK_RADAR"), 0x8f85a06b % 100);
        assert_eq!(bucket_for("user-1RISK_RADAR"), 43);
        assert_eq!(bucket_for("user-2RISK_RADAR"), 72);
        assert_eq!(bucket_for("abcPROPOSAL_REVIEW"), 11);
        assert_eq!(bucket_for("client-42STICKY_CTA"), 57);
        assert_eq!(bucket_for(""), 10);
        assert_eq!(bucket_for("hello"), 14);
    }

    #[test]
    fn threshold_is_exclusive() {
        // bucket 43
        assert!(!deterministic_bucket("user-1RISK_RADAR", 43));
        assert!(deterministic_bucket("user-1RISK_RADAR", 44));
    }

    #[test]
    fn bounds_short_circuit() {
        for key in ["", "a", "user-1RISK_RADAR", "🦀"] {
            assert!(deterministic_bucket(key, 100));
            assert!(deterministic_bucket(key, 250));
            assert!(!deterministic_bucket(key, 0));
            assert!(!deterministic_bucket(key, -10));
        }
    }

    #[test]
    fn stable_across_calls() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let key: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(16)
                .map(char::from)
                .collect();
            let pct = rng.gen_range(1..100);
            let first = deterministic_bucket(&key, pct);
            for _ in 0..5 {
                assert_eq!(deterministic_bucket(&key, pct), first);
            }
        }
    }

    #[test]
    fn enable_rate_tracks_percentage() {
        let mut rng = rand::thread_rng();
        let samples = 100_000;
        let enabled = (0..samples)
            .filter(|_| {
                let key: String = (&mut rng)
                    .sample_iter(&Alphanumeric)
                    .take(20)
                    .map(char::from)
                    .collect();
                deterministic_bucket(&key, 30)
            })
            .count();

        let rate = enabled as f64 / samples as f64;
        assert!((rate - 0.30).abs() < 0.02, "rate was {rate}");
    }
}
