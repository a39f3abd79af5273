use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::modules::auth::application::domain::entities::User;
use crate::modules::auth::application::ports::outgoing::ConfirmationCodes;

const DIGEST_LEN: usize = 32; // hex chars kept from the sha256 digest

/// Stateless confirmation codes: `<ts36>-<digest>` where the digest covers a
/// secret, the user's mutable fields and the issue timestamp. Nothing is
/// stored; verification recomputes the digest from the record as it is *now*,
/// so changing any covered field invalidates every outstanding code.
pub struct StatelessCodeGenerator {
    secret: String,
    max_age_seconds: i64,
}

impl StatelessCodeGenerator {
    pub fn new(secret: String, max_age_seconds: i64) -> Self {
        assert!(secret.len() >= 32, "confirmation secret too short");
        Self {
            secret,
            max_age_seconds,
        }
    }

    fn fingerprint(user: &User) -> String {
        format!(
            "{}\x1f{}\x1f{}\x1f{}",
            user.id,
            user.username,
            user.email,
            user.role.as_str()
        )
    }

    fn digest(&self, user: &User, ts36: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update([0u8]);
        hasher.update(Self::fingerprint(user).as_bytes());
        hasher.update([0u8]);
        hasher.update(ts36.as_bytes());

        let digest = hasher.finalize();
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        hex[..DIGEST_LEN].to_string()
    }

    fn code_at(&self, user: &User, timestamp: i64) -> String {
        let ts36 = to_base36(timestamp);
        let digest = self.digest(user, &ts36);
        format!("{}-{}", ts36, digest)
    }
}

impl ConfirmationCodes for StatelessCodeGenerator {
    fn issue(&self, user: &User) -> String {
        self.code_at(user, Utc::now().timestamp())
    }

    fn verify(&self, user: &User, code: &str) -> bool {
        let Some((ts36, digest)) = code.split_once('-') else {
            return false;
        };
        let Some(timestamp) = from_base36(ts36) else {
            return false;
        };

        let age = Utc::now().timestamp() - timestamp;
        if age < 0 || age > self.max_age_seconds {
            return false;
        }

        // Fixed-length hex comparison; recomputed from the current record.
        self.digest(user, ts36) == digest
    }
}

fn to_base36(mut value: i64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 output is ascii")
}

fn from_base36(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    i64::from_str_radix(s, 36).ok()
}
