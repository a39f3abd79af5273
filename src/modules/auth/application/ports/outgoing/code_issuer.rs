use crate::modules::auth::application::domain::entities::User;

/// Single-use confirmation codes proving email ownership before a token is
/// minted.
///
/// Codes are derived, not stored: validity is a deterministic function of a
/// shared secret and the user's current field values, so mutating the record
/// invalidates anything issued earlier.
pub trait ConfirmationCodes: Send + Sync {
    fn issue(&self, user: &User) -> String;

    fn verify(&self, user: &User, code: &str) -> bool;
}
