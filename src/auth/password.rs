use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;

lazy_static! {
    /// Stand-in digest checked when no account matches a login, so a miss
    /// costs one Argon2 verification just like a wrong password.
    static ref DUMMY_HASH: String = hash_password("fintrack-no-such-account").unwrap_or_default();
}

#[cfg(test)]
thread_local! {
    static VERIFICATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Argon2 verifications run on the current thread so far.
#[cfg(test)]
pub fn verifications() -> usize {
    VERIFICATIONS.with(|c| c.get())
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))?
        .to_string();
    Ok(hash)
}

/// Argon2 compares digests in constant time.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    #[cfg(test)]
    VERIFICATIONS.with(|c| c.set(c.get() + 1));

    let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("stored hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Checks a login attempt against the stored digest of the matched account.
///
/// `None` (no such account) and an empty digest both verify against
/// [`DUMMY_HASH`] and then report a mismatch.
pub fn verify_login(plain: &str, stored: Option<&str>) -> anyhow::Result<bool> {
    match stored.filter(|h| !h.is_empty()) {
        Some(hash) => verify_password(plain, hash),
        None => {
            if !DUMMY_HASH.is_empty() {
                verify_password(plain, &DUMMY_HASH)?;
            }
            Ok(false)
        }
    }
}
