//! Random password generation.

use rand::Rng;

/// Length of every generated password.
pub const PASSWORD_LEN: usize = 20;

/// The 93 characters a generated password is drawn from.
pub const ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890~`!@#$%^&*()-_=+[{]}\\;:'\"/?.>,<";

/// Generate a password of `PASSWORD_LEN` characters.
///
/// Each character is picked uniformly from `ALPHABET` with the thread-local
/// CSPRNG.
pub fn generate_password() -> String {
    let mut rng = rand::rng();
    (0..PASSWORD_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}
