//! Random short code generation.
//!
//! Codes are drawn from the thread-local CSPRNG (seeded from the OS) over a
//! 62-symbol alphabet, giving 62^8 possible codes.

use rand::Rng;

use super::validator::CODE_LENGTH;

/// Alphabet every generated code is drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Source of candidate short codes.
///
/// The engine validates every candidate and checks it against the store, so
/// implementations only have to produce values, not guarantee uniqueness.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Production generator backed by [`generate_code`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random [`CODE_LENGTH`]-character alphanumeric code.
///
/// # Examples
///
/// ```
/// use short_url::utils::code_generator::generate_code;
///
/// let code = generate_code();
/// assert_eq!(code.len(), 8);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}
