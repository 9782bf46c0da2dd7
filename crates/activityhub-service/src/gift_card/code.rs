//! Random gift card codes.

use rand::Rng;

/// Length of generated codes.
pub const CODE_LENGTH: usize = 16;

/// Uppercase letters and digits without the look-alikes `0`, `O`, `1`, `I`.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generates a random 16-character gift card code.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
        assert_ne!(code, generate_code());
    }
}
