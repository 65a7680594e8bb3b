use rand::Rng;

/// Letters used to fill cells that no word claims
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pick a filler letter uniformly from the alphabet
pub fn random_letter(rng: &mut impl Rng) -> char {
    ALPHABET[rng.random_range(0..ALPHABET.len())] as char
}

/// Normalize a puzzle word for placement and matching
pub fn normalize_word(word: &str) -> String {
    word.trim().to_uppercase()
}
