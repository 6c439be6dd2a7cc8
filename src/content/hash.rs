//! MD5 digests rendered as lowercase hex.

use md5::{Digest, Md5};

pub fn hash_md5(input: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Hash text after narrowing it to ASCII; other characters become `?`.
pub fn hash_md5_str(input: &str) -> String {
    let bytes: Vec<u8> = input
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect();
    hash_md5(&bytes)
}
