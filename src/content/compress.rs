//! gzip compression.

use std::io::{self, Write};

use flate2::{write::GzEncoder, Compression};

/// gzip `buffer` in one go (header, deflate stream, CRC32/length trailer).
///
/// Encoding failures surface as I/O errors from the encoder.
pub fn try_compress(buffer: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(buffer.len() / 2 + 32), Compression::default());
    encoder.write_all(buffer).and_then(|_| encoder.finish())
}

/// gzip `buffer` into a fresh vector.
///
/// The sink is a `Vec<u8>`, whose `Write` impl never fails, so
/// [`try_compress`] cannot return an error here.
pub fn compress(buffer: &[u8]) -> Vec<u8> {
    match try_compress(buffer) {
        Ok(out) => out,
        Err(e) => unreachable!("gzip into memory failed: {e}"),
    }
}
