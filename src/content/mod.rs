//! Content codecs applied to request and response payloads.
//!
//! # Responsibilities
//! - JSON: typed parse of request bodies, serialisation, pretty-printing
//! - gzip compression of whole payloads
//! - MD5 hex digests (ETags, content fingerprints)
//!
//! # Design Decisions
//! - Whole-buffer transforms; nothing is streamed back to the caller
//! - Whether to compress or cache is the caller's decision

pub mod compress;
pub mod hash;
pub mod json;

pub use compress::{compress, try_compress};
pub use hash::{hash_md5, hash_md5_str};
pub use json::{parse_json, prettify_json, to_json_text};
