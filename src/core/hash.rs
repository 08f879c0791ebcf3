use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Stable key for a scanned URL, used to index recorded entries.
pub fn url_fingerprint(url: &str) -> String {
    format!("url_{}", sha256_hex(url.trim().as_bytes()))
}

pub fn document_id(text: &str) -> String {
    format!("doc_{}", sha256_hex(text.as_bytes()))
}
