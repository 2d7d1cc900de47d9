//! Deterministic offline embedder based on SHA-256 digests.
//!
//! Each lowercase token hashes to a fixed pseudo-vector; the text's
//! embedding is the sum of its token vectors. The same text always maps
//! to the same vector, and texts sharing tokens land measurably closer
//! in cosine space than texts sharing none. No model, no network, no
//! nondeterminism -- suitable for air-gapped deployments and tests.

use sha2::{Digest, Sha256};

use mnemo_core::embedder::Embedder;
use mnemo_types::error::MemoryError;

/// Offline embedder with a configurable dimension (default 32).
#[derive(Debug, Clone)]
pub struct DigestEmbedder {
    dimension: usize,
}

impl DigestEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut acc = vec![0.0f32; self.dimension];
        let mut tokens = 0usize;
        for token in tokenize(text) {
            for (slot, byte) in acc.iter_mut().zip(digest_bytes(token, self.dimension)) {
                *slot += byte as f32 / 255.0;
            }
            tokens += 1;
        }
        if tokens == 0 {
            // Whitespace-only input is rejected upstream; hash the raw
            // text so the embedder itself stays total.
            for (slot, byte) in acc.iter_mut().zip(digest_bytes(text, self.dimension)) {
                *slot = byte as f32 / 255.0;
            }
        }
        acc
    }
}

impl Embedder for DigestEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MemoryError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn model_name(&self) -> &str {
        "digest-v1"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// First `n` bytes of the SHA-256 digest chain of `input`.
///
/// When `n` exceeds one digest (32 bytes), the digest is re-hashed to
/// extend the stream.
fn digest_bytes(input: impl AsRef<[u8]>, n: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(n);
    let mut block: [u8; 32] = Sha256::digest(input.as_ref()).into();
    while out.len() < n {
        let take = (n - out.len()).min(block.len());
        out.extend_from_slice(&block[..take]);
        block = Sha256::digest(block).into();
    }
    out
}
