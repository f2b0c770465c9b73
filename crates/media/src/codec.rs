//! Image re-encoding seam.

use rc_domain::error::{Error, Result};

/// Re-encodes a raw photo into its stored form.  Runs on the blocking
/// pool, so implementations may be CPU-heavy.
pub trait ImageCodec: Send + Sync {
    fn compress(&self, raw: Vec<u8>) -> Result<Vec<u8>>;
}

/// Stores the transport's bytes as-is after checking there is something to
/// store.  Transports already deliver JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCodec;

impl ImageCodec for PassthroughCodec {
    fn compress(&self, raw: Vec<u8>) -> Result<Vec<u8>> {
        if raw.is_empty() {
            return Err(Error::Media("empty photo payload".into()));
        }
        Ok(raw)
    }
}
