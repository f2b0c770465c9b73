//! Download → compress → upload → persist link.
//!
//! The ledger cell is written only after the upload succeeded, so a failed
//! capture never leaves a partial link behind.  The raw download is moved
//! into the compressor and dropped there.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use uuid::Uuid;

use rc_domain::error::{Error, Result};
use rc_domain::event::ActorId;
use rc_domain::record::PhotoSlot;
use rc_domain::retry::RetryPolicy;
use rc_domain::trace::TraceEvent;
use rc_ledger::LedgerAdapter;

use crate::codec::ImageCodec;
use crate::source::BlobSource;
use crate::store::ObjectStore;

/// One confirmed photo to persist.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub registration_id: Uuid,
    pub actor_id: ActorId,
    pub slot: PhotoSlot,
    pub media_ref: String,
    pub taken_at: DateTime<Utc>,
}

pub struct MediaPipeline {
    source: Arc<dyn BlobSource>,
    store: Arc<dyn ObjectStore>,
    codec: Arc<dyn ImageCodec>,
    ledger: Arc<LedgerAdapter>,
    retry: RetryPolicy,
    permits: Arc<Semaphore>,
    tz: chrono_tz::Tz,
}

impl MediaPipeline {
    pub fn new(
        source: Arc<dyn BlobSource>,
        store: Arc<dyn ObjectStore>,
        codec: Arc<dyn ImageCodec>,
        ledger: Arc<LedgerAdapter>,
        retry: RetryPolicy,
        max_concurrent: usize,
        tz: chrono_tz::Tz,
    ) -> Self {
        Self {
            source,
            store,
            codec,
            ledger,
            retry,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            tz,
        }
    }

    /// Run one capture end to end and return the stored link.
    pub async fn capture(&self, req: CaptureRequest) -> Result<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| Error::Other("media pipeline closed".into()))?;
        let started = Instant::now();

        let raw = self
            .retry
            .run("download", |_| self.source.fetch(&req.media_ref))
            .await
            .map_err(|e| {
                tracing::warn!(
                    registration_id = %req.registration_id,
                    slot = %req.slot,
                    error = %e,
                    "photo download gave up"
                );
                e
            })?;
        let raw_bytes = raw.len();

        let codec = self.codec.clone();
        let compressed = tokio::task::spawn_blocking(move || codec.compress(raw))
            .await
            .map_err(|e| Error::Media(format!("compressor task failed: {e}")))??;
        tracing::debug!(
            registration_id = %req.registration_id,
            raw_bytes,
            stored_bytes = compressed.len(),
            "photo compressed"
        );

        let name = object_name(&req, self.tz);
        let link = self
            .retry
            .run("upload", |_| self.store.upload(&compressed, &name))
            .await
            .map_err(|e| {
                tracing::warn!(
                    registration_id = %req.registration_id,
                    object = %name,
                    error = %e,
                    "photo upload gave up"
                );
                e
            })?;

        self.ledger
            .write(req.registration_id, req.slot.photo_column(), &link)
            .await?;

        TraceEvent::MediaCaptured {
            registration_id: req.registration_id,
            slot: req.slot.to_string(),
            raw_bytes,
            stored_bytes: compressed.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
        .emit();

        Ok(link)
    }
}

/// `selfie_{inicio|salida}_{YYYYmmdd_HHMMSS}_{actor}_{short-id}.jpg`, stamped
/// in local time.
pub fn object_name(req: &CaptureRequest, tz: chrono_tz::Tz) -> String {
    let stamp = req.taken_at.with_timezone(&tz).format("%Y%m%d_%H%M%S");
    let id = req.registration_id.simple().to_string();
    format!(
        "{}_{}_{}_{}.jpg",
        req.slot.object_prefix(),
        stamp,
        req.actor_id,
        &id[..8]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PassthroughCodec;
    use crate::memory::{MemoryBlobSource, MemoryObjectStore};
    use chrono::{NaiveDate, TimeZone};
    use rc_domain::record::{Column, RecordDraft};
    use rc_ledger::MemoryLedger;

    struct Fixture {
        source: Arc<MemoryBlobSource>,
        store: Arc<MemoryObjectStore>,
        ledger: Arc<LedgerAdapter>,
        pipeline: MediaPipeline,
    }

    fn fixture() -> Fixture {
        let source = Arc::new(MemoryBlobSource::new());
        let store = Arc::new(MemoryObjectStore::new());
        let ledger = Arc::new(LedgerAdapter::new(
            Arc::new(MemoryLedger::new()),
            RetryPolicy::immediate(3),
            "Registros",
        ));
        let pipeline = MediaPipeline::new(
            source.clone(),
            store.clone(),
            Arc::new(PassthroughCodec),
            ledger.clone(),
            RetryPolicy::immediate(3),
            2,
            chrono_tz::America::Lima,
        );
        Fixture {
            source,
            store,
            ledger,
            pipeline,
        }
    }

    async fn registration(ledger: &LedgerAdapter) -> Uuid {
        ledger
            .create(Uuid::new_v4(), &RecordDraft {
                actor_id: 77,
                date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
                crew: "CREW-7".into(),
            })
            .await
            .unwrap()
    }

    fn request(registration_id: Uuid, slot: PhotoSlot) -> CaptureRequest {
        CaptureRequest {
            registration_id,
            actor_id: 77,
            slot,
            media_ref: "photos/file_1.jpg".into(),
            taken_at: Utc.with_ymd_and_hms(2026, 5, 4, 13, 5, 9).unwrap(),
        }
    }

    #[test]
    fn object_name_uses_local_time_and_short_id() {
        let id = Uuid::parse_str("0b7e6f1c-1111-4222-8333-944445555666").unwrap();
        let name = object_name(&request(id, PhotoSlot::End), chrono_tz::America::Lima);
        assert_eq!(name, "selfie_salida_20260504_080509_77_0b7e6f1c.jpg");
    }

    #[tokio::test]
    async fn two_upload_failures_then_success_writes_one_link() {
        let f = fixture();
        let id = registration(&f.ledger).await;
        f.source.insert("photos/file_1.jpg", vec![0xFF, 0xD8, 0xFF]);
        f.store.fail_next(2);

        let link = f.pipeline.capture(request(id, PhotoSlot::Start)).await.unwrap();

        assert_eq!(f.store.attempts(), 3);
        assert_eq!(f.store.object_names().len(), 1);
        let record = f.ledger.read_record(id).await.unwrap().unwrap();
        assert_eq!(record[&Column::StartPhoto], link);
        assert_eq!(record[&Column::EndPhoto], "");
    }

    #[tokio::test]
    async fn exhausted_upload_leaves_cell_empty() {
        let f = fixture();
        let id = registration(&f.ledger).await;
        f.source.insert("photos/file_1.jpg", vec![1, 2, 3]);
        f.store.fail_next(3);

        let err = f.pipeline.capture(request(id, PhotoSlot::End)).await.unwrap_err();
        assert!(err.is_transient());
        let record = f.ledger.read_record(id).await.unwrap().unwrap();
        assert_eq!(record[&Column::EndPhoto], "");
    }

    #[tokio::test]
    async fn download_is_retried() {
        let f = fixture();
        let id = registration(&f.ledger).await;
        f.source.insert("photos/file_1.jpg", vec![9]);
        f.source.fail_next(2);
        f.pipeline.capture(request(id, PhotoSlot::Start)).await.unwrap();
        assert_eq!(f.store.attempts(), 1);
    }

    #[tokio::test]
    async fn empty_photo_is_not_uploaded() {
        let f = fixture();
        let id = registration(&f.ledger).await;
        f.source.insert("photos/file_1.jpg", Vec::new());
        let err = f.pipeline.capture(request(id, PhotoSlot::Start)).await.unwrap_err();
        assert!(matches!(err, Error::Media(_)));
        assert_eq!(f.store.attempts(), 0);
    }
}
