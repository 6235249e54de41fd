use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use log::{error, info};
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

/// lifetime of read links handed to telegram for album previews and downloads
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("upload of {path} failed: {reason}")]
    UploadFailed { path: String, reason: String },
    #[error("signing {path} failed: {reason}")]
    SigningFailed { path: String, reason: String },
    #[error("storage configuration error: {0}")]
    Config(String),
}

/// object storage holding uploaded album files
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn save(&self, path: &str, data: Bytes, content_type: &str) -> Result<(), BlobError>;

    /// time-limited GET url for the object at `path`
    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<Url, BlobError>;
}

/// firebase storage bucket accessed through the GCS api
pub struct GcsBlobStore {
    store: GoogleCloudStorage,
    bucket: String,
}

impl GcsBlobStore {
    pub fn new(bucket: &str, service_account_key: &str) -> Result<Self, BlobError> {
        let store = GoogleCloudStorageBuilder::new()
            .with_bucket_name(bucket)
            .with_service_account_key(service_account_key)
            .build()
            .map_err(|e| BlobError::Config(e.to_string()))?;

        Ok(Self {
            store,
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    async fn save(&self, path: &str, data: Bytes, content_type: &str) -> Result<(), BlobError> {
        let location = Path::from(path);
        let size = data.len();
        let start = Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(data), options)
            .await
            .map_err(|e| {
                error!(
                    "Upload to gs://{}/{} failed after {}ms: {}",
                    self.bucket,
                    path,
                    start.elapsed().as_millis(),
                    e
                );
                BlobError::UploadFailed {
                    path: path.to_string(),
                    reason: e.to_string(),
                }
            })?;

        info!(
            "Uploaded {} bytes to gs://{}/{} in {}ms",
            size,
            self.bucket,
            path,
            start.elapsed().as_millis()
        );
        Ok(())
    }

    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<Url, BlobError> {
        let location = Path::from(path);
        self.store
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(|e| BlobError::SigningFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}
