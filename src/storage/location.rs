//! Storage locations parsed from URLs

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Join a prefix and a key with a single `/`
pub fn join_key(prefix: &str, key: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let key = key.trim_start_matches('/');
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}/{key}")
    }
}

/// A bucket, container or directory holding listing files
#[derive(Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Bucket, container or local root directory
    bucket: String,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Original URL scheme for logging
    scheme: String,
}

impl fmt::Debug for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageLocation")
            .field("scheme", &self.scheme)
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl StorageLocation {
    /// Parse a location URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/`, `./path/` or `file:///path` - Local filesystem
    ///
    /// Cloud credentials come from the environment (`AWS_ACCESS_KEY_ID`,
    /// `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`, ...). A local directory must
    /// already exist.
    pub fn parse(url: &str) -> Result<Self> {
        Self::open(url, false)
    }

    /// Parse a location that will be written to
    ///
    /// Same as [`StorageLocation::parse`], except that a missing local
    /// directory is created.
    pub fn parse_destination(url: &str) -> Result<Self> {
        Self::open(url, true)
    }

    fn open(url: &str, create_missing: bool) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url, false)
        } else if url.starts_with("r2://") {
            Self::parse_s3(url, true)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            Self::parse_local(url, create_missing)
        }
    }

    /// Wrap an existing store
    pub fn from_store(store: Arc<dyn ObjectStore>, scheme: &str, prefix: &str) -> Self {
        Self {
            store,
            bucket: String::new(),
            prefix: prefix.trim_matches('/').to_string(),
            scheme: scheme.to_string(),
        }
    }

    /// Split `scheme://bucket/prefix` into bucket and prefix
    fn split_url<'a>(url: &'a str, scheme: &str) -> Result<(&'a str, String)> {
        let without_scheme = url
            .strip_prefix(&format!("{scheme}://"))
            .ok_or_else(|| Error::config(format!("Invalid {scheme} URL: {url}")))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].trim_matches('/').to_string(),
            ),
            None => (without_scheme, String::new()),
        };

        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in URL: {url}")));
        }
        Ok((bucket, prefix))
    }

    /// Parse S3 or R2 URL
    fn parse_s3(url: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let (bucket, prefix) = Self::split_url(url, scheme)?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // AWS_ENDPOINT is read by from_env(); R2 also honours R2_ENDPOINT_URL
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
            prefix,
            scheme: scheme.to_string(),
        })
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let (bucket, prefix) = Self::split_url(url, "gs")?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
            prefix,
            scheme: "gs".to_string(),
        })
    }

    /// Parse Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let (container, prefix) = Self::split_url(url, "az")?;

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: container.to_string(),
            prefix,
            scheme: "az".to_string(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str, create_missing: bool) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);
        if path.is_empty() {
            return Err(Error::config("Empty storage location"));
        }

        if create_missing {
            std::fs::create_dir_all(path)
                .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;
        } else if !std::path::Path::new(path).is_dir() {
            return Err(Error::FileNotFound {
                path: path.to_string(),
            });
        }

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: path.trim_end_matches('/').to_string(),
            prefix: String::new(),
            scheme: "file".to_string(),
        })
    }

    /// Check if this is a cloud location (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, r2, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Get the bucket or container name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the base prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve a key relative to the base prefix
    fn object_path(&self, key: &str) -> ObjectPath {
        ObjectPath::from(join_key(&self.prefix, key))
    }

    /// Human-readable path for logging
    pub fn display_path(&self, key: &str) -> String {
        let key = join_key(&self.prefix, key);
        if self.bucket.is_empty() {
            format!("{}://{key}", self.scheme)
        } else {
            format!("{}://{}/{key}", self.scheme, self.bucket)
        }
    }

    /// List `.csv` keys under a prefix, sorted
    ///
    /// Keys are returned relative to the location's base prefix.
    pub async fn list_csv(&self, prefix: &str) -> Result<Vec<String>> {
        let list_prefix = join_key(&self.prefix, prefix);
        let list_path = if list_prefix.is_empty() {
            None
        } else {
            Some(ObjectPath::from(list_prefix.as_str()))
        };

        let objects: Vec<_> = self
            .store
            .list(list_path.as_ref())
            .try_collect()
            .await
            .map_err(|e| Error::storage(format!("Failed to list {list_prefix}: {e}")))?;

        let base = if self.prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", self.prefix)
        };
        let mut keys: Vec<String> = objects
            .into_iter()
            .map(|meta| meta.location.to_string())
            .filter(|key| key.ends_with(".csv"))
            .map(|key| key.strip_prefix(&base).map_or(key.clone(), str::to_string))
            .collect();
        keys.sort();

        debug!(prefix = %list_prefix, count = keys.len(), "Listed CSV objects");
        Ok(keys)
    }

    /// Read an object into memory
    pub async fn read(&self, key: &str) -> Result<Bytes> {
        let path = self.object_path(key);
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| Error::storage(format!("Failed to read {path}: {e}")))?;
        let bytes = result
            .bytes()
            .await
            .map_err(|e| Error::storage(format!("Failed to read {path}: {e}")))?;
        Ok(bytes)
    }

    /// Write bytes to an object, returning its display path
    pub async fn write(&self, key: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(key);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage(format!("Failed to write {path}: {e}")))?;

        Ok(self.display_path(key))
    }
}
