//! Durable receipt storage.
//!
//! On a successful payment the workflow writes two string-keyed entries, the
//! artifact data URI and the transaction id, for the confirmation surface to
//! read back later.

use std::path::PathBuf;

use async_trait::async_trait;
use checkout_core::AppError;
use dashmap::DashMap;
use tokio::fs;

/// Key under which the rendered artifact reference is persisted.
pub const ARTIFACT_KEY: &str = "invoice_pdf_url";
/// Key under which the payment transaction id is persisted.
pub const TRANSACTION_KEY: &str = "transaction_id";

#[async_trait]
pub trait ReceiptStore: Send + Sync {
    async fn put(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
}

/// Process-local store, mainly for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryReceiptStore {
    entries: DashMap<String, String>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReceiptStore for InMemoryReceiptStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }
}

/// File-backed store: one file per key under a base directory.
pub struct FileReceiptStore {
    base_path: PathBuf,
}

impl FileReceiptStore {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }

    /// Base directory from `RECEIPT_STORE_DIR`, defaulting to `./receipts`.
    pub async fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let dir = std::env::var("RECEIPT_STORE_DIR").unwrap_or_else(|_| "receipts".to_string());
        Self::new(dir).await
    }
}

#[async_trait]
impl ReceiptStore for FileReceiptStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.base_path.join(key);
        fs::write(path, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.base_path.join(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(path).await?;
        Ok(Some(value))
    }
}
