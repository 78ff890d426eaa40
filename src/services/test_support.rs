//! Dobles de test compartidos por los tests de servicios

use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::cache::{CacheOperations, MemoryStore};
use crate::clients::{ContentGenerator, GenerationRequest};
use crate::utils::errors::GenerationError;

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Text(&'static str),
    Fail,
}

/// Generador con respuestas programadas y contador de llamadas
pub struct MockGenerator {
    replies: Mutex<VecDeque<Reply>>,
    when_exhausted: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            when_exhausted: Reply::Fail,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: &'static str) -> Self {
        Self {
            when_exhausted: Reply::Text(text),
            ..Self::new(Vec::new())
        }
    }

    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().await.pop_front().unwrap_or(self.when_exhausted);
        match reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail => Err(GenerationError::Provider {
                status: 503,
                body: "mock provider unavailable".to_string(),
            }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Store en memoria que registra los borrados y puede fallar a demanda
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    deleted: Arc<Mutex<Vec<String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    lock_attempts: Arc<AtomicUsize>,
    later_lock_delay_ms: Arc<AtomicU64>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Retrasa cada `set_if_absent` salvo el primero
    pub fn delay_later_locks(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.later_lock_delay_ms.store(millis, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(anyhow!("store read failure"))
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(anyhow!("store write failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl CacheOperations for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_read()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        self.check_write()?;
        self.inner.set(key, value, ttl_secs).await
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool> {
        self.check_write()?;
        let attempt = self.lock_attempts.fetch_add(1, Ordering::SeqCst);
        let delay_ms = self.later_lock_delay_ms.load(Ordering::SeqCst);
        if attempt > 0 && delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        self.inner.set_if_absent(key, value, ttl_secs).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check_write()?;
        self.deleted.lock().await.push(key.to_string());
        self.inner.delete(key).await
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        self.check_write()?;
        let removed = self.inner.delete_if_equals(key, expected).await?;
        if removed {
            self.deleted.lock().await.push(key.to_string());
        }
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.check_read()?;
        self.inner.exists(key).await
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>> {
        self.check_read()?;
        self.inner.ttl(key).await
    }

    async fn ping(&self) -> bool {
        !self.fail_reads.load(Ordering::SeqCst)
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}
