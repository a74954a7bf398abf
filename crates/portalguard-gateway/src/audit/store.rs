//! Audit stores and the background queue that feeds them.
//!
//! Records are submitted with `try_send` so a slow or broken store can never
//! add latency or errors to the request that produced the record. A full or
//! closed queue drops the record with a warning.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::FutureExt;
use tokio::sync::{mpsc, oneshot};

use portalguard_core::error::Result;
use portalguard_core::model::AuditRecord;

use crate::directory::AuditStore;
use crate::obs::PortalMetrics;

/// Keeps records in memory. Useful for tests and for local inspection.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append_audit_record(&self, record: AuditRecord) -> Result<()> {
        if let Ok(mut g) = self.records.lock() {
            g.push(record);
        }
        Ok(())
    }
}

/// Emits each record as a structured `tracing` event on the `audit` target.
#[derive(Debug, Default)]
pub struct TracingAuditStore;

#[async_trait]
impl AuditStore for TracingAuditStore {
    async fn append_audit_record(&self, record: AuditRecord) -> Result<()> {
        tracing::info!(
            target: "audit",
            id=%record.id,
            actor=%record.actor_id,
            scope=?record.scope_id,
            action=%record.action,
            resource_type=%record.resource_type,
            resource_id=?record.resource_id,
            status=%record.status.as_str(),
            duration_ms=record.duration_ms,
            error=?record.error_message,
            details=%record.details,
            "audit record"
        );
        Ok(())
    }
}

enum QueueMsg {
    Record(Box<AuditRecord>),
    Flush(oneshot::Sender<()>),
}

/// Handle on the background audit writer.
#[derive(Clone)]
pub struct AuditQueue {
    tx: mpsc::Sender<QueueMsg>,
    metrics: Arc<PortalMetrics>,
}

impl AuditQueue {
    /// Spawn the writer task on the current tokio runtime.
    pub fn spawn(store: Arc<dyn AuditStore>, capacity: usize, metrics: Arc<PortalMetrics>) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(run_writer(store, rx, Arc::clone(&metrics)));
        Self { tx, metrics }
    }

    /// Hand a record to the writer. Never blocks, never fails the caller.
    pub fn submit(&self, record: AuditRecord) {
        let id = record.id;
        match self.tx.try_send(QueueMsg::Record(Box::new(record))) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(record=%id, "audit queue full; record dropped");
                self.metrics.audit_store_errors.inc(&[("kind", "queue_full")]);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(record=%id, "audit queue closed; record dropped");
                self.metrics.audit_store_errors.inc(&[("kind", "queue_closed")]);
            }
        }
    }

    /// Wait until every record submitted before this call has reached the store.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(QueueMsg::Flush(done_tx)).await.is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run_writer(
    store: Arc<dyn AuditStore>,
    mut rx: mpsc::Receiver<QueueMsg>,
    metrics: Arc<PortalMetrics>,
) {
    while let Some(msg) = rx.recv().await {
        match msg {
            QueueMsg::Record(record) => {
                let id = record.id;
                let appended = AssertUnwindSafe(store.append_audit_record(*record))
                    .catch_unwind()
                    .await;
                match appended {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::warn!(record=%id, error=%e, "audit store rejected record");
                        metrics.audit_store_errors.inc(&[("kind", "store")]);
                    }
                    // The writer outlives a misbehaving store.
                    Err(_) => {
                        tracing::warn!(record=%id, "audit store panicked; record dropped");
                        metrics.audit_store_errors.inc(&[("kind", "store_panic")]);
                    }
                }
            }
            QueueMsg::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("audit writer stopped");
}
