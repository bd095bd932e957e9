//! Pending-operation correlator.
//!
//! Bridges a synchronous request that only yields a provisional
//! acknowledgment with the asynchronous event carrying the authoritative
//! result. Keys are server-assigned identifiers (order ids); resolution
//! happens on the channel dispatch path.

use crate::error::{DoshiiError, DoshiiResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<Value>>>>;

/// Tracks operations awaiting an asynchronous confirmation event.
///
/// Owned per client instance; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct Correlator {
    pending: PendingMap,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending operation under `key`.
    ///
    /// Errors with [`DoshiiError::CorrelationConflict`] if an operation is
    /// already in flight under the same key; the first waiter is untouched.
    pub fn register(&self, key: impl Into<String>) -> DoshiiResult<PendingOperation> {
        let key = key.into();
        let (tx, rx) = oneshot::channel();

        let mut pending = self.pending.lock().expect("pending map lock poisoned");
        if pending.contains_key(&key) {
            return Err(DoshiiError::CorrelationConflict(key));
        }
        pending.insert(key.clone(), tx);

        Ok(PendingOperation {
            key,
            rx,
            pending: self.pending.clone(),
        })
    }

    /// Resolve the operation registered under `key` with `payload`.
    ///
    /// Unknown keys are dropped silently: the event belongs to another client
    /// instance or the operation already resolved. Returns whether a waiter
    /// was fulfilled.
    pub fn resolve(&self, key: &str, payload: Value) -> bool {
        let tx = self.pending.lock().expect("pending map lock poisoned").remove(key);
        match tx {
            Some(tx) => tx.send(payload).is_ok(),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().expect("pending map lock poisoned").is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().expect("pending map lock poisoned").len()
    }
}

/// Handle to one in-flight operation. Await it with [`wait`](Self::wait).
#[derive(Debug)]
pub struct PendingOperation {
    key: String,
    rx: oneshot::Receiver<Value>,
    pending: PendingMap,
}

impl PendingOperation {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Wait for the confirmation payload, at most `timeout`.
    ///
    /// On timeout the entry is removed and
    /// [`DoshiiError::CorrelationTimeout`] is returned, so a confirmation
    /// that never arrives cannot leak the operation.
    pub async fn wait(self, timeout: Duration) -> DoshiiResult<Value> {
        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(_)) => Err(DoshiiError::Channel(
                "correlator dropped the pending entry".to_string(),
            )),
            Err(_) => {
                self.pending.lock().expect("pending map lock poisoned").remove(&self.key);
                Err(DoshiiError::CorrelationTimeout(self.key))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn resolve_fulfils_with_exact_payload() {
        let correlator = Correlator::new();
        let pending = correlator.register("42").unwrap();

        assert!(correlator.resolve("42", json!({"id": "42", "status": "accepted"})));
        let payload = pending.wait(Duration::from_secs(1)).await.unwrap();
        assert_eq!(payload, json!({"id": "42", "status": "accepted"}));
        assert!(correlator.is_empty());
    }

    #[tokio::test]
    async fn resolving_unknown_key_is_a_noop() {
        let correlator = Correlator::new();
        assert!(!correlator.resolve("missing", json!({})));
    }

    #[tokio::test]
    async fn duplicate_registration_errors() {
        let correlator = Correlator::new();
        let _first = correlator.register("42").unwrap();
        match correlator.register("42") {
            Err(DoshiiError::CorrelationConflict(key)) => assert_eq!(key, "42"),
            other => panic!("expected conflict, got {other:?}"),
        }
        // The first waiter is still resolvable.
        assert!(correlator.resolve("42", json!({})));
    }

    #[tokio::test]
    async fn distinct_keys_resolve_independently() {
        let correlator = Correlator::new();
        let a = correlator.register("a").unwrap();
        let b = correlator.register("b").unwrap();

        correlator.resolve("b", json!({"id": "b"}));
        correlator.resolve("a", json!({"id": "a"}));

        assert_eq!(a.wait(Duration::from_secs(1)).await.unwrap()["id"], "a");
        assert_eq!(b.wait(Duration::from_secs(1)).await.unwrap()["id"], "b");
    }

    #[tokio::test]
    async fn timeout_rejects_and_cleans_up() {
        let correlator = Correlator::new();
        let pending = correlator.register("slow").unwrap();

        match pending.wait(Duration::from_millis(20)).await {
            Err(DoshiiError::CorrelationTimeout(key)) => assert_eq!(key, "slow"),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(correlator.is_empty());
        // The key can be registered again after the timeout.
        assert!(correlator.register("slow").is_ok());
    }

    #[tokio::test]
    async fn resolve_before_wait_still_delivers() {
        // The event may race ahead of the caller actually awaiting.
        let correlator = Correlator::new();
        let pending = correlator.register("fast").unwrap();
        correlator.resolve("fast", json!({"id": "fast"}));

        let payload = pending.wait(Duration::from_secs(1)).await.unwrap();
        assert_eq!(payload["id"], "fast");
    }
}
