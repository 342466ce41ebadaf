//! Callback registry
//!
//! Maps callback names to the one-shot channel of the call waiting on them.
//! A name is held by at most one pending call; the registration is removed
//! when the callback fires or when the [`PendingCall`] is dropped, whichever
//! happens first.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use jsonp_domain::CallbackName;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::{Error, Result};

struct Registration {
    token: u64,
    sender: oneshot::Sender<JsonValue>,
}

/// Callback name → waiting call
#[derive(Default)]
pub struct CallbackRegistry {
    pending: Mutex<HashMap<CallbackName, Registration>>,
    next_token: AtomicU64,
}

impl CallbackRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name`
    ///
    /// # Errors
    ///
    /// Returns [`Error::CallbackInUse`] if another call is already waiting on
    /// `name`.
    pub fn register(self: &Arc<Self>, name: CallbackName) -> Result<PendingCall> {
        let (sender, receiver) = oneshot::channel();
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);

        {
            let mut pending = self.pending.lock();
            if pending.contains_key(&name) {
                return Err(Error::CallbackInUse(name.into_inner()));
            }
            pending.insert(name.clone(), Registration { token, sender });
        }

        debug!(callback = %name, "registered callback");

        Ok(PendingCall {
            name,
            token,
            receiver,
            registry: Arc::clone(self),
        })
    }

    /// Invoke the handler registered under `name` with `data`
    ///
    /// The registration is consumed: a second invocation of the same name
    /// fails unless a new call registered it in between.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredCallback`] if nothing waits on `name`.
    pub fn invoke(&self, name: &CallbackName, data: JsonValue) -> Result<()> {
        let registration = self
            .pending
            .lock()
            .remove(name)
            .ok_or_else(|| Error::UnregisteredCallback(name.to_string()))?;

        if registration.sender.send(data).is_err() {
            // Waiter gave up between lookup and send
            warn!(callback = %name, "callback fired after its call was dropped");
        }

        Ok(())
    }

    /// Whether a call is waiting on `name`
    pub fn is_pending(&self, name: &CallbackName) -> bool {
        self.pending.lock().contains_key(name)
    }

    /// Number of calls currently waiting
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    fn deregister(&self, name: &CallbackName, token: u64) {
        let mut pending = self.pending.lock();
        if pending.get(name).is_some_and(|r| r.token == token) {
            pending.remove(name);
            debug!(callback = %name, "deregistered callback");
        }
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// A call waiting for its callback to fire
///
/// Dropping it releases the callback name.
pub struct PendingCall {
    name: CallbackName,
    token: u64,
    receiver: oneshot::Receiver<JsonValue>,
    registry: Arc<CallbackRegistry>,
}

impl PendingCall {
    /// Callback name this call is registered under
    pub fn name(&self) -> &CallbackName {
        &self.name
    }

    /// Wait for the callback to fire and return the data it was called with
    ///
    /// # Errors
    ///
    /// Returns [`Error::Abandoned`] if the registration disappeared without
    /// the callback firing.
    pub async fn wait(mut self) -> Result<JsonValue> {
        (&mut self.receiver)
            .await
            .map_err(|_| Error::Abandoned(self.name.to_string()))
    }
}

impl Drop for PendingCall {
    fn drop(&mut self) {
        self.registry.deregister(&self.name, self.token);
    }
}

impl std::fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCall")
            .field("name", &self.name)
            .field("token", &self.token)
            .finish()
    }
}
