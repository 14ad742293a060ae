//! # Storage Backend Selection
//!
//! Decides, once per [`BackendSelector`], whether book operations go to the
//! relational store or to the fallback store.
//!
//! ```text
//!                 open ok
//! Uninitialized ──────────► Relational
//!       │
//!       │ open failed
//!       ▼
//!    Fallback   (terminal)
//! ```
//!
//! The first [`BackendSelector::acquire`] call opens the store through a
//! [`DatabaseConnector`] and prepares it while the transition is still locked.
//! The outcome is cached: later calls return the same handle, or `None`
//! without retrying the failed open.

use bridge_traits::database::DatabaseAdapter;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::platform::PlatformSendSync;
use futures::lock::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::CatalogError;

/// Which store serves book operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendMode {
    /// No open has been attempted yet
    Uninitialized,
    /// The relational store opened successfully
    Relational,
    /// The relational store is unavailable for the rest of this selector's life
    Fallback,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Uninitialized => "uninitialized",
            BackendMode::Relational => "relational",
            BackendMode::Fallback => "fallback",
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opens the relational store
///
/// Called at most once per [`BackendSelector`].
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait DatabaseConnector: PlatformSendSync {
    async fn connect(&self) -> BridgeResult<Arc<dyn DatabaseAdapter>>;
}

/// Connector for hosts without a relational store
///
/// Every connect fails, which sends the selector straight to fallback mode.
#[derive(Debug, Clone)]
pub struct UnavailableConnector {
    reason: String,
}

impl UnavailableConnector {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl DatabaseConnector for UnavailableConnector {
    async fn connect(&self) -> BridgeResult<Arc<dyn DatabaseAdapter>> {
        Err(BridgeError::NotAvailable(self.reason.clone()))
    }
}

enum BackendState {
    Uninitialized,
    Relational(Arc<dyn DatabaseAdapter>),
    Fallback,
}

impl BackendState {
    fn mode(&self) -> BackendMode {
        match self {
            BackendState::Uninitialized => BackendMode::Uninitialized,
            BackendState::Relational(_) => BackendMode::Relational,
            BackendState::Fallback => BackendMode::Fallback,
        }
    }

    fn handle(&self) -> Option<Arc<dyn DatabaseAdapter>> {
        match self {
            BackendState::Relational(adapter) => Some(Arc::clone(adapter)),
            BackendState::Uninitialized | BackendState::Fallback => None,
        }
    }
}

/// Result of a [`BackendSelector::acquire`] call
pub struct Acquired {
    /// Live relational handle, `None` in fallback mode
    pub handle: Option<Arc<dyn DatabaseAdapter>>,
    /// `true` only for the call that performed the open attempt
    pub transitioned: bool,
}

/// Owns the backend mode and the relational handle
pub struct BackendSelector {
    connector: Arc<dyn DatabaseConnector>,
    state: Mutex<BackendState>,
}

impl BackendSelector {
    pub fn new(connector: Arc<dyn DatabaseConnector>) -> Self {
        Self {
            connector,
            state: Mutex::new(BackendState::Uninitialized),
        }
    }

    /// Return the relational handle, opening it on first use
    ///
    /// `prepare` runs only on the call that performs the transition, with the
    /// new handle (`None` for fallback), before the lock is released. Every
    /// concurrent caller therefore waits until the backend is both opened and
    /// prepared.
    pub async fn acquire<F, Fut>(&self, prepare: F) -> Acquired
    where
        F: FnOnce(Option<Arc<dyn DatabaseAdapter>>) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut state = self.state.lock().await;

        if !matches!(*state, BackendState::Uninitialized) {
            return Acquired {
                handle: state.handle(),
                transitioned: false,
            };
        }

        *state = match self.connector.connect().await {
            Ok(adapter) => {
                info!("Relational book store opened");
                BackendState::Relational(adapter)
            }
            Err(e) => {
                let cause = CatalogError::Open(e);
                warn!(error = %cause, "Using fallback book store");
                BackendState::Fallback
            }
        };

        prepare(state.handle()).await;

        Acquired {
            handle: state.handle(),
            transitioned: true,
        }
    }

    pub async fn mode(&self) -> BackendMode {
        self.state.lock().await.mode()
    }
}

impl fmt::Debug for BackendSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = self
            .state
            .try_lock()
            .map(|state| state.mode().as_str())
            .unwrap_or("busy");
        f.debug_struct("BackendSelector").field("mode", &mode).finish()
    }
}
