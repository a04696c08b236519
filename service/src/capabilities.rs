//! Process-wide capability gates driven by policy configuration.
//!
//! Two site features can be switched off by an operator: the legacy RPC
//! endpoint and in-place file editing. The gates live in an explicit,
//! `Arc`-shared [`Capabilities`] object injected into the router rather
//! than in ambient globals, and the handlers that own those features query
//! it on each request.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{Policy, PolicyConfig};

/// Capability flags evaluated once per configuration load.
///
/// Both flags start in the enabled state (nothing disabled). Writes are
/// atomic with sequentially consistent ordering, so a request in flight
/// during a reload observes either the old or the new state, never a
/// partial one.
#[derive(Debug, Default)]
pub struct Capabilities {
    legacy_rpc_disabled: AtomicBool,
    file_editing_disabled: AtomicBool,
}

impl Capabilities {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the snapshot's site toggles for the current load cycle.
    ///
    /// Monotonic within a load: a capability moves enabled -> disabled when
    /// its policy is set, and nothing here moves it back. Calling this
    /// repeatedly with the same snapshot is a no-op after the first call.
    pub fn apply(&self, policies: &PolicyConfig) {
        if policies.is_enabled(Policy::DisableLegacyRpc) {
            self.legacy_rpc_disabled.store(true, Ordering::SeqCst);
        }
        if policies.is_enabled(Policy::DisableFileEditing) {
            self.file_editing_disabled.store(true, Ordering::SeqCst);
        }
    }

    /// Re-evaluate both toggles from scratch for a configuration reload.
    ///
    /// Unlike [`apply`](Self::apply), this clears a flag whose policy the
    /// reloaded snapshot no longer sets. Whether a consumer honors a
    /// re-enabled file-editing capability is its own decision; this only
    /// maintains the flags.
    pub fn reload(&self, policies: &PolicyConfig) {
        self.legacy_rpc_disabled.store(
            policies.is_enabled(Policy::DisableLegacyRpc),
            Ordering::SeqCst,
        );
        self.file_editing_disabled.store(
            policies.is_enabled(Policy::DisableFileEditing),
            Ordering::SeqCst,
        );
    }

    /// Whether the legacy RPC endpoint must reject all requests.
    #[must_use]
    pub fn legacy_rpc_disabled(&self) -> bool {
        self.legacy_rpc_disabled.load(Ordering::SeqCst)
    }

    /// Whether in-place file editing is blocked.
    #[must_use]
    pub fn file_editing_disabled(&self) -> bool {
        self.file_editing_disabled.load(Ordering::SeqCst)
    }
}
