//! The session-wide animation preference.
//!
//! Elements never look the preference up globally. They receive an
//! [`AnimationPreference`] snapshot when constructed and, if they care
//! about the rare toggle, a [`PreferenceReceiver`] to observe changes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use folio_common::error::{FolioError, FolioResult};

use crate::store::KeyValueStore;

/// Storage key of the persisted flag.
pub const ANIMATIONS_ENABLED_KEY: &str = "animationsEnabled";

/// Immutable snapshot of the animation preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationPreference {
    /// User toggle, persisted.
    pub enabled: bool,
    /// Platform reduced-motion signal, observed for the session.
    pub reduced_motion_requested: bool,
}

impl AnimationPreference {
    pub const ANIMATED: AnimationPreference = AnimationPreference {
        enabled: true,
        reduced_motion_requested: false,
    };

    pub const STATIC: AnimationPreference = AnimationPreference {
        enabled: false,
        reduced_motion_requested: false,
    };

    /// Whether continuous motion may run.
    pub fn should_animate(&self) -> bool {
        self.enabled && !self.reduced_motion_requested
    }
}

impl Default for AnimationPreference {
    fn default() -> Self {
        Self::ANIMATED
    }
}

/// Change channel handed to animated elements.
pub type PreferenceReceiver = watch::Receiver<AnimationPreference>;

/// Latest snapshot if it changed since the last poll. Never blocks, so it
/// can run inside a frame callback. A closed channel reads as no change.
pub fn poll_change(receiver: &mut PreferenceReceiver) -> Option<AnimationPreference> {
    match receiver.has_changed() {
        Ok(true) => Some(*receiver.borrow_and_update()),
        _ => None,
    }
}

/// Owner of the preference: loads it once, persists toggles, and
/// publishes every change to subscribers.
pub struct PreferenceHandle<S: KeyValueStore> {
    store: S,
    sender: watch::Sender<AnimationPreference>,
}

impl<S: KeyValueStore> PreferenceHandle<S> {
    /// Load the persisted flag from `store`. A missing or unparsable value
    /// means animations are enabled.
    pub fn load(store: S, reduced_motion_requested: bool) -> Self {
        let enabled = read_enabled(&store);
        let preference = AnimationPreference {
            enabled,
            reduced_motion_requested,
        };
        tracing::info!(
            store = store.name(),
            enabled,
            reduced_motion_requested,
            "Animation preference loaded"
        );
        let (sender, _) = watch::channel(preference);
        Self { store, sender }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> AnimationPreference {
        *self.sender.borrow()
    }

    /// Receiver observing every future change.
    pub fn subscribe(&self) -> PreferenceReceiver {
        self.sender.subscribe()
    }

    /// Flip the user toggle and persist it.
    pub fn toggle(&mut self) -> FolioResult<AnimationPreference> {
        let enabled = !self.snapshot().enabled;
        self.set_enabled(enabled)
    }

    /// Set the user toggle and persist it. The new value is published even
    /// if persisting fails; the error is still returned.
    pub fn set_enabled(&mut self, enabled: bool) -> FolioResult<AnimationPreference> {
        let next = AnimationPreference {
            enabled,
            ..self.snapshot()
        };
        self.sender.send_replace(next);
        let json = serde_json::to_string(&enabled)?;
        self.store.set(ANIMATIONS_ENABLED_KEY, &json).map_err(|e| {
            FolioError::preference(format!(
                "Failed to persist animation preference to {}: {e}",
                self.store.name()
            ))
        })?;
        tracing::info!(enabled, "Animations toggled");
        Ok(next)
    }

    /// Record a change of the platform reduced-motion signal. Not persisted.
    pub fn set_reduced_motion(&mut self, requested: bool) -> AnimationPreference {
        let next = AnimationPreference {
            reduced_motion_requested: requested,
            ..self.snapshot()
        };
        if next != self.snapshot() {
            tracing::debug!(requested, "Reduced-motion signal changed");
            self.sender.send_replace(next);
        }
        next
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn read_enabled(store: &impl KeyValueStore) -> bool {
    match store.get(ANIMATIONS_ENABLED_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<bool>(&raw) {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "Ignoring malformed animation preference");
                true
            }
        },
        Ok(None) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read animation preference");
            true
        }
    }
}
