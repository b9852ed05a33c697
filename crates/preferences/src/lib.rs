//! Folio Preferences
//!
//! The one piece of shared state in the engine: whether animations should
//! run. This crate owns
//! - **Preference:** the `enabled`/`reduced_motion` snapshot and its
//!   change channel
//! - **Store:** persistence of the `animationsEnabled` flag
//! - **Device:** capability probing that disables pointer effects up front

pub mod device;
pub mod preference;
pub mod store;

pub use device::DeviceProfile;
pub use preference::{poll_change, AnimationPreference, PreferenceHandle, PreferenceReceiver};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
