//! Consumed interface of the hierarchical configuration store
//!
//! The store lives elsewhere in the host process (or behind local IPC) and
//! outlives the bridge. Change delivery is cooperative: the store invokes
//! callbacks from the host's event loop, one at a time, never concurrently
//! with registration.

use anyhow::Result;

use crate::value::ConfigValue;

/// Identifier for one registered change notification
pub type NotifyId = u32;

/// Callback invoked on every subsequent change to a watched key
///
/// `None` means the key was unset. Delivery is single-threaded, so the
/// callback does not need to be `Send`.
pub type ChangeCallback = Box<dyn FnMut(&str, Option<&ConfigValue>)>;

pub trait ConfigStore {
    /// Begin delivering change notifications for every key at or below
    /// `path`. Current values are not preloaded; they are fetched per key.
    fn watch_path(&mut self, path: &str) -> Result<()>;

    /// Current value of `key`, if the store has one
    fn get_value(&self, key: &str) -> Option<ConfigValue>;

    /// Register `callback` to run on every subsequent change to `key`
    fn register_change_notify(&mut self, key: &str, callback: ChangeCallback) -> Result<NotifyId>;
}
