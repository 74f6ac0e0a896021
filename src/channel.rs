//! Produced interface of the settings-distribution channel

use anyhow::Result;

/// Typed setters plus an explicit publish step
///
/// `set_*` stages a value under a flat name; nothing reaches subscribers
/// until `publish` runs. `publish` is fire-and-forget: delivery failures
/// are the channel's to report, not the caller's to handle.
pub trait SettingsChannel {
    fn set_int(&mut self, name: &str, value: i32) -> Result<()>;

    fn set_string(&mut self, name: &str, value: &str) -> Result<()>;

    fn publish(&mut self);
}
