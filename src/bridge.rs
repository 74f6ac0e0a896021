//! The settings bridge
//!
//! Built once at startup from the mapping directory: watches are installed
//! for each distinct parent path, then every mapping entry gets a per-key
//! change subscription and one synchronous initial sync. After construction
//! the store's own notification delivery drives [`forward_value`] for the
//! rest of the process lifetime; there is no teardown short of process exit.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::channel::SettingsChannel;
use crate::constants::paths::MAPPING_DIR;
use crate::mapping::MappingTable;
use crate::store::{ChangeCallback, ConfigStore, NotifyId};
use crate::value::ConfigValue;
use crate::watch::WatchSet;

/// One live per-key subscription, held for the life of the process
#[derive(Debug)]
pub struct Subscription {
    pub source_key: String,
    pub destination_key: String,
    pub notify_id: NotifyId,
}

/// Owner of the mapping table's subscriptions and the store handle
pub struct SettingsBridge<S> {
    store: S,
    subscriptions: Vec<Subscription>,
}

impl<S: ConfigStore> SettingsBridge<S> {
    /// Construct the bridge from the compiled-in mapping directory
    pub fn construct_default<C>(store: S, channel: Rc<RefCell<C>>) -> Self
    where
        C: SettingsChannel + 'static,
    {
        Self::construct(store, channel, Path::new(MAPPING_DIR))
    }

    /// Load mappings from `mapping_dir`, install watches and subscribe
    ///
    /// Never fails: an unreadable mapping directory produces an inert
    /// bridge, and every per-line, per-path and per-entry failure is logged
    /// and skipped.
    pub fn construct<C>(mut store: S, channel: Rc<RefCell<C>>, mapping_dir: &Path) -> Self
    where
        C: SettingsChannel + 'static,
    {
        let table = match MappingTable::load_dir(mapping_dir) {
            Ok(table) => table,
            Err(error) => {
                warn!(error = %error, "settings bridge disabled");
                return Self {
                    store,
                    subscriptions: Vec::new(),
                };
            }
        };

        let mut watch_set = WatchSet::new();
        for entry in table.entries() {
            watch_set.add_parent_of(&entry.source_key);
        }
        for path in watch_set.paths() {
            if let Err(error) = store.watch_path(path) {
                warn!(path = %path, error = %error, "failed to watch path");
            }
        }

        let mut subscriptions = Vec::with_capacity(table.len());
        for entry in table.entries() {
            let destination_key = entry.destination_key.clone();
            let callback_channel = Rc::clone(&channel);
            let callback: ChangeCallback = Box::new(move |_key, value| {
                forward_value(&mut *callback_channel.borrow_mut(), &destination_key, value);
            });
            let notify_id = match store.register_change_notify(&entry.source_key, callback) {
                Ok(notify_id) => notify_id,
                Err(error) => {
                    warn!(key = %entry.source_key, error = %error, "failed to register change notification");
                    continue;
                }
            };
            // initial sync: push the current value before any real change arrives
            let current = store.get_value(&entry.source_key);
            forward_value(
                &mut *channel.borrow_mut(),
                &entry.destination_key,
                current.as_ref(),
            );
            subscriptions.push(Subscription {
                source_key: entry.source_key.clone(),
                destination_key: entry.destination_key.clone(),
                notify_id,
            });
        }

        info!(
            mappings = table.len(),
            watches = watch_set.len(),
            subscriptions = subscriptions.len(),
            "settings bridge constructed"
        );
        Self {
            store,
            subscriptions,
        }
    }

    /// Live subscriptions, in registration order
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// The store handle the bridge keeps alive
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Coerce `value` and republish it under `destination_key`
///
/// Integers pass through, booleans become 1 or 0, strings pass through
/// unmodified. Other value types and unset keys leave the channel
/// untouched. A successful set is followed by a publish; a failed set
/// suppresses the publish for this event only, and the next change to the
/// key is the next chance to converge.
pub fn forward_value<C: SettingsChannel>(
    channel: &mut C,
    destination_key: &str,
    value: Option<&ConfigValue>,
) {
    let result = match value {
        Some(ConfigValue::Int(number)) => channel.set_int(destination_key, *number),
        Some(ConfigValue::Bool(flag)) => channel.set_int(destination_key, i32::from(*flag)),
        Some(ConfigValue::String(text)) => channel.set_string(destination_key, text),
        Some(other) => {
            debug!(key = %destination_key, kind = other.kind(), "value type has no settings equivalent, ignoring");
            return;
        }
        None => return,
    };
    match result {
        Ok(()) => channel.publish(),
        Err(error) => {
            warn!(key = %destination_key, error = %error, "destination write failed, not publishing");
        }
    }
}
