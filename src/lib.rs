//! Bridge between a hierarchical configuration store and the XSETTINGS
//! distribution channel
//!
//! Runs inside a desktop-session helper process. At startup the bridge
//! loads a directory of `<sourceKey> <destinationKey>` mapping files,
//! installs one watch per distinct parent path, subscribes to every mapped
//! key and pushes each key's current value once. From then on the store's
//! own notification delivery drives the bridge: each change is coerced
//! (integers pass through, booleans become 0/1, strings pass through
//! unmodified) and republished, followed by one publish step so channel
//! subscribers observe it. Malformed input never aborts the bridge; every
//! failure is logged and the next unit of work proceeds.

#![forbid(unsafe_code)]

pub mod bridge;
pub mod channel;
pub mod constants;
pub mod error;
pub mod mapping;
pub mod store;
pub mod value;
pub mod watch;
pub mod xsettings;

pub use bridge::{forward_value, SettingsBridge, Subscription};
pub use channel::SettingsChannel;
pub use error::BridgeError;
pub use mapping::{MappingEntry, MappingTable};
pub use store::{ChangeCallback, ConfigStore, NotifyId};
pub use value::ConfigValue;
pub use watch::WatchSet;
pub use xsettings::XSettingsManager;
