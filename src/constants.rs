//! Compiled-in paths and protocol names
//!
//! Single source of truth for the fixed locations and X11 names the bridge
//! relies on. The mapping directory is deliberately not configurable; the
//! bridge is wired into the session helper at build time.

/// Mapping-directory location and source-key syntax
pub mod paths {
    /// Directory scanned for mapping-definition files at startup
    pub const MAPPING_DIR: &str = "/etc/xsettings-bridge/mappings.d";

    /// Separator between path components of a source key
    pub const KEY_SEPARATOR: char = '/';
}

/// X11 atom names used by the settings manager
pub mod xsettings {
    /// Per-screen manager selection, suffixed with the screen number
    pub const SELECTION_PREFIX: &str = "_XSETTINGS_S";

    /// Property (and property type) holding the serialized settings
    pub const SETTINGS_PROPERTY: &str = "_XSETTINGS_SETTINGS";

    /// Client message broadcast to the root window when a manager starts
    pub const MANAGER: &str = "MANAGER";
}
