//! Bridge error types
//!
//! Every failure the crate itself can produce has a named variant. Failures
//! originating in the store or the channel stay `anyhow` errors and are
//! logged where they occur. None of them aborts the bridge: the next line,
//! path, entry or change event always proceeds.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// A mapping-file line without a `<source> <destination>` shape
    #[error("not a valid mapping line: {line:?}")]
    MalformedMappingLine { line: String },

    /// A source key that already has a registered destination; the first
    /// registration wins
    #[error("{source_key} -> {destination_key} is already mapped to {existing}")]
    DuplicateSourceKey {
        source_key: String,
        destination_key: String,
        existing: String,
    },

    /// The mapping directory cannot be opened; the bridge stays inert
    #[error("cannot read mapping directory {}: {}", .path.display(), .source)]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A destination name the settings protocol cannot carry
    #[error("invalid setting name: {name:?}")]
    InvalidSettingName { name: String },
}
