//! Settings property wire format
//!
//! Serialized image of the `_XSETTINGS_SETTINGS` property: a byte-order
//! tag, the manager serial, the setting count, then each setting as a type
//! byte, padded name, last-change serial and value. This writer always
//! emits little-endian and tags the image accordingly; readers honor the
//! tag.

use std::collections::BTreeMap;

use crate::error::BridgeError;

/// Byte-order tag for little-endian images (X11 LSBFirst)
pub const LSB_FIRST: u8 = 0;

/// Type tag for integer settings
pub const TYPE_INT: u8 = 0;

/// Type tag for string settings
pub const TYPE_STRING: u8 = 1;

/// Value of one staged setting
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Int(i32),
    String(String),
}

/// A staged setting plus the serial of its last change
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub value: SettingValue,
    pub last_change_serial: u32,
}

/// Check a destination name against the settings-name alphabet
///
/// ASCII letters, digits, `_` and `/` are allowed; anything else cannot be
/// carried by the protocol.
pub fn validate_name(name: &str) -> Result<(), BridgeError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '/';
    if name.is_empty() || !name.chars().all(allowed) {
        return Err(BridgeError::InvalidSettingName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn pad_len(len: usize) -> usize {
    (4 - len % 4) % 4
}

fn push_padded(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes);
    let padded = out.len() + pad_len(bytes.len());
    out.resize(padded, 0);
}

/// Serialize the full settings image for one property write
///
/// Settings are emitted in name order, so identical state always yields an
/// identical image.
pub fn serialize(serial: u32, settings: &BTreeMap<String, Setting>) -> Vec<u8> {
    let mut out = Vec::with_capacity(12 + settings.len() * 24);
    out.push(LSB_FIRST);
    out.extend_from_slice(&[0u8; 3]);
    out.extend_from_slice(&serial.to_le_bytes());
    out.extend_from_slice(&(settings.len() as u32).to_le_bytes());

    for (name, setting) in settings {
        let type_tag = match setting.value {
            SettingValue::Int(_) => TYPE_INT,
            SettingValue::String(_) => TYPE_STRING,
        };
        out.push(type_tag);
        out.push(0);
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        push_padded(&mut out, name.as_bytes());
        out.extend_from_slice(&setting.last_change_serial.to_le_bytes());
        match &setting.value {
            SettingValue::Int(number) => out.extend_from_slice(&number.to_le_bytes()),
            SettingValue::String(text) => {
                out.extend_from_slice(&(text.len() as u32).to_le_bytes());
                push_padded(&mut out, text.as_bytes());
            }
        }
    }
    out
}
