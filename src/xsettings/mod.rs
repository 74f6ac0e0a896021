//! XSETTINGS manager over x11rb
//!
//! The manager side of the settings channel: owns the per-screen settings
//! selection, stages typed values and republishes them as one property
//! write. The host feeds X events through `process_event` so it can notice
//! another manager taking the selection over.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, ClientMessageData, ClientMessageEvent, ConnectionExt, CreateWindowAux, EventMask,
    PropMode, Window, WindowClass, CLIENT_MESSAGE_EVENT,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperExt;

pub mod wire;

use crate::channel::SettingsChannel;
use crate::constants::xsettings::{MANAGER, SELECTION_PREFIX, SETTINGS_PROPERTY};
use wire::{Setting, SettingValue};

/// Holder of the per-screen settings selection
pub struct XSettingsManager {
    conn: RustConnection,
    window: Window,
    selection_atom: Atom,
    settings_atom: Atom,
    serial: u32,
    settings: BTreeMap<String, Setting>,
}

impl XSettingsManager {
    /// Acquire the settings selection for `screen_num` and announce it
    ///
    /// Fails when the selection already has an owner; only one settings
    /// manager may run per screen.
    pub fn new(conn: RustConnection, screen_num: usize) -> Result<Self> {
        let root = conn.setup().roots[screen_num].root;

        let selection_name = format!("{SELECTION_PREFIX}{screen_num}");
        let selection_atom = conn
            .intern_atom(false, selection_name.as_bytes())
            .context("Failed to intern selection atom")?
            .reply()
            .context("Failed to get reply for selection atom")?
            .atom;
        let settings_atom = conn
            .intern_atom(false, SETTINGS_PROPERTY.as_bytes())
            .context("Failed to intern settings atom")?
            .reply()
            .context("Failed to get reply for settings atom")?
            .atom;
        let manager_atom = conn
            .intern_atom(false, MANAGER.as_bytes())
            .context("Failed to intern MANAGER atom")?
            .reply()
            .context("Failed to get reply for MANAGER atom")?
            .atom;

        let owner = conn
            .get_selection_owner(selection_atom)
            .context("Failed to query selection owner")?
            .reply()
            .context("Failed to get reply for selection owner query")?
            .owner;
        if owner != x11rb::NONE {
            bail!("{selection_name} is owned by window {owner}; is another settings manager running?");
        }

        let window = conn.generate_id().context("Failed to allocate window id")?;
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            window,
            root,
            -1,
            -1,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new().override_redirect(1),
        )
        .context("Failed to create manager window")?;

        conn.set_selection_owner(window, selection_atom, x11rb::CURRENT_TIME)
            .context("Failed to acquire settings selection")?;
        let owner = conn
            .get_selection_owner(selection_atom)
            .context("Failed to verify selection ownership")?
            .reply()
            .context("Failed to get reply for ownership verification")?
            .owner;
        if owner != window {
            bail!("lost the race for {selection_name} to window {owner}");
        }

        // Let clients waiting on the root window know a manager is up
        let announce = ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window: root,
            type_: manager_atom,
            data: ClientMessageData::from([x11rb::CURRENT_TIME, selection_atom, window, 0, 0]),
        };
        conn.send_event(false, root, EventMask::STRUCTURE_NOTIFY, &announce)
            .context("Failed to announce settings manager")?;

        let manager = Self {
            conn,
            window,
            selection_atom,
            settings_atom,
            serial: 0,
            settings: BTreeMap::new(),
        };
        manager
            .write_settings()
            .context("Failed to write initial settings property")?;
        info!(selection = %selection_name, window = window, "settings manager ready");
        Ok(manager)
    }

    fn insert(&mut self, name: &str, value: SettingValue) -> Result<()> {
        wire::validate_name(name)?;
        self.settings.insert(
            name.to_owned(),
            Setting {
                value,
                last_change_serial: self.serial,
            },
        );
        Ok(())
    }

    fn write_settings(&self) -> Result<()> {
        let image = wire::serialize(self.serial, &self.settings);
        self.conn
            .change_property8(
                PropMode::REPLACE,
                self.window,
                self.settings_atom,
                self.settings_atom,
                &image,
            )
            .context("Failed to replace settings property")?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    /// True when `event` revoked the manager selection
    ///
    /// The host decides what to do about it; the usual answer is to exit
    /// and let the newer manager serve the screen.
    pub fn process_event(&self, event: &Event) -> bool {
        match event {
            Event::SelectionClear(event)
                if event.selection == self.selection_atom && event.owner == self.window =>
            {
                warn!(window = self.window, "settings selection taken over by another manager");
                true
            }
            _ => false,
        }
    }
}

impl SettingsChannel for XSettingsManager {
    fn set_int(&mut self, name: &str, value: i32) -> Result<()> {
        self.insert(name, SettingValue::Int(value))
    }

    fn set_string(&mut self, name: &str, value: &str) -> Result<()> {
        self.insert(name, SettingValue::String(value.to_owned()))
    }

    /// Publish staged settings; the serial advances only after the
    /// property write succeeds
    fn publish(&mut self) {
        match self.write_settings() {
            Ok(()) => self.serial = self.serial.wrapping_add(1),
            Err(error) => warn!(error = %error, "failed to publish settings"),
        }
    }
}
