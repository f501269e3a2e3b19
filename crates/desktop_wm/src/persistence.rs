//! Session persistence: best-effort saves and validated loads over a [`KeyValueStore`].
//!
//! Loads are all-or-nothing. A stored document that fails any shape, record, or invariant check
//! is discarded as a whole so corrupted storage can never reach the registry.

use platform_host::KeyValueStore;
use serde_json::Value;
use thiserror::Error;

use crate::{
    invariants::{check_invariants, InvariantViolation},
    model::{SessionSnapshot, WindowRecord},
};

/// Default storage key for the window-manager session document.
pub const SESSION_STORAGE_KEY: &str = "desktop.wm.session.v1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Why a stored session document was discarded.
pub enum SessionRejection {
    #[error("malformed session json: {0}")]
    MalformedJson(String),
    #[error("session document is not an object")]
    NotAnObject,
    #[error("session `windows` is missing or not an array")]
    WindowsNotArray,
    #[error("session `nextZIndex` is missing or not a number")]
    NextZIndexNotNumber,
    #[error("session `nextZIndex` {0} is not a valid z counter")]
    NextZIndexOutOfRange(String),
    #[error("session window #{index} is not an object")]
    WindowNotObject { index: usize },
    #[error("session window #{index} is invalid: {message}")]
    InvalidWindow { index: usize, message: String },
    #[error("session violates registry invariants: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Serializes and writes `snapshot` under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn try_save_session<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    snapshot: &SessionSnapshot,
) -> Result<(), String> {
    let raw = serde_json::to_string(snapshot).map_err(|e| e.to_string())?;
    store.set_item(key, &raw)
}

/// Writes `snapshot` under `key`, logging and swallowing any failure.
pub fn save_session<S: KeyValueStore + ?Sized>(store: &S, key: &str, snapshot: &SessionSnapshot) {
    if let Err(err) = try_save_session(store, key, snapshot) {
        leptos::logging::warn!("persist session failed: {err}");
    }
}

/// Loads the session stored under `key`.
///
/// Returns `None` when nothing is stored, the store cannot be read, or the document is rejected
/// by [`parse_session`]. Never panics on stored input.
pub fn load_session<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<SessionSnapshot> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            leptos::logging::warn!("session load failed: {err}");
            return None;
        }
    };
    match parse_session(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(rejection) => {
            leptos::logging::warn!("discarding stored session: {rejection}");
            None
        }
    }
}

/// Validates and decodes a raw session document.
///
/// # Errors
///
/// Returns the first [`SessionRejection`] found, checking top-level shape before records and
/// records before invariants.
pub fn parse_session(raw: &str) -> Result<SessionSnapshot, SessionRejection> {
    let document: Value =
        serde_json::from_str(raw).map_err(|e| SessionRejection::MalformedJson(e.to_string()))?;
    let object = document.as_object().ok_or(SessionRejection::NotAnObject)?;
    let entries = object
        .get("windows")
        .and_then(Value::as_array)
        .ok_or(SessionRejection::WindowsNotArray)?;
    let next_z_index = match object.get("nextZIndex") {
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n < u32::MAX)
            .ok_or_else(|| SessionRejection::NextZIndexOutOfRange(number.to_string()))?,
        _ => return Err(SessionRejection::NextZIndexNotNumber),
    };

    let mut windows = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            return Err(SessionRejection::WindowNotObject { index });
        }
        let window: WindowRecord =
            serde_json::from_value(entry.clone()).map_err(|e| SessionRejection::InvalidWindow {
                index,
                message: e.to_string(),
            })?;
        windows.push(window);
    }

    check_invariants(&windows, next_z_index)?;
    Ok(SessionSnapshot {
        windows,
        next_z_index,
    })
}
