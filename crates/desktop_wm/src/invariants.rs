//! Post-transition invariant checks for the window registry.
//!
//! A failure here means a registry transition is wrong. The runtime turns it into a panic in
//! development builds and never tries to repair the state.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::{WindowId, WindowRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// More than one non-minimized window claims focus.
    #[error("multiple focused windows: {}", join_ids(.window_ids))]
    MultipleFocused { window_ids: Vec<WindowId> },
    /// Two live windows share a z-index.
    #[error("windows {first} and {second} share z-index {z_index}")]
    DuplicateZIndex {
        z_index: u32,
        first: WindowId,
        second: WindowId,
    },
    /// A minimized window is focused.
    #[error("minimized window {window_id} is focused")]
    MinimizedFocused { window_id: WindowId },
    /// Z-index must be a positive integer.
    #[error("window {window_id} has non-positive z-index")]
    NonPositiveZIndex { window_id: WindowId },
    /// The z counter must stay ahead of every assigned value.
    #[error("window {window_id} z-index {z_index} is not below next z-index {next_z_index}")]
    ZIndexAheadOfCounter {
        window_id: WindowId,
        z_index: u32,
        next_z_index: u32,
    },
    #[error("window id {window_id} appears more than once")]
    DuplicateWindowId { window_id: WindowId },
}

fn join_ids(ids: &[WindowId]) -> String {
    ids.iter()
        .map(WindowId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Scans `windows` for invariant violations and reports the first one found.
///
/// # Errors
///
/// Returns the first [`InvariantViolation`] encountered.
pub fn check_invariants(
    windows: &[WindowRecord],
    next_z_index: u32,
) -> Result<(), InvariantViolation> {
    let mut seen_ids: HashSet<&WindowId> = HashSet::with_capacity(windows.len());
    let mut seen_z: HashMap<u32, &WindowId> = HashMap::with_capacity(windows.len());
    let mut focused = Vec::new();

    for window in windows {
        if !seen_ids.insert(&window.id) {
            return Err(InvariantViolation::DuplicateWindowId {
                window_id: window.id.clone(),
            });
        }
        if window.z_index == 0 {
            return Err(InvariantViolation::NonPositiveZIndex {
                window_id: window.id.clone(),
            });
        }
        if window.z_index >= next_z_index {
            return Err(InvariantViolation::ZIndexAheadOfCounter {
                window_id: window.id.clone(),
                z_index: window.z_index,
                next_z_index,
            });
        }
        if let Some(first) = seen_z.insert(window.z_index, &window.id) {
            return Err(InvariantViolation::DuplicateZIndex {
                z_index: window.z_index,
                first: first.clone(),
                second: window.id.clone(),
            });
        }
        if window.focused {
            if window.is_minimized() {
                return Err(InvariantViolation::MinimizedFocused {
                    window_id: window.id.clone(),
                });
            }
            focused.push(window.id.clone());
        }
    }

    if focused.len() > 1 {
        return Err(InvariantViolation::MultipleFocused {
            window_ids: focused,
        });
    }
    Ok(())
}
