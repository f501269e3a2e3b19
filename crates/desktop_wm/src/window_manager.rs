//! Shared window-manager transition helpers used by the desktop reducer.
//!
//! Every helper works on a draft [`RegistryState`] owned by the reducer; the installed state is
//! never touched from here.

use crate::model::{RegistryState, SnapDirection, WindowId, WindowMode, WindowRecord, WindowRect};

/// Prefix of generated window ids.
pub const WINDOW_ID_PREFIX: &str = "win-";

/// Hands out the next z value and advances the counter.
///
/// When the counter reaches `u32::MAX` the stack is compacted to `1..=n` first, so the value
/// handed out is always fresh and strictly below the new counter.
pub fn take_next_z_index(state: &mut RegistryState) -> u32 {
    if state.next_z_index == u32::MAX {
        state.next_z_index = rerank_z_order(&mut state.windows);
    }
    let z_index = state.next_z_index.max(1);
    state.next_z_index = z_index + 1;
    z_index
}

/// Stable re-rank of z values to `1..=n`, keeping paint order. Returns `n + 1`.
fn rerank_z_order(windows: &mut [WindowRecord]) -> u32 {
    let mut order: Vec<usize> = (0..windows.len()).collect();
    order.sort_by_key(|&i| (windows[i].z_index, i));
    for (rank, index) in order.into_iter().enumerate() {
        windows[index].z_index = (rank + 1) as u32;
    }
    windows.len() as u32 + 1
}

/// Generates an id that no live window uses.
pub fn allocate_window_id(state: &mut RegistryState) -> WindowId {
    loop {
        let candidate = WindowId(format!("{WINDOW_ID_PREFIX}{:06}", state.next_window_seq));
        state.next_window_seq = state.next_window_seq.saturating_add(1);
        if state.window(&candidate).is_none() {
            return candidate;
        }
    }
}

/// Returns the sequence number embedded in a generated id, if `window_id` looks generated.
pub fn window_seq_of(window_id: &WindowId) -> Option<u64> {
    window_id
        .as_str()
        .strip_prefix(WINDOW_ID_PREFIX)?
        .parse()
        .ok()
}

/// Focuses and raises the window at `index` to a fresh top z value.
///
/// The raise happens even when the window already holds focus, so repeated focus calls keep
/// climbing the stack.
pub fn focus_and_raise(state: &mut RegistryState, index: usize, now_ms: u64) {
    let z_index = take_next_z_index(state);
    for (i, window) in state.windows.iter_mut().enumerate() {
        window.focused = i == index;
    }
    if let Some(window) = state.windows.get_mut(index) {
        window.z_index = z_index;
        window.last_focused_at = Some(now_ms);
    }
}

/// Hands focus to the topmost non-minimized window when nothing is focused.
///
/// Returns the newly focused window id. The z order is left unchanged.
pub fn refocus_topmost(state: &mut RegistryState, now_ms: u64) -> Option<WindowId> {
    if state.focused_window().is_some() {
        return None;
    }
    let window = state
        .windows
        .iter_mut()
        .filter(|w| !w.is_minimized())
        .max_by_key(|w| w.z_index)?;
    window.focused = true;
    window.last_focused_at = Some(now_ms);
    Some(window.id.clone())
}

/// Mode a minimized window returns to when it is restored.
pub fn unminimized_mode(restore_bounds: Option<WindowRect>) -> WindowMode {
    match restore_bounds {
        Some(restore_bounds) => WindowMode::Maximized { restore_bounds },
        None => WindowMode::Normal,
    }
}

/// Exact half of `desktop` flush to the edge named by `direction`.
pub fn half_rect(desktop: WindowRect, direction: SnapDirection) -> WindowRect {
    let half_w = desktop.width / 2;
    let half_h = desktop.height / 2;
    match direction {
        SnapDirection::Left => WindowRect {
            width: half_w,
            ..desktop
        },
        SnapDirection::Right => WindowRect {
            x: desktop.x + desktop.width - half_w,
            width: half_w,
            ..desktop
        },
        SnapDirection::Top => WindowRect {
            height: half_h,
            ..desktop
        },
        SnapDirection::Bottom => WindowRect {
            y: desktop.y + desktop.height - half_h,
            height: half_h,
            ..desktop
        },
    }
}

/// A `width`×`height` rectangle centered in `desktop`.
pub fn centered_rect(desktop: WindowRect, width: i32, height: i32) -> WindowRect {
    WindowRect {
        x: desktop.x + (desktop.width - width) / 2,
        y: desktop.y + (desktop.height - height) / 2,
        width,
        height,
    }
}

/// Repairs a restored window list so it satisfies the focus and stacking invariants.
///
/// Minimized windows lose focus, only the highest focused window keeps it, and zero, duplicate
/// or exhausted (`u32::MAX`) z values trigger a stable re-rank to `1..=n`. Returns the sanitized
/// list and a z counter strictly above every z value; an exhausted stored counter is dropped. Duplicate ids cannot be repaired and yield the first
/// offending id as `Err`.
pub fn sanitize_session(
    mut windows: Vec<WindowRecord>,
    next_z_index: u32,
) -> Result<(Vec<WindowRecord>, u32), WindowId> {
    let mut ids: Vec<&WindowId> = windows.iter().map(|w| &w.id).collect();
    ids.sort();
    if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(pair[0].clone());
    }

    let mut z_values: Vec<u32> = windows.iter().map(|w| w.z_index).collect();
    z_values.sort_unstable();
    let needs_rerank = z_values.first() == Some(&0)
        || z_values.last() == Some(&u32::MAX)
        || z_values.windows(2).any(|pair| pair[0] == pair[1]);
    if needs_rerank {
        rerank_z_order(&mut windows);
    }

    for window in &mut windows {
        if window.is_minimized() {
            window.focused = false;
        }
    }
    let keeper = windows
        .iter()
        .enumerate()
        .filter(|(_, w)| w.focused)
        .max_by_key(|(_, w)| w.z_index)
        .map(|(i, _)| i);
    for (i, window) in windows.iter_mut().enumerate() {
        window.focused = window.focused && Some(i) == keeper;
    }

    let floor = windows.iter().map(|w| w.z_index).max().unwrap_or(0) + 1;
    let next_z_index = if next_z_index == u32::MAX {
        floor
    } else {
        next_z_index.max(floor)
    };
    Ok((windows, next_z_index))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::WindowFlags;

    const DESKTOP: WindowRect = WindowRect::new(0, 0, 1920, 1080);

    fn window(id: &str, z_index: u32, focused: bool, mode: WindowMode) -> WindowRecord {
        WindowRecord {
            id: WindowId::new(id),
            title: id.to_string(),
            bounds: WindowRect::default(),
            mode,
            z_index,
            focused,
            flags: WindowFlags::default(),
            content_id: "terminal".to_string(),
            last_focused_at: None,
        }
    }

    #[test]
    fn half_rects_cover_each_edge_exactly() {
        assert_eq!(
            half_rect(DESKTOP, SnapDirection::Left),
            WindowRect::new(0, 0, 960, 1080)
        );
        assert_eq!(
            half_rect(DESKTOP, SnapDirection::Right),
            WindowRect::new(960, 0, 960, 1080)
        );
        assert_eq!(
            half_rect(DESKTOP, SnapDirection::Top),
            WindowRect::new(0, 0, 1920, 540)
        );
        assert_eq!(
            half_rect(DESKTOP, SnapDirection::Bottom),
            WindowRect::new(0, 540, 1920, 540)
        );
    }

    #[test]
    fn right_half_stays_flush_for_odd_offset_desktops() {
        let desktop = WindowRect::new(10, 30, 1001, 701);
        let right = half_rect(desktop, SnapDirection::Right);
        assert_eq!(right.width, 500);
        assert_eq!(right.x + right.width, desktop.x + desktop.width);
        let bottom = half_rect(desktop, SnapDirection::Bottom);
        assert_eq!(bottom.y + bottom.height, desktop.y + desktop.height);
    }

    #[test]
    fn centered_rect_uses_integer_midpoint() {
        assert_eq!(
            centered_rect(DESKTOP, 400, 300),
            WindowRect::new(760, 390, 400, 300)
        );
        assert_eq!(
            centered_rect(WindowRect::new(100, 50, 800, 600), 400, 300),
            WindowRect::new(300, 200, 400, 300)
        );
    }

    #[test]
    fn allocated_ids_skip_existing_windows() {
        let mut state = RegistryState::default();
        state.windows.push(window("win-000001", 1, false, WindowMode::Normal));
        state.next_z_index = 2;
        let id = allocate_window_id(&mut state);
        assert_eq!(id, WindowId::new("win-000002"));
        assert_eq!(window_seq_of(&id), Some(2));
        assert_eq!(window_seq_of(&WindowId::new("custom")), None);
    }

    #[test]
    fn focus_and_raise_bumps_even_when_already_focused() {
        let mut state = RegistryState::default();
        state.windows.push(window("a", 1, true, WindowMode::Normal));
        state.next_z_index = 2;

        focus_and_raise(&mut state, 0, 10);
        assert_eq!(state.windows[0].z_index, 2);
        focus_and_raise(&mut state, 0, 11);
        assert_eq!(state.windows[0].z_index, 3);
        assert_eq!(state.windows[0].last_focused_at, Some(11));
        assert_eq!(state.next_z_index, 4);
    }

    #[test]
    fn refocus_picks_highest_non_minimized() {
        let mut state = RegistryState::default();
        state.windows.push(window("a", 4, false, WindowMode::Normal));
        state.windows.push(window(
            "b",
            9,
            false,
            WindowMode::Minimized {
                restore_bounds: None,
            },
        ));
        state.windows.push(window("c", 6, false, WindowMode::Normal));
        state.next_z_index = 10;

        assert_eq!(refocus_topmost(&mut state, 5), Some(WindowId::new("c")));
        assert!(state.windows[2].focused);
        assert_eq!(state.windows[2].z_index, 6);
        assert_eq!(refocus_topmost(&mut state, 6), None);
    }

    #[test]
    fn sanitize_reranks_duplicates_and_keeps_single_focus() {
        let windows = vec![
            window("a", 3, true, WindowMode::Normal),
            window("b", 3, true, WindowMode::Normal),
            window(
                "c",
                0,
                true,
                WindowMode::Minimized {
                    restore_bounds: None,
                },
            ),
        ];
        let (sanitized, next_z_index) = sanitize_session(windows, 1).expect("sanitize");

        let z: Vec<u32> = sanitized.iter().map(|w| w.z_index).collect();
        assert_eq!(z, vec![2, 3, 1]);
        let focused: Vec<bool> = sanitized.iter().map(|w| w.focused).collect();
        assert_eq!(focused, vec![false, true, false]);
        assert_eq!(next_z_index, 4);
    }

    #[test]
    fn sanitize_leaves_valid_sessions_untouched() {
        let windows = vec![
            window("a", 7, false, WindowMode::Normal),
            window("b", 2, true, WindowMode::Normal),
        ];
        let (sanitized, next_z_index) = sanitize_session(windows.clone(), 12).expect("sanitize");
        assert_eq!(sanitized, windows);
        assert_eq!(next_z_index, 12);
    }

    #[test]
    fn exhausted_counter_compacts_the_stack() {
        let mut state = RegistryState::default();
        state.windows.push(window("a", u32::MAX - 1, false, WindowMode::Normal));
        state.windows.push(window("b", 7, true, WindowMode::Normal));
        state.next_z_index = u32::MAX;

        let z_index = take_next_z_index(&mut state);
        let z: Vec<u32> = state.windows.iter().map(|w| w.z_index).collect();
        assert_eq!(z, vec![2, 1]);
        assert_eq!(z_index, 3);
        assert_eq!(state.next_z_index, 4);
    }

    #[test]
    fn sanitize_drops_exhausted_counter_and_top_values() {
        let windows = vec![
            window("a", u32::MAX, true, WindowMode::Normal),
            window("b", 5, false, WindowMode::Normal),
        ];
        let (sanitized, next_z_index) = sanitize_session(windows, u32::MAX).expect("sanitize");
        let z: Vec<u32> = sanitized.iter().map(|w| w.z_index).collect();
        assert_eq!(z, vec![2, 1]);
        assert_eq!(next_z_index, 3);

        let low = vec![window("c", 4, false, WindowMode::Normal)];
        let (_, next_z_index) = sanitize_session(low, u32::MAX).expect("sanitize");
        assert_eq!(next_z_index, 5);
    }

    #[test]
    fn sanitize_rejects_duplicate_ids() {
        let windows = vec![
            window("a", 1, false, WindowMode::Normal),
            window("a", 2, false, WindowMode::Normal),
        ];
        assert_eq!(sanitize_session(windows, 3), Err(WindowId::new("a")));
    }
}
