//! Reducer actions, lifecycle events, and transition logic for the window registry.

use thiserror::Error;

use crate::{
    apps,
    grid::{snap_rect, snap_value},
    model::{
        GridSettings, ModeKind, OpenWindowRequest, RegistryState, SnapDirection, WindowId,
        WindowMode, WindowRecord, WindowRect, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_TITLE,
        DEFAULT_WINDOW_WIDTH,
    },
    routing::{resolve_target, RouteTarget},
    window_manager::{
        allocate_window_id, centered_rect, focus_and_raise, half_rect, refocus_topmost,
        sanitize_session, take_next_z_index, unminimized_mode, window_seq_of,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`].
pub enum DesktopAction {
    /// Create and focus a new window.
    CreateWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus and raise a window.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Move a normal-mode window to an absolute position.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// Target left edge.
        x: i32,
        /// Target top edge.
        y: i32,
    },
    /// Resize a normal-mode resizable window.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// Target width.
        width: i32,
        /// Target height.
        height: i32,
    },
    /// Minimize a visible window or restore a minimized one.
    ToggleMinimize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Maximize a normal window or restore a maximized one.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Snap a window to half of the desktop.
    SnapWindow {
        /// Window to snap.
        window_id: WindowId,
        /// Desktop edge to snap against.
        direction: SnapDirection,
        /// Usable desktop area.
        desktop: WindowRect,
    },
    /// Center a default-size window in the desktop.
    CenterWindow {
        /// Window to center.
        window_id: WindowId,
        /// Usable desktop area.
        desktop: WindowRect,
    },
    /// Replace every window and the z counter (session load only).
    RestoreSession {
        /// Windows to install.
        windows: Vec<WindowRecord>,
        /// Persisted z counter.
        next_z_index: u32,
    },
    /// Replace the snap-to-grid settings.
    SetGridSettings(GridSettings),
    /// Focus a window already showing `content_id`, or create one.
    OpenContent {
        /// Opaque application/content identifier.
        content_id: String,
        /// Skip reuse and always create a window.
        prefer_new_window: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Window lifecycle notifications emitted with every applied transition.
pub enum WindowEvent {
    Created(WindowId),
    Closed(WindowId),
    Focused(WindowId),
    Minimized(WindowId),
    Restored(WindowId),
    Maximized(WindowId),
    Unmaximized(WindowId),
    Moved(WindowId),
    Resized(WindowId),
    Snapped(WindowId),
    Centered(WindowId),
    SessionRestored,
    GridChanged,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Why an action left the registry unchanged.
pub enum IgnoreReason {
    #[error("window {0} not found")]
    WindowNotFound(WindowId),
    #[error("window {0} is not resizable")]
    NotResizable(WindowId),
    #[error("window {0} is not minimizable")]
    NotMinimizable(WindowId),
    #[error("window {0} is not maximizable")]
    NotMaximizable(WindowId),
    #[error("window {id} is {mode}, not normal")]
    NotNormalMode { id: WindowId, mode: ModeKind },
    #[error("window {0} is minimized")]
    WindowMinimized(WindowId),
    #[error("session contains window id {0} more than once")]
    DuplicateWindowId(WindowId),
    #[error("grid size must be positive, got {0}")]
    InvalidGridSize(i32),
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of [`reduce_desktop`].
pub enum Transition {
    /// A complete next state, ready to be installed, plus the events it produced.
    Applied {
        state: RegistryState,
        events: Vec<WindowEvent>,
    },
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn ignored_reason(&self) -> Option<&IgnoreReason> {
        match self {
            Self::Applied { .. } => None,
            Self::Ignored(reason) => Some(reason),
        }
    }

    pub fn events(&self) -> &[WindowEvent] {
        match self {
            Self::Applied { events, .. } => events,
            Self::Ignored(_) => &[],
        }
    }

    pub fn created_window_id(&self) -> Option<&WindowId> {
        self.events().iter().find_map(|event| match event {
            WindowEvent::Created(window_id) => Some(window_id),
            _ => None,
        })
    }

    fn applied(state: RegistryState, events: Vec<WindowEvent>) -> Self {
        Self::Applied { state, events }
    }
}

/// Computes the registry state that results from `action`.
///
/// `state` is only borrowed: the caller installs [`Transition::Applied`] states itself, so a
/// transition is either complete or absent. `now_ms` stamps `last_focused_at` on every window
/// that gains focus.
pub fn reduce_desktop(state: &RegistryState, action: DesktopAction, now_ms: u64) -> Transition {
    match action {
        DesktopAction::CreateWindow(req) => created(state, req, now_ms),
        DesktopAction::CloseWindow { window_id } => {
            let Some(index) = position(state, &window_id) else {
                return not_found(window_id);
            };
            let mut next = state.clone();
            next.windows.remove(index);
            let mut events = vec![WindowEvent::Closed(window_id)];
            if let Some(refocused) = refocus_topmost(&mut next, now_ms) {
                events.push(WindowEvent::Focused(refocused));
            }
            Transition::applied(next, events)
        }
        DesktopAction::FocusWindow { window_id } => {
            let Some(index) = position(state, &window_id) else {
                return not_found(window_id);
            };
            let mut next = state.clone();
            let mut events = Vec::new();
            if let WindowMode::Minimized { restore_bounds } = next.windows[index].mode {
                next.windows[index].mode = unminimized_mode(restore_bounds);
                events.push(WindowEvent::Restored(window_id.clone()));
            }
            focus_and_raise(&mut next, index, now_ms);
            events.push(WindowEvent::Focused(window_id));
            Transition::applied(next, events)
        }
        DesktopAction::MoveWindow { window_id, x, y } => {
            let Some(index) = position(state, &window_id) else {
                return not_found(window_id);
            };
            if let Some(reason) = require_normal(&state.windows[index]) {
                return Transition::Ignored(reason);
            }
            let mut next = state.clone();
            let grid = next.grid;
            let window = &mut next.windows[index];
            window.bounds.x = snap_value(grid, x);
            window.bounds.y = snap_value(grid, y);
            Transition::applied(next, vec![WindowEvent::Moved(window_id)])
        }
        DesktopAction::ResizeWindow {
            window_id,
            width,
            height,
        } => {
            let Some(index) = position(state, &window_id) else {
                return not_found(window_id);
            };
            let current = &state.windows[index];
            if !current.flags.resizable {
                return Transition::Ignored(IgnoreReason::NotResizable(window_id));
            }
            if let Some(reason) = require_normal(current) {
                return Transition::Ignored(reason);
            }
            let mut next = state.clone();
            let grid = next.grid;
            let window = &mut next.windows[index];
            window.bounds.width = snap_value(grid, width);
            window.bounds.height = snap_value(grid, height);
            Transition::applied(next, vec![WindowEvent::Resized(window_id)])
        }
        DesktopAction::ToggleMinimize { window_id } => toggle_minimize(state, window_id, now_ms),
        DesktopAction::ToggleMaximize { window_id } => {
            let Some(index) = position(state, &window_id) else {
                return not_found(window_id);
            };
            if !state.windows[index].flags.maximizable {
                return Transition::Ignored(IgnoreReason::NotMaximizable(window_id));
            }
            let mut next = state.clone();
            let window = &mut next.windows[index];
            let event = match window.mode {
                WindowMode::Minimized { .. } => {
                    return Transition::Ignored(IgnoreReason::WindowMinimized(window_id));
                }
                WindowMode::Normal => {
                    window.mode = WindowMode::Maximized {
                        restore_bounds: window.bounds,
                    };
                    WindowEvent::Maximized(window_id)
                }
                WindowMode::Maximized { restore_bounds } => {
                    window.bounds = restore_bounds;
                    window.mode = WindowMode::Normal;
                    WindowEvent::Unmaximized(window_id)
                }
            };
            Transition::applied(next, vec![event])
        }
        DesktopAction::SnapWindow {
            window_id,
            direction,
            desktop,
        } => place_visible_window(
            state,
            window_id,
            half_rect(desktop, direction),
            WindowEvent::Snapped,
        ),
        DesktopAction::CenterWindow { window_id, desktop } => place_visible_window(
            state,
            window_id,
            centered_rect(desktop, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            WindowEvent::Centered,
        ),
        DesktopAction::RestoreSession {
            windows,
            next_z_index,
        } => {
            let (windows, next_z_index) = match sanitize_session(windows, next_z_index) {
                Ok(sanitized) => sanitized,
                Err(window_id) => {
                    return Transition::Ignored(IgnoreReason::DuplicateWindowId(window_id));
                }
            };
            let restored_seq = windows
                .iter()
                .filter_map(|w| window_seq_of(&w.id))
                .max()
                .map_or(1, |seq| seq.saturating_add(1));
            let next = RegistryState {
                windows,
                next_z_index,
                grid: state.grid,
                next_window_seq: restored_seq.max(state.next_window_seq),
            };
            Transition::applied(next, vec![WindowEvent::SessionRestored])
        }
        DesktopAction::SetGridSettings(grid) => {
            if grid.grid_size <= 0 {
                return Transition::Ignored(IgnoreReason::InvalidGridSize(grid.grid_size));
            }
            let mut next = state.clone();
            next.grid = grid;
            Transition::applied(next, vec![WindowEvent::GridChanged])
        }
        DesktopAction::OpenContent {
            content_id,
            prefer_new_window,
        } => match resolve_target(&content_id, prefer_new_window, &state.windows) {
            RouteTarget::Existing(window_id) => {
                reduce_desktop(state, DesktopAction::FocusWindow { window_id }, now_ms)
            }
            RouteTarget::CreateNew => {
                created(state, apps::default_open_request(&content_id), now_ms)
            }
        },
    }
}

/// Builds the state with a new focused window on top and returns it with the new id.
///
/// Creation has no failure path, which is why it bypasses [`Transition`].
pub fn create_window(
    state: &RegistryState,
    req: OpenWindowRequest,
    now_ms: u64,
) -> (RegistryState, WindowId) {
    let mut next = state.clone();
    let window_id = allocate_window_id(&mut next);
    let z_index = take_next_z_index(&mut next);
    let bounds = snap_rect(next.grid, req.bounds.unwrap_or_default());

    for window in &mut next.windows {
        window.focused = false;
    }
    next.windows.push(WindowRecord {
        id: window_id.clone(),
        title: req
            .title
            .unwrap_or_else(|| DEFAULT_WINDOW_TITLE.to_string()),
        bounds,
        mode: WindowMode::Normal,
        z_index,
        focused: true,
        flags: req.flags,
        content_id: req.content_id,
        last_focused_at: Some(now_ms),
    });
    (next, window_id)
}

fn created(state: &RegistryState, req: OpenWindowRequest, now_ms: u64) -> Transition {
    let (next, window_id) = create_window(state, req, now_ms);
    Transition::applied(next, vec![WindowEvent::Created(window_id)])
}

fn toggle_minimize(state: &RegistryState, window_id: WindowId, now_ms: u64) -> Transition {
    let Some(index) = position(state, &window_id) else {
        return not_found(window_id);
    };
    if !state.windows[index].flags.minimizable {
        return Transition::Ignored(IgnoreReason::NotMinimizable(window_id));
    }

    let mut next = state.clone();
    let window = &mut next.windows[index];
    match window.mode {
        WindowMode::Minimized { restore_bounds } => {
            window.mode = unminimized_mode(restore_bounds);
            focus_and_raise(&mut next, index, now_ms);
            Transition::applied(
                next,
                vec![
                    WindowEvent::Restored(window_id.clone()),
                    WindowEvent::Focused(window_id),
                ],
            )
        }
        WindowMode::Normal | WindowMode::Maximized { .. } => {
            window.mode = WindowMode::Minimized {
                restore_bounds: window.mode.restore_bounds(),
            };
            window.focused = false;
            let mut events = vec![WindowEvent::Minimized(window_id)];
            if let Some(refocused) = refocus_topmost(&mut next, now_ms) {
                events.push(WindowEvent::Focused(refocused));
            }
            Transition::applied(next, events)
        }
    }
}

/// Shared body of snap and center: replace bounds of a visible window and force normal mode.
fn place_visible_window(
    state: &RegistryState,
    window_id: WindowId,
    bounds: WindowRect,
    event: impl FnOnce(WindowId) -> WindowEvent,
) -> Transition {
    let Some(index) = position(state, &window_id) else {
        return not_found(window_id);
    };
    if state.windows[index].is_minimized() {
        return Transition::Ignored(IgnoreReason::WindowMinimized(window_id));
    }
    let mut next = state.clone();
    let window = &mut next.windows[index];
    window.bounds = bounds;
    window.mode = WindowMode::Normal;
    Transition::applied(next, vec![event(window_id)])
}

fn position(state: &RegistryState, window_id: &WindowId) -> Option<usize> {
    state.windows.iter().position(|w| w.id == *window_id)
}

fn not_found(window_id: WindowId) -> Transition {
    Transition::Ignored(IgnoreReason::WindowNotFound(window_id))
}

fn require_normal(window: &WindowRecord) -> Option<IgnoreReason> {
    match window.mode {
        WindowMode::Normal => None,
        WindowMode::Maximized { .. } | WindowMode::Minimized { .. } => {
            Some(IgnoreReason::NotNormalMode {
                id: window.id.clone(),
                mode: window.mode.kind(),
            })
        }
    }
}
