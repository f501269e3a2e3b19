//! The window-manager context object.
//!
//! [`DesktopRuntime`] is constructed once by the host and handed to every consumer. It owns the
//! installed [`RegistryState`]; all writes go through `&mut self`, so there is exactly one writer
//! and every transition is computed, checked, installed, persisted and announced before the next
//! one starts.

use std::rc::Rc;

use platform_host::{advance_monotonic_floor, next_monotonic_timestamp_ms, KeyValueStore};

use crate::{
    config::RuntimeConfig,
    invariants::check_invariants,
    model::{
        GridSettings, OpenWindowRequest, RegistryState, SnapDirection, WindowId, WindowRecord,
        WindowRect,
    },
    persistence::{load_session, save_session},
    reducer::{create_window, reduce_desktop, DesktopAction, Transition, WindowEvent},
};

/// Callback invoked for every lifecycle event, after the new state is installed.
pub type WindowEventListener = Box<dyn FnMut(&WindowEvent, &RegistryState)>;

pub struct DesktopRuntime {
    state: RegistryState,
    store: Rc<dyn KeyValueStore>,
    config: RuntimeConfig,
    clock: Box<dyn FnMut() -> u64>,
    listeners: Vec<WindowEventListener>,
}

impl DesktopRuntime {
    /// Creates an empty runtime. Nothing is read from `store`.
    pub fn new(store: Rc<dyn KeyValueStore>, config: RuntimeConfig) -> Self {
        let state = RegistryState {
            grid: config.grid,
            ..RegistryState::default()
        };
        Self {
            state,
            store,
            config,
            clock: Box::new(next_monotonic_timestamp_ms),
            listeners: Vec::new(),
        }
    }

    /// Creates a runtime and restores the stored session, if a valid one exists.
    pub fn boot(store: Rc<dyn KeyValueStore>, config: RuntimeConfig) -> Self {
        let mut runtime = Self::new(store, config);
        let Some(snapshot) = load_session(runtime.store.as_ref(), &runtime.config.storage_key)
        else {
            return runtime;
        };

        if let Some(latest) = snapshot
            .windows
            .iter()
            .filter_map(|w| w.last_focused_at)
            .max()
        {
            advance_monotonic_floor(latest);
        }
        let count = snapshot.windows.len();
        let transition = runtime.restore_session(snapshot.windows, snapshot.next_z_index);
        match transition.ignored_reason() {
            None => leptos::logging::log!("restored {count} windows from stored session"),
            Some(reason) => leptos::logging::warn!("stored session not restored: {reason}"),
        }
        runtime
    }

    /// Replaces the timestamp source used for `last_focused_at`.
    pub fn with_clock(mut self, clock: impl FnMut() -> u64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Registers a lifecycle listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&WindowEvent, &RegistryState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Reduces `action` against the installed state and installs the result when applied.
    ///
    /// # Panics
    ///
    /// Panics when invariant checking is enabled and the computed state violates a registry
    /// invariant. That indicates a defect in the reducer, not bad caller input.
    pub fn dispatch(&mut self, action: DesktopAction) -> Transition {
        let now_ms = (self.clock)();
        let transition = reduce_desktop(&self.state, action, now_ms);
        if let Transition::Applied { state, events } = &transition {
            self.install(state.clone(), events);
        }
        transition
    }

    pub fn create_window(&mut self, req: OpenWindowRequest) -> WindowId {
        let now_ms = (self.clock)();
        let (next, window_id) = create_window(&self.state, req, now_ms);
        self.install(next, &[WindowEvent::Created(window_id.clone())]);
        window_id
    }

    pub fn close_window(&mut self, window_id: &WindowId) -> Transition {
        self.dispatch(DesktopAction::CloseWindow {
            window_id: window_id.clone(),
        })
    }

    pub fn focus_window(&mut self, window_id: &WindowId) -> Transition {
        self.dispatch(DesktopAction::FocusWindow {
            window_id: window_id.clone(),
        })
    }

    pub fn move_window(&mut self, window_id: &WindowId, x: i32, y: i32) -> Transition {
        self.dispatch(DesktopAction::MoveWindow {
            window_id: window_id.clone(),
            x,
            y,
        })
    }

    pub fn resize_window(&mut self, window_id: &WindowId, width: i32, height: i32) -> Transition {
        self.dispatch(DesktopAction::ResizeWindow {
            window_id: window_id.clone(),
            width,
            height,
        })
    }

    pub fn toggle_minimize(&mut self, window_id: &WindowId) -> Transition {
        self.dispatch(DesktopAction::ToggleMinimize {
            window_id: window_id.clone(),
        })
    }

    pub fn toggle_maximize(&mut self, window_id: &WindowId) -> Transition {
        self.dispatch(DesktopAction::ToggleMaximize {
            window_id: window_id.clone(),
        })
    }

    pub fn snap_window(
        &mut self,
        window_id: &WindowId,
        direction: SnapDirection,
        desktop: WindowRect,
    ) -> Transition {
        self.dispatch(DesktopAction::SnapWindow {
            window_id: window_id.clone(),
            direction,
            desktop,
        })
    }

    pub fn center_window(&mut self, window_id: &WindowId, desktop: WindowRect) -> Transition {
        self.dispatch(DesktopAction::CenterWindow {
            window_id: window_id.clone(),
            desktop,
        })
    }

    pub fn restore_session(
        &mut self,
        windows: Vec<WindowRecord>,
        next_z_index: u32,
    ) -> Transition {
        self.dispatch(DesktopAction::RestoreSession {
            windows,
            next_z_index,
        })
    }

    pub fn set_grid_settings(&mut self, grid: GridSettings) -> Transition {
        self.dispatch(DesktopAction::SetGridSettings(grid))
    }

    /// Focuses the best existing window for `content_id` or creates one.
    pub fn open_content(&mut self, content_id: &str, prefer_new_window: bool) -> Transition {
        self.dispatch(DesktopAction::OpenContent {
            content_id: content_id.to_string(),
            prefer_new_window,
        })
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.state.window(window_id)
    }

    pub fn active_windows(&self) -> Vec<&WindowRecord> {
        self.state.active_windows()
    }

    pub fn focused_window(&self) -> Option<&WindowRecord> {
        self.state.focused_window()
    }

    pub fn z_ordered_windows(&self) -> Vec<&WindowRecord> {
        self.state.z_ordered_windows()
    }

    fn install(&mut self, next: RegistryState, events: &[WindowEvent]) {
        if self.config.check_invariants {
            if let Err(violation) = check_invariants(&next.windows, next.next_z_index) {
                panic!("window registry invariant violated: {violation}");
            }
        }
        self.state = next;

        if self.config.persist_session {
            save_session(
                self.store.as_ref(),
                &self.config.storage_key,
                &self.state.snapshot(),
            );
        }
        for event in events {
            for listener in &mut self.listeners {
                listener(event, &self.state);
            }
        }
    }
}
