use std::fmt;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

pub const DEFAULT_WINDOW_TITLE: &str = "Untitled";
pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;
pub const DEFAULT_WINDOW_WIDTH: i32 = 400;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;
pub const DEFAULT_GRID_SIZE: i32 = 16;

/// Opaque window token. Ordering is lexical and is used for deterministic tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self::new(
            DEFAULT_WINDOW_X,
            DEFAULT_WINDOW_Y,
            DEFAULT_WINDOW_WIDTH,
            DEFAULT_WINDOW_HEIGHT,
        )
    }
}

/// Capability flags, fixed when the window is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowFlags {
    pub resizable: bool,
    pub minimizable: bool,
    pub maximizable: bool,
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self {
            resizable: true,
            minimizable: true,
            maximizable: true,
        }
    }
}

/// Display mode of a window.
///
/// Restore geometry lives inside the variant that needs it, so a normal window can never carry a
/// stale pre-maximize rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Normal,
    Maximized {
        /// Geometry to return to when un-maximizing.
        restore_bounds: WindowRect,
    },
    Minimized {
        /// `Some` when the window was maximized before minimizing.
        restore_bounds: Option<WindowRect>,
    },
}

impl WindowMode {
    pub fn kind(self) -> ModeKind {
        match self {
            Self::Normal => ModeKind::Normal,
            Self::Maximized { .. } => ModeKind::Maximized,
            Self::Minimized { .. } => ModeKind::Minimized,
        }
    }

    pub fn is_minimized(self) -> bool {
        matches!(self, Self::Minimized { .. })
    }

    pub fn restore_bounds(self) -> Option<WindowRect> {
        match self {
            Self::Normal => None,
            Self::Maximized { restore_bounds } => Some(restore_bounds),
            Self::Minimized { restore_bounds } => restore_bounds,
        }
    }
}

/// Tag-only view of [`WindowMode`], used on the wire and in ignore reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Normal,
    Maximized,
    Minimized,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Maximized => "maximized",
            Self::Minimized => "minimized",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PersistedWindow", into = "PersistedWindow")]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub bounds: WindowRect,
    pub mode: WindowMode,
    pub z_index: u32,
    pub focused: bool,
    pub flags: WindowFlags,
    pub content_id: String,
    pub last_focused_at: Option<u64>,
}

impl WindowRecord {
    pub fn is_minimized(&self) -> bool {
        self.mode.is_minimized()
    }
}

/// Flat JSON shape of a window record inside a session document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedWindow {
    id: WindowId,
    title: String,
    bounds: WindowRect,
    mode: ModeKind,
    z_index: u32,
    focused: bool,
    resizable: bool,
    minimizable: bool,
    maximizable: bool,
    content_id: String,
    #[serde(
        default,
        deserialize_with = "timestamp_from_number",
        skip_serializing_if = "Option::is_none"
    )]
    last_focused_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    restore_bounds: Option<WindowRect>,
}

/// Accepts any non-negative JSON number, truncating fractional milliseconds.
fn timestamp_from_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(ms) = number.as_u64() {
        return Ok(Some(ms));
    }
    match number.as_f64() {
        Some(ms) if ms.is_finite() && ms >= 0.0 => Ok(Some(ms.trunc() as u64)),
        _ => Err(D::Error::custom(format!(
            "lastFocusedAt must be a non-negative number, got {number}"
        ))),
    }
}

impl From<WindowRecord> for PersistedWindow {
    fn from(window: WindowRecord) -> Self {
        Self {
            mode: window.mode.kind(),
            restore_bounds: window.mode.restore_bounds(),
            id: window.id,
            title: window.title,
            bounds: window.bounds,
            z_index: window.z_index,
            focused: window.focused,
            resizable: window.flags.resizable,
            minimizable: window.flags.minimizable,
            maximizable: window.flags.maximizable,
            content_id: window.content_id,
            last_focused_at: window.last_focused_at,
        }
    }
}

impl From<PersistedWindow> for WindowRecord {
    fn from(raw: PersistedWindow) -> Self {
        let mode = match raw.mode {
            ModeKind::Normal => WindowMode::Normal,
            ModeKind::Maximized => WindowMode::Maximized {
                restore_bounds: raw.restore_bounds.unwrap_or(raw.bounds),
            },
            ModeKind::Minimized => WindowMode::Minimized {
                restore_bounds: raw.restore_bounds,
            },
        };
        Self {
            id: raw.id,
            title: raw.title,
            bounds: raw.bounds,
            mode,
            z_index: raw.z_index,
            focused: raw.focused,
            flags: WindowFlags {
                resizable: raw.resizable,
                minimizable: raw.minimizable,
                maximizable: raw.maximizable,
            },
            content_id: raw.content_id,
            last_focused_at: raw.last_focused_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    pub snap_enabled: bool,
    pub grid_size: i32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            snap_enabled: false,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapDirection {
    Left,
    Right,
    Top,
    Bottom,
}

/// Full registry state. Installed atomically by the runtime; never mutated in place by reducers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryState {
    /// Records in creation order. Stacking order is derived from `z_index`.
    pub windows: Vec<WindowRecord>,
    /// Next z value to hand out. Never decreases.
    pub next_z_index: u32,
    pub grid: GridSettings,
    /// Sequence backing generated window ids. Not persisted.
    pub next_window_seq: u64,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            next_z_index: 1,
            grid: GridSettings::default(),
            next_window_seq: 1,
        }
    }
}

impl RegistryState {
    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == *window_id)
    }

    /// Windows that are not minimized, in list order.
    pub fn active_windows(&self) -> Vec<&WindowRecord> {
        self.windows.iter().filter(|w| !w.is_minimized()).collect()
    }

    pub fn focused_window(&self) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .find(|w| w.focused && !w.is_minimized())
    }

    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.focused_window().map(|w| w.id.clone())
    }

    /// Windows sorted bottom-to-top (ascending `z_index`), i.e. paint order.
    pub fn z_ordered_windows(&self) -> Vec<&WindowRecord> {
        let mut ordered: Vec<&WindowRecord> = self.windows.iter().collect();
        ordered.sort_by_key(|w| w.z_index);
        ordered
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            windows: self.windows.clone(),
            next_z_index: self.next_z_index,
        }
    }
}

/// Serialized session: every window plus the z counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub windows: Vec<WindowRecord>,
    pub next_z_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub content_id: String,
    pub title: Option<String>,
    pub bounds: Option<WindowRect>,
    pub flags: WindowFlags,
}

impl OpenWindowRequest {
    pub fn new(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            title: None,
            bounds: None,
            flags: WindowFlags::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_bounds(mut self, bounds: WindowRect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_flags(mut self, flags: WindowFlags) -> Self {
        self.flags = flags;
        self
    }
}
