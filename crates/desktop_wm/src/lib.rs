//! Window-manager core for the browser desktop.
//!
//! [`DesktopRuntime`] is the single context object: UI callers and cross-app open intents call
//! into it with window ids or content ids, [`reduce_desktop`] computes the next registry state,
//! the invariant checker fences it, and the session subscriber snapshots it to host storage.

pub mod apps;
pub mod config;
pub mod grid;
pub mod invariants;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod routing;
pub mod runtime_context;
pub mod window_manager;

pub use config::{load_runtime_config, RuntimeConfig, RUNTIME_CONFIG_KEY};
pub use invariants::{check_invariants, InvariantViolation};
pub use model::*;
pub use persistence::{
    load_session, parse_session, save_session, SessionRejection, SESSION_STORAGE_KEY,
};
pub use reducer::{reduce_desktop, DesktopAction, IgnoreReason, Transition, WindowEvent};
pub use routing::{resolve_target, RouteTarget};
pub use runtime_context::{DesktopRuntime, WindowEventListener};
