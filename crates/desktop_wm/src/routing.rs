//! Reuse-vs-create decision for "open content" requests.

use std::cmp::Ordering;

use crate::model::{WindowId, WindowRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Focus this existing window.
    Existing(WindowId),
    /// No reusable window; the caller should create one.
    CreateNew,
}

/// Picks the window that should receive content `content_id`.
///
/// Minimized windows are never reuse targets. Among visible candidates the most recently
/// focused wins; ties and never-focused candidates fall back to ascending id order, so the
/// answer does not depend on the order of `windows`.
pub fn resolve_target(
    content_id: &str,
    prefer_new_window: bool,
    windows: &[WindowRecord],
) -> RouteTarget {
    if prefer_new_window {
        return RouteTarget::CreateNew;
    }

    windows
        .iter()
        .filter(|w| w.content_id == content_id && !w.is_minimized())
        .min_by(|a, b| compare_candidates(a, b))
        .map(|w| RouteTarget::Existing(w.id.clone()))
        .unwrap_or(RouteTarget::CreateNew)
}

/// Orders candidates best-first: newer `last_focused_at`, then any timestamp over none, then id.
fn compare_candidates(a: &WindowRecord, b: &WindowRecord) -> Ordering {
    match (a.last_focused_at, b.last_focused_at) {
        (Some(ta), Some(tb)) => tb.cmp(&ta),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}
