//! Built-in application catalog.
//!
//! Content ids are opaque to the registry; this table only supplies default window requests for
//! the apps that ship with the desktop. Unknown ids still open with plain defaults.

use crate::model::{OpenWindowRequest, WindowFlags, WindowRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub content_id: &'static str,
    pub title: &'static str,
    pub default_bounds: WindowRect,
    pub flags: WindowFlags,
}

const RESIZABLE: WindowFlags = WindowFlags {
    resizable: true,
    minimizable: true,
    maximizable: true,
};

const FIXED_DIALOG: WindowFlags = WindowFlags {
    resizable: false,
    minimizable: true,
    maximizable: false,
};

const APP_REGISTRY: [AppDescriptor; 7] = [
    AppDescriptor {
        content_id: "file-explorer",
        title: "Files",
        default_bounds: WindowRect::new(80, 60, 640, 420),
        flags: RESIZABLE,
    },
    AppDescriptor {
        content_id: "text-viewer",
        title: "Text Viewer",
        default_bounds: WindowRect::new(140, 90, 560, 420),
        flags: RESIZABLE,
    },
    AppDescriptor {
        content_id: "terminal",
        title: "Terminal",
        default_bounds: WindowRect::new(120, 120, 640, 360),
        flags: RESIZABLE,
    },
    AppDescriptor {
        content_id: "settings",
        title: "Settings",
        default_bounds: WindowRect::new(200, 120, 480, 360),
        flags: FIXED_DIALOG,
    },
    AppDescriptor {
        content_id: "logic-circuit",
        title: "Logic Playground",
        default_bounds: WindowRect::new(60, 40, 880, 600),
        flags: RESIZABLE,
    },
    AppDescriptor {
        content_id: "help",
        title: "Help",
        default_bounds: WindowRect::new(220, 100, 460, 520),
        flags: RESIZABLE,
    },
    AppDescriptor {
        content_id: "app-store",
        title: "App Store",
        default_bounds: WindowRect::new(100, 80, 720, 480),
        flags: RESIZABLE,
    },
];

pub fn app_registry() -> &'static [AppDescriptor] {
    &APP_REGISTRY
}

pub fn app_descriptor(content_id: &str) -> Option<&'static AppDescriptor> {
    app_registry()
        .iter()
        .find(|entry| entry.content_id == content_id)
}

/// Default window request for `content_id`, falling back to registry defaults for unknown ids.
pub fn default_open_request(content_id: &str) -> OpenWindowRequest {
    match app_descriptor(content_id) {
        Some(descriptor) => OpenWindowRequest::new(descriptor.content_id)
            .with_title(descriptor.title)
            .with_bounds(descriptor.default_bounds)
            .with_flags(descriptor.flags),
        None => OpenWindowRequest::new(content_id),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn content_ids_are_unique() {
        let ids: HashSet<&str> = app_registry().iter().map(|a| a.content_id).collect();
        assert_eq!(ids.len(), app_registry().len());
    }

    #[test]
    fn known_app_request_uses_descriptor_defaults() {
        let req = default_open_request("settings");
        assert_eq!(req.content_id, "settings");
        assert_eq!(req.title.as_deref(), Some("Settings"));
        assert_eq!(req.bounds, Some(WindowRect::new(200, 120, 480, 360)));
        assert!(!req.flags.resizable);
        assert!(!req.flags.maximizable);
    }

    #[test]
    fn unknown_app_request_keeps_content_id_and_defaults() {
        let req = default_open_request("third-party-widget");
        assert_eq!(req, OpenWindowRequest::new("third-party-widget"));
    }
}
