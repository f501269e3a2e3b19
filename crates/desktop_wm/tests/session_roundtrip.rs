use std::rc::Rc;

use desktop_wm::{
    check_invariants, load_session, resolve_target, DesktopRuntime, OpenWindowRequest, RouteTarget,
    RuntimeConfig, SnapDirection, WindowId, WindowMode, WindowRect, SESSION_STORAGE_KEY,
};
use platform_host::{KeyValueStore, MemoryKeyValueStore};
use pretty_assertions::assert_eq;

const DESKTOP: WindowRect = WindowRect::new(0, 0, 1920, 1080);

fn config() -> RuntimeConfig {
    RuntimeConfig {
        check_invariants: true,
        ..RuntimeConfig::default()
    }
}

#[test]
fn desktop_layout_survives_reload() {
    let store = MemoryKeyValueStore::default();

    let (viewer, terminal) = {
        let mut runtime = DesktopRuntime::boot(Rc::new(store.clone()), config());
        let viewer = runtime
            .open_content("text-viewer", false)
            .created_window_id()
            .cloned()
            .expect("viewer created");
        let terminal = runtime.create_window(OpenWindowRequest::new("terminal"));
        runtime.snap_window(&viewer, SnapDirection::Left, DESKTOP);
        runtime.center_window(&terminal, DESKTOP);
        runtime.toggle_minimize(&terminal);
        (viewer, terminal)
    };

    let runtime = DesktopRuntime::boot(Rc::new(store.clone()), config());

    let viewer_record = runtime.window(&viewer).expect("viewer restored");
    assert_eq!(viewer_record.bounds, WindowRect::new(0, 0, 960, 1080));
    assert!(viewer_record.focused);
    let terminal_record = runtime.window(&terminal).expect("terminal restored");
    assert_eq!(terminal_record.bounds, WindowRect::new(760, 390, 400, 300));
    assert_eq!(
        terminal_record.mode,
        WindowMode::Minimized {
            restore_bounds: None
        }
    );
    assert_eq!(
        resolve_target("terminal", false, &runtime.state().windows),
        RouteTarget::CreateNew
    );
    assert_eq!(
        resolve_target("text-viewer", false, &runtime.state().windows),
        RouteTarget::Existing(viewer)
    );
}

#[test]
fn restored_counter_keeps_z_order_climbing() {
    let store = MemoryKeyValueStore::default();
    let top_before = {
        let mut runtime = DesktopRuntime::boot(Rc::new(store.clone()), config());
        let a = runtime.create_window(OpenWindowRequest::new("help"));
        runtime.create_window(OpenWindowRequest::new("settings"));
        runtime.focus_window(&a);
        runtime.state().next_z_index
    };

    let mut runtime = DesktopRuntime::boot(Rc::new(store.clone()), config());
    assert_eq!(runtime.state().next_z_index, top_before);

    let fresh = runtime.create_window(OpenWindowRequest::new("app-store"));
    let z_order: Vec<_> = runtime
        .z_ordered_windows()
        .iter()
        .map(|w| w.id.clone())
        .collect();
    assert_eq!(z_order.last(), Some(&fresh));
    assert_eq!(runtime.window(&fresh).expect("fresh").z_index, top_before);
}

#[test]
fn corrupted_storage_never_reaches_the_registry() {
    for raw in [
        "",
        "{invalid json",
        r#"{"windows":{}, "nextZIndex":1}"#,
        r#"{"windows":[], "nextZIndex":"1"}"#,
        r#"{"windows":["x"], "nextZIndex":1}"#,
    ] {
        let store = MemoryKeyValueStore::with_item(SESSION_STORAGE_KEY, raw);
        assert_eq!(load_session(&store, SESSION_STORAGE_KEY), None, "input {raw:?}");

        let mut runtime = DesktopRuntime::boot(Rc::new(store.clone()), config());
        assert!(runtime.state().windows.is_empty());

        runtime.create_window(OpenWindowRequest::new("help"));
        let saved = store
            .get_item(SESSION_STORAGE_KEY)
            .expect("readable")
            .expect("overwritten");
        assert!(load_session(&store, SESSION_STORAGE_KEY).is_some(), "saved {saved}");
    }
}

#[test]
fn z_counter_near_its_limit_keeps_stacking_valid() {
    let raw = r#"{
        "windows": [{
            "id": "w-old", "title": "Old",
            "bounds": {"x": 0, "y": 0, "width": 400, "height": 300},
            "mode": "normal", "zIndex": 4294967293, "focused": true,
            "resizable": true, "minimizable": true, "maximizable": true,
            "contentId": "help"
        }],
        "nextZIndex": 4294967294
    }"#;
    let store = MemoryKeyValueStore::with_item(SESSION_STORAGE_KEY, raw);
    let mut runtime = DesktopRuntime::boot(Rc::new(store.clone()), config());
    assert_eq!(runtime.state().windows.len(), 1);

    let a = runtime.create_window(OpenWindowRequest::new("terminal"));
    let b = runtime.create_window(OpenWindowRequest::new("settings"));
    let state = runtime.state();
    assert_eq!(check_invariants(&state.windows, state.next_z_index), Ok(()));
    let z_order: Vec<WindowId> = runtime
        .z_ordered_windows()
        .iter()
        .map(|w| w.id.clone())
        .collect();
    assert_eq!(z_order, vec![WindowId::new("w-old"), a, b]);
}

#[test]
fn exhausted_z_counter_in_storage_starts_an_empty_desktop() {
    let raw = r#"{"windows":[],"nextZIndex":4294967295}"#;
    let store = MemoryKeyValueStore::with_item(SESSION_STORAGE_KEY, raw);
    let mut runtime = DesktopRuntime::boot(Rc::new(store.clone()), config());
    assert_eq!(runtime.state().next_z_index, 1);

    let a = runtime.create_window(OpenWindowRequest::new("help"));
    let b = runtime.create_window(OpenWindowRequest::new("help"));
    assert_eq!(runtime.window(&a).expect("a").z_index, 1);
    assert_eq!(runtime.window(&b).expect("b").z_index, 2);
}
