//! Host-side contracts shared by the window-manager core and browser adapters.
//!
//! The window manager never touches `window.localStorage` or the JS clock directly; it talks to
//! the [`KeyValueStore`] side channel and the time helpers exported here, which keeps the core
//! testable on native targets.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

pub use storage::kv::{
    load_json_with, save_json_with, KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore,
};
pub use storage::web_local::WebLocalStorage;
pub use time::{advance_monotonic_floor, next_monotonic_timestamp_ms, unix_time_ms_now};
