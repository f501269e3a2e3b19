//! Host storage side channels.

pub mod kv;
pub mod web_local;
