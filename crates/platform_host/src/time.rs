//! Clock helpers for host adapters.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_ISSUED_TIMESTAMP_MS: Cell<u64> = const { Cell::new(0) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Returns a strictly increasing unix millisecond timestamp.
///
/// Two calls on the same thread never return the same value, even when the system clock stalls
/// or steps backwards.
pub fn next_monotonic_timestamp_ms() -> u64 {
    let now = unix_time_ms_now();
    LAST_ISSUED_TIMESTAMP_MS.with(|last| {
        let next = now.max(last.get().saturating_add(1));
        last.set(next);
        next
    })
}

/// Ensures later [`next_monotonic_timestamp_ms`] values are strictly above `floor`.
///
/// Used after restoring persisted timestamps that may come from a clock ahead of this one.
pub fn advance_monotonic_floor(floor: u64) {
    LAST_ISSUED_TIMESTAMP_MS.with(|last| {
        if last.get() < floor {
            last.set(floor);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_timestamps_strictly_increase() {
        let a = next_monotonic_timestamp_ms();
        let b = next_monotonic_timestamp_ms();
        let c = next_monotonic_timestamp_ms();
        assert!(a < b && b < c);
    }

    #[test]
    fn floor_pushes_next_timestamp_past_restored_values() {
        let far_future = unix_time_ms_now() + 86_400_000;
        advance_monotonic_floor(far_future);
        assert!(next_monotonic_timestamp_ms() > far_future);
    }
}
