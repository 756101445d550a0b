//! Client-generated unique document ids.
//!
//! Same shape the backend's own SDKs produce: 13 hex chars of timestamp
//! (seconds, then microseconds) followed by 7 random hex chars, 20 total,
//! all valid in document ids.

use chrono::Utc;
use rand::Rng;

const RANDOM_PADDING: usize = 7;

/// Generate a fresh unique id.
pub fn unique() -> String {
    let now = Utc::now();
    let seconds = now.timestamp();
    let micros = now.timestamp_subsec_micros();

    let mut id = format!("{seconds:08x}{micros:05x}");

    let mut rng = rand::thread_rng();
    for _ in 0..RANDOM_PADDING {
        let nibble: u8 = rng.gen_range(0..16);
        id.push(char::from_digit(u32::from(nibble), 16).unwrap_or('0'));
    }
    id
}
