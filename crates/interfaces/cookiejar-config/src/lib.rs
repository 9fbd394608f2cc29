//! Central configuration constants for storage and lookup defaults.

/// Persistence slot holding the serialized watch-list.
pub const WATCH_LIST_STORAGE_KEY: &str = "cookie_jar_user_setting";

/// Default per-lookup timeout against the cookie store (milliseconds).
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 3_000;

/// Minimum allowed per-lookup timeout (milliseconds).
pub const MIN_LOOKUP_TIMEOUT_MS: u64 = 100;

/// Maximum allowed per-lookup timeout (milliseconds).
pub const MAX_LOOKUP_TIMEOUT_MS: u64 = 30_000;

/// Convenience function to clamp a timeout value into allowed range.
pub fn clamp_timeout_ms(v: u64) -> u64 {
    v.clamp(MIN_LOOKUP_TIMEOUT_MS, MAX_LOOKUP_TIMEOUT_MS)
}
