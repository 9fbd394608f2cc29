pub mod cookies;

// Re-exports for convenience
pub use cookies::{
    open_cookie_source, CookieSource, FirefoxCookieDb, LookupError, NetscapeCookieFile,
};
