use std::sync::Arc;

use camino::Utf8Path;
use cookiejar_core::{CookieQuery, CookieRecord};

mod firefox;
mod netscape;

pub use firefox::FirefoxCookieDb;
pub use netscape::{parse_netscape, NetscapeCookieFile};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cookie database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("lookup worker failed: {0}")]
    Join(String),
}

/// The host cookie store, queried by name and optional domain.
///
/// Zero or more matches come back in host order; consumers that only need one
/// cookie take the first.
#[async_trait::async_trait]
pub trait CookieSource: Send + Sync {
    async fn get_all(&self, query: &CookieQuery) -> Result<Vec<CookieRecord>, LookupError>;
}

#[async_trait::async_trait]
impl<T: CookieSource + ?Sized> CookieSource for Arc<T> {
    async fn get_all(&self, query: &CookieQuery) -> Result<Vec<CookieRecord>, LookupError> {
        (**self).get_all(query).await
    }
}

/// Picks a reader by file extension: `.sqlite` is a Firefox profile database,
/// anything else is read as a Netscape `cookies.txt` export.
pub fn open_cookie_source(path: &Utf8Path) -> Arc<dyn CookieSource> {
    let is_sqlite = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sqlite"));
    if is_sqlite {
        tracing::debug!("using firefox cookie database {}", path);
        Arc::new(FirefoxCookieDb::new(path))
    } else {
        tracing::debug!("using netscape cookie file {}", path);
        Arc::new(NetscapeCookieFile::new(path))
    }
}

/// Host ordering: longer paths first, ties keep their original order.
fn sort_host_order(cookies: &mut [CookieRecord]) {
    cookies.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
}
