use camino::{Utf8Path, Utf8PathBuf};
use cookiejar_core::{CookieQuery, CookieRecord};
use rusqlite::{params, Connection, OpenFlags, Row};

use super::{CookieSource, LookupError};

/// Reads `moz_cookies` from a Firefox profile's `cookies.sqlite`.
#[derive(Debug, Clone)]
pub struct FirefoxCookieDb {
    path: Utf8PathBuf,
}

impl FirefoxCookieDb {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(path: &Utf8Path) -> Result<Connection, LookupError> {
        if !path.exists() {
            return Err(LookupError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("cookie database {path} not found"),
            )));
        }
        // `immutable=1` skips locking, so a running browser does not block reads.
        let conn = Connection::open_with_flags(
            sqlite_uri(path),
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    fn query_blocking(
        path: &Utf8Path,
        query: &CookieQuery,
    ) -> Result<Vec<CookieRecord>, LookupError> {
        let conn = Self::open(path)?;
        let mut stmt = conn.prepare(
            "SELECT name, value, host, path, expiry, isSecure, isHttpOnly
             FROM moz_cookies
             WHERE name = ?1
             ORDER BY length(path) DESC, creationTime ASC",
        )?;
        let rows = stmt.query_map(params![query.name], row_to_cookie)?;

        let mut out = Vec::new();
        for row in rows {
            let cookie = row?;
            if query.matches(&cookie) {
                out.push(cookie);
            }
        }
        Ok(out)
    }
}

fn row_to_cookie(row: &Row<'_>) -> rusqlite::Result<CookieRecord> {
    let host: String = row.get("host")?;
    let expiry: Option<i64> = row.get("expiry")?;
    let secure: i64 = row.get("isSecure")?;
    let http_only: i64 = row.get("isHttpOnly")?;
    Ok(CookieRecord {
        name: row.get("name")?,
        value: row.get("value")?,
        host_only: !host.starts_with('.'),
        domain: host,
        path: row.get("path")?,
        secure: secure != 0,
        http_only: http_only != 0,
        expiration_date: expiry,
    })
}

fn sqlite_uri(path: &Utf8Path) -> String {
    let mut escaped = String::with_capacity(path.as_str().len());
    for c in path.as_str().chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '?' => escaped.push_str("%3f"),
            '#' => escaped.push_str("%23"),
            '\\' => escaped.push('/'),
            other => escaped.push(other),
        }
    }
    format!("file:{escaped}?immutable=1")
}

#[async_trait::async_trait]
impl CookieSource for FirefoxCookieDb {
    async fn get_all(&self, query: &CookieQuery) -> Result<Vec<CookieRecord>, LookupError> {
        let path = self.path.clone();
        let query = query.clone();
        tokio::task::spawn_blocking(move || Self::query_blocking(&path, &query))
            .await
            .map_err(|e| LookupError::Join(e.to_string()))?
    }
}
