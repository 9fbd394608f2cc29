use camino::Utf8PathBuf;
use cookiejar_core::{CookieQuery, CookieRecord};

use super::{sort_host_order, CookieSource, LookupError};

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// A Netscape/curl `cookies.txt` export, re-read on every lookup.
#[derive(Debug, Clone)]
pub struct NetscapeCookieFile {
    path: Utf8PathBuf,
}

impl NetscapeCookieFile {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parses the seven tab-separated fields per line:
/// domain, include-subdomains, path, secure, expiry, name, value.
/// Malformed lines are skipped.
pub fn parse_netscape(content: &str) -> Vec<CookieRecord> {
    let mut out = Vec::new();
    for (ix, raw) in content.lines().enumerate() {
        let (line, http_only) = match raw.strip_prefix(HTTP_ONLY_PREFIX) {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 7 {
            tracing::debug!(line = ix + 1, "skipping malformed cookies.txt line");
            continue;
        }
        let expiry = fields[4].trim().parse::<i64>().ok().filter(|e| *e > 0);
        out.push(CookieRecord {
            name: fields[5].to_string(),
            value: fields[6..].join("\t"),
            domain: fields[0].to_string(),
            path: fields[2].to_string(),
            secure: fields[3].eq_ignore_ascii_case("TRUE"),
            http_only,
            host_only: !fields[1].eq_ignore_ascii_case("TRUE"),
            expiration_date: expiry,
        });
    }
    out
}

#[async_trait::async_trait]
impl CookieSource for NetscapeCookieFile {
    async fn get_all(&self, query: &CookieQuery) -> Result<Vec<CookieRecord>, LookupError> {
        let content = tokio::fs::read_to_string(self.path.as_std_path()).await?;
        let mut matches: Vec<CookieRecord> = parse_netscape(&content)
            .into_iter()
            .filter(|c| query.matches(c))
            .collect();
        sort_host_order(&mut matches);
        Ok(matches)
    }
}
