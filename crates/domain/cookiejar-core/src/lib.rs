use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod domain_match;
pub mod watchlist;

pub use watchlist::{
    DeletePolicy, MutationError, NotFound, ValidationError, WatchList, WatchSpecFields,
};

pub type WatchSpecId = String;

/// One watched cookie definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchSpec {
    pub id: WatchSpecId,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub desc: String,
}

impl WatchSpec {
    pub fn fields(&self) -> WatchSpecFields {
        WatchSpecFields {
            name: self.name.clone(),
            domain: self.domain.clone(),
            desc: self.desc.clone(),
        }
    }
}

/// A cookie as reported by the host cookie store. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    /// Seconds since the Unix epoch; `None` for session cookies.
    pub expiration_date: Option<i64>,
}

/// Filter for a single cookie-store lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieQuery {
    pub name: String,
    pub domain: Option<String>,
}

impl CookieQuery {
    /// An empty domain is left out of the filter so any domain matches.
    pub fn for_spec(spec: &WatchSpec) -> Self {
        let domain = if spec.domain.is_empty() {
            None
        } else {
            Some(spec.domain.clone())
        };
        Self {
            name: spec.name.clone(),
            domain,
        }
    }

    pub fn matches(&self, cookie: &CookieRecord) -> bool {
        if cookie.name != self.name {
            return false;
        }
        match &self.domain {
            Some(filter) => domain_match::domain_matches(&cookie.domain, filter),
            None => true,
        }
    }
}

/// A found cookie joined with the watch spec that asked for it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisplayRecord {
    /// Position of the originating spec in the watch-list that was aggregated.
    pub watch_index: usize,
    pub watch_id: WatchSpecId,
    pub name: String,
    pub value: String,
    pub domain: String,
    pub desc: Option<String>,
}

impl DisplayRecord {
    pub fn join(watch_index: usize, spec: &WatchSpec, cookie: CookieRecord) -> Self {
        let desc = if spec.desc.is_empty() {
            None
        } else {
            Some(spec.desc.clone())
        };
        Self {
            watch_index,
            watch_id: spec.id.clone(),
            name: cookie.name,
            value: cookie.value,
            domain: cookie.domain,
            desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(name: &str, domain: &str) -> CookieRecord {
        CookieRecord {
            name: name.into(),
            value: "v".into(),
            domain: domain.into(),
            path: "/".into(),
            secure: false,
            http_only: false,
            host_only: false,
            expiration_date: None,
        }
    }

    #[test]
    fn query_omits_empty_domain() {
        let spec = WatchSpec {
            id: "1".into(),
            name: "sid".into(),
            domain: String::new(),
            desc: String::new(),
        };
        let q = CookieQuery::for_spec(&spec);
        assert_eq!(q.domain, None);
        assert!(q.matches(&cookie("sid", "anything.test")));
        assert!(!q.matches(&cookie("other", "anything.test")));
    }

    #[test]
    fn join_drops_empty_desc() {
        let spec = WatchSpec {
            id: "7".into(),
            name: "sid".into(),
            domain: "example.com".into(),
            desc: String::new(),
        };
        let rec = DisplayRecord::join(2, &spec, cookie("sid", ".example.com"));
        assert_eq!(rec.watch_index, 2);
        assert_eq!(rec.watch_id, "7");
        assert_eq!(rec.desc, None);
        assert_eq!(rec.domain, ".example.com");
    }
}
