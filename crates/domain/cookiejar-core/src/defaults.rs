//! Built-in seed for a first run.
//!
//! The seed must stay a pure constant: two surfaces racing on an empty slot
//! both write it, and the race is only harmless because they write the same
//! value.

use crate::{WatchList, WatchSpec};

const SEED: &[(&str, &str, &str, &str)] = &[
    ("1", "SESSION", "localhost", "Local development session"),
    ("2", "csrftoken", "localhost", "CSRF token for local forms"),
    ("3", "_ga", ".google.com", "Google Analytics client id"),
];

impl WatchList {
    pub fn builtin_default() -> Self {
        WatchList::from_specs(
            SEED.iter()
                .map(|(id, name, domain, desc)| WatchSpec {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    domain: (*domain).to_string(),
                    desc: (*desc).to_string(),
                })
                .collect(),
        )
    }
}
