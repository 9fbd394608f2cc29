use serde::{Deserialize, Serialize};

use crate::{WatchSpec, WatchSpecId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("a cookie name is required")]
    MissingName,
    #[error("a domain is required")]
    MissingDomain,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("watch entry '{0}' no longer exists")]
pub struct NotFound(pub WatchSpecId);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFound),
}

/// What `delete` removes besides the target entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Remove the target and every entry after it.
    #[default]
    Truncate,
    /// Remove only the target.
    Single,
}

/// Editable fields of a watch spec, as typed into the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSpecFields {
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub desc: String,
}

impl WatchSpecFields {
    /// Trims every field, then requires a name and a domain (checked in that order).
    pub fn validate(&self) -> Result<WatchSpecFields, ValidationError> {
        let fields = WatchSpecFields {
            name: self.name.trim().to_string(),
            domain: self.domain.trim().to_string(),
            desc: self.desc.trim().to_string(),
        };
        if fields.name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if fields.domain.is_empty() {
            return Err(ValidationError::MissingDomain);
        }
        Ok(fields)
    }
}

/// Ordered watch-list. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchList {
    specs: Vec<WatchSpec>,
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: Vec<WatchSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[WatchSpec] {
        &self.specs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WatchSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WatchSpec> {
        self.specs.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.id == id)
    }

    /// Next id for a new entry: the decimal millisecond timestamp, bumped past
    /// every numeric id already present so ids stay strictly increasing even
    /// when two entries are added within the same millisecond.
    ///
    /// A list already holding `i64::MAX` gets `"<i64::MAX>-<n>"` ids instead,
    /// which never parse as numbers and so never collide with the bump.
    pub fn next_id(&self, now_ms: i64) -> WatchSpecId {
        let max_existing = self
            .specs
            .iter()
            .filter_map(|s| s.id.parse::<i64>().ok())
            .max();
        let next = match max_existing {
            Some(max) if now_ms <= max => max.checked_add(1),
            _ => Some(now_ms),
        };
        if let Some(id) = next {
            return id.to_string();
        }
        let mut n: usize = 1;
        loop {
            let id = format!("{}-{n}", i64::MAX);
            if self.get(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    pub fn append(
        &mut self,
        fields: &WatchSpecFields,
        now_ms: i64,
    ) -> Result<&WatchSpec, ValidationError> {
        let fields = fields.validate()?;
        let id = self.next_id(now_ms);
        self.specs.push(WatchSpec {
            id,
            name: fields.name,
            domain: fields.domain,
            desc: fields.desc,
        });
        Ok(&self.specs[self.specs.len() - 1])
    }

    /// Replaces name/domain/desc of the entry with `id`, keeping its id and position.
    pub fn update(
        &mut self,
        id: &str,
        fields: &WatchSpecFields,
    ) -> Result<&WatchSpec, MutationError> {
        let fields = fields.validate()?;
        let ix = self
            .position(id)
            .ok_or_else(|| NotFound(id.to_string()))?;
        let spec = &mut self.specs[ix];
        spec.name = fields.name;
        spec.domain = fields.domain;
        spec.desc = fields.desc;
        Ok(&self.specs[ix])
    }

    /// Removes the entry with `id` according to `policy` and returns what was removed.
    pub fn delete(&mut self, id: &str, policy: DeletePolicy) -> Result<Vec<WatchSpec>, NotFound> {
        let ix = self
            .position(id)
            .ok_or_else(|| NotFound(id.to_string()))?;
        let removed = match policy {
            DeletePolicy::Truncate => self.specs.split_off(ix),
            DeletePolicy::Single => vec![self.specs.remove(ix)],
        };
        Ok(removed)
    }
}

impl<'a> IntoIterator for &'a WatchList {
    type Item = &'a WatchSpec;
    type IntoIter = std::slice::Iter<'a, WatchSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}
