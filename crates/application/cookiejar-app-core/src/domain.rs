use std::time::Duration;

use cookiejar_core::{
    DeletePolicy, DisplayRecord, ValidationError, WatchList, WatchSpecFields, WatchSpecId,
};
use serde::{Deserialize, Serialize};

use crate::aggregator::RunId;

fn default_lookup_timeout_ms() -> u64 {
    cookiejar_config::DEFAULT_LOOKUP_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub delete_policy: DeletePolicy,
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    /// Default cookie database or `cookies.txt` export to read from.
    #[serde(default)]
    pub cookie_source: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            delete_policy: DeletePolicy::default(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            cookie_source: None,
        }
    }
}

impl AppSettings {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(cookiejar_config::clamp_timeout_ms(self.lookup_timeout_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Edit(WatchSpecId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialog {
    pub mode: EditorMode,
    pub form: WatchSpecFields,
    pub field_error: Option<ValidationError>,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub boot: BootState,
    pub list: WatchList,
    pub dialog: Option<EditDialog>,
    pub last_error: Option<String>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            boot: BootState::Loading,
            list: WatchList::new(),
            dialog: None,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewerState {
    pub boot: BootState,
    pub list: WatchList,
    pub current_run: Option<RunId>,
    pub settled: usize,
    pub records: Vec<DisplayRecord>,
    pub last_error: Option<String>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            boot: BootState::Loading,
            list: WatchList::new(),
            current_run: None,
            settled: 0,
            records: Vec::new(),
            last_error: None,
        }
    }
}

impl ViewerState {
    pub fn is_aggregating(&self) -> bool {
        self.current_run.is_some() && self.boot == BootState::Loading
    }
}
