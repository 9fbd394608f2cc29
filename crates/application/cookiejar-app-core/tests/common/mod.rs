#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cookiejar_app_core::{Confirmer, EditDialog, Presenter};
use cookiejar_core::{CookieQuery, CookieRecord, DisplayRecord, WatchList};
use cookiejar_infra::{CookieSource, LookupError};
use cookiejar_persistence::{KeyValueSlot, MemorySlotStore, StorageError};
use tokio::sync::oneshot;

pub fn cookie(name: &str, value: &str, domain: &str) -> CookieRecord {
    CookieRecord {
        name: name.into(),
        value: value.into(),
        domain: domain.into(),
        path: "/".into(),
        secure: false,
        http_only: false,
        host_only: true,
        expiration_date: None,
    }
}

/// Memory slot that counts writes.
#[derive(Clone, Default)]
pub struct CountingSlot {
    pub inner: MemorySlotStore,
    writes: Arc<AtomicUsize>,
}

impl CountingSlot {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueSlot for CountingSlot {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

/// Reads work, writes always fail.
#[derive(Clone, Default)]
pub struct ReadOnlySlot {
    pub inner: MemorySlotStore,
}

impl KeyValueSlot for ReadOnlySlot {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk full")))
    }
}

#[derive(Default)]
pub struct PresenterLog {
    pub lists: Vec<WatchList>,
    pub cookie_renders: Vec<Vec<DisplayRecord>>,
    pub errors: Vec<String>,
    pub dialogs_opened: usize,
    pub dialogs_closed: usize,
}

#[derive(Clone, Default)]
pub struct RecordingPresenter {
    pub log: Arc<Mutex<PresenterLog>>,
}

impl RecordingPresenter {
    pub fn errors(&self) -> Vec<String> {
        self.log.lock().unwrap().errors.clone()
    }

    pub fn cookie_renders(&self) -> Vec<Vec<DisplayRecord>> {
        self.log.lock().unwrap().cookie_renders.clone()
    }

    pub fn last_list(&self) -> Option<WatchList> {
        self.log.lock().unwrap().lists.last().cloned()
    }
}

impl Presenter for RecordingPresenter {
    fn render_watch_list(&self, list: &WatchList) {
        self.log.lock().unwrap().lists.push(list.clone());
    }

    fn render_cookies(&self, records: &[DisplayRecord]) {
        self.log.lock().unwrap().cookie_renders.push(records.to_vec());
    }

    fn show_error(&self, message: &str) {
        self.log.lock().unwrap().errors.push(message.to_string());
    }

    fn open_dialog(&self, _dialog: &EditDialog) {
        self.log.lock().unwrap().dialogs_opened += 1;
    }

    fn close_dialog(&self) {
        self.log.lock().unwrap().dialogs_closed += 1;
    }
}

/// Always answers the same way, and remembers how often it was asked.
#[derive(Clone)]
pub struct Answer {
    yes: bool,
    pub asked: Arc<AtomicUsize>,
}

impl Answer {
    pub fn yes() -> Self {
        Self {
            yes: true,
            asked: Arc::default(),
        }
    }

    pub fn no() -> Self {
        Self {
            yes: false,
            asked: Arc::default(),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirmer for Answer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.yes
    }
}

#[derive(Clone)]
pub enum Scripted {
    Found(Vec<CookieRecord>),
    Fail,
    Hang,
}

/// Answers each lookup by cookie name from a fixed script; unknown names
/// find nothing.
#[derive(Default)]
pub struct FixedSource {
    script: HashMap<String, Scripted>,
}

impl FixedSource {
    pub fn with(mut self, name: &str, answer: Scripted) -> Self {
        self.script.insert(name.to_string(), answer);
        self
    }
}

#[async_trait::async_trait]
impl CookieSource for FixedSource {
    async fn get_all(&self, query: &CookieQuery) -> Result<Vec<CookieRecord>, LookupError> {
        match self.script.get(&query.name).cloned() {
            Some(Scripted::Found(cookies)) => {
                Ok(cookies.into_iter().filter(|c| query.matches(c)).collect())
            }
            Some(Scripted::Fail) => Err(LookupError::Join("scripted failure".into())),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Ok(Vec::new()),
        }
    }
}

/// Each lookup blocks until the test releases the gate for that cookie name.
#[derive(Default)]
pub struct GatedSource {
    gates: Mutex<HashMap<String, oneshot::Receiver<Vec<CookieRecord>>>>,
}

impl GatedSource {
    pub fn gate(&self, name: &str) -> oneshot::Sender<Vec<CookieRecord>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(name.to_string(), rx);
        tx
    }
}

#[async_trait::async_trait]
impl CookieSource for GatedSource {
    async fn get_all(&self, query: &CookieQuery) -> Result<Vec<CookieRecord>, LookupError> {
        let gate = self.gates.lock().unwrap().remove(&query.name);
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| LookupError::Join("gate dropped".into())),
            None => Ok(Vec::new()),
        }
    }
}
