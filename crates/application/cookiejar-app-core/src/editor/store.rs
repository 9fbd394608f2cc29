use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::EditorState;

use super::{events::EditorEvent, reducer::reduce};

#[derive(Clone)]
pub struct EditorStore {
    inner: Arc<Mutex<EditorState>>,
}

impl EditorStore {
    pub fn new(state: EditorState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> EditorState {
        self.lock().clone()
    }

    pub fn apply(&self, ev: EditorEvent) {
        let mut guard = self.lock();
        let next = reduce(guard.clone(), ev);
        *guard = next;
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorState::default())
    }
}
