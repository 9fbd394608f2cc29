use cookiejar_core::{ValidationError, WatchList, WatchSpecFields};

use crate::domain::EditorMode;

#[derive(Debug, Clone)]
pub enum EditorEvent {
    // Boot state
    LoadStarted,
    ListLoaded(WatchList),
    LoadFailed { message: String },

    // Dialog lifecycle
    DialogOpened { mode: EditorMode, form: WatchSpecFields },
    FieldRejected(ValidationError),
    DialogClosed,

    // A full list was written to the store.
    ListPersisted(WatchList),

    // User-visible errors
    UserError(String),
}
