use cookiejar_core::{WatchSpecFields, WatchSpecId};

/// Inbound user actions on the editor surface.
#[derive(Debug, Clone)]
pub enum EditorCommand {
    // Boot
    Load,

    // Dialog lifecycle
    BeginAdd,
    BeginEdit(WatchSpecId),
    Submit(WatchSpecFields),
    Cancel,

    // Rows
    Delete(WatchSpecId),
}
