use cookiejar_core::{DisplayRecord, WatchList};

use crate::domain::{AppSettings, EditDialog};

pub trait SettingsRepo: Send + Sync + 'static {
    fn load(&self) -> anyhow::Result<AppSettings>;
    fn save(&self, settings: &AppSettings) -> anyhow::Result<()>;
}

/// Rendering sink for both surfaces.
pub trait Presenter: Send + Sync + 'static {
    fn render_watch_list(&self, list: &WatchList);

    fn render_cookies(&self, records: &[DisplayRecord]);

    fn show_error(&self, message: &str);

    fn open_dialog(&self, _dialog: &EditDialog) {}

    fn close_dialog(&self) {}
}

/// Blocking yes/no gate in front of destructive actions.
pub trait Confirmer: Send + Sync + 'static {
    fn confirm(&self, prompt: &str) -> bool;
}
