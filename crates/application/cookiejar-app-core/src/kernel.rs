use std::sync::Arc;

use cookiejar_core::{
    DeletePolicy, MutationError, NotFound, ValidationError, WatchList, WatchSpec, WatchSpecFields,
};
use cookiejar_persistence::StorageError;
use tracing::{debug, info};

use crate::domain::EditorMode;
use crate::editor::{EditorCommand, EditorEvent, EditorStore};
use crate::ports::{Confirmer, Presenter};
use crate::watchlist_store::WatchListStore;

/// Source of millisecond timestamps for new ids.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp_millis())
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error("no edit dialog is open")]
    NoOpenDialog,
    #[error("watch-list storage failed: {0}")]
    Persistence(#[from] StorageError),
}

impl From<MutationError> for EditorError {
    fn from(value: MutationError) -> Self {
        match value {
            MutationError::Invalid(e) => Self::Validation(e),
            MutationError::NotFound(e) => Self::NotFound(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { removed: Vec<WatchSpec> },
    Declined,
}

/// The editor surface: CRUD over its own copy of the watch-list, writing the
/// whole list back to the store after every successful mutation.
pub struct EditorKernel<P, C> {
    pub store: EditorStore,
    watch_list: WatchListStore,
    presenter: Arc<P>,
    confirmer: Arc<C>,
    delete_policy: DeletePolicy,
    clock: Clock,
}

impl<P, C> EditorKernel<P, C>
where
    P: Presenter,
    C: Confirmer,
{
    pub fn new(store: EditorStore, watch_list: WatchListStore, presenter: P, confirmer: C) -> Self {
        Self {
            store,
            watch_list,
            presenter: Arc::new(presenter),
            confirmer: Arc::new(confirmer),
            delete_policy: DeletePolicy::default(),
            clock: system_clock(),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn dispatch(&self, cmd: EditorCommand) -> Result<(), EditorError> {
        match cmd {
            EditorCommand::Load => self.load().await,
            EditorCommand::BeginAdd => {
                self.begin_add();
                Ok(())
            }
            EditorCommand::BeginEdit(id) => self.begin_edit(&id),
            EditorCommand::Submit(form) => self.submit(form).await.map(|_| ()),
            EditorCommand::Cancel => {
                self.cancel();
                Ok(())
            }
            EditorCommand::Delete(id) => self.delete(&id).await.map(|_| ()),
        }
    }

    pub async fn load(&self) -> Result<(), EditorError> {
        self.store.apply(EditorEvent::LoadStarted);
        match self.watch_list.load().await {
            Ok(list) => {
                self.store.apply(EditorEvent::ListLoaded(list.clone()));
                self.presenter.render_watch_list(&list);
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.store.apply(EditorEvent::LoadFailed {
                    message: message.clone(),
                });
                self.presenter.show_error(&message);
                Err(e.into())
            }
        }
    }

    pub fn begin_add(&self) {
        self.open_dialog(EditorMode::New, WatchSpecFields::default());
    }

    /// Opens the dialog pre-filled from the entry with `id` in the loaded list.
    pub fn begin_edit(&self, id: &str) -> Result<(), EditorError> {
        let spec = self.store.state().list.get(id).cloned();
        match spec {
            Some(spec) => {
                self.open_dialog(EditorMode::Edit(spec.id.clone()), spec.fields());
                Ok(())
            }
            None => Err(self.report(NotFound(id.to_string()).into())),
        }
    }

    pub fn cancel(&self) {
        self.store.apply(EditorEvent::DialogClosed);
        self.presenter.close_dialog();
    }

    pub async fn submit(&self, form: WatchSpecFields) -> Result<WatchSpec, EditorError> {
        let state = self.store.state();
        let dialog = state.dialog.ok_or(EditorError::NoOpenDialog)?;

        let fields = match form.validate() {
            Ok(fields) => fields,
            Err(e) => {
                self.store.apply(EditorEvent::FieldRejected(e.clone()));
                self.presenter.show_error(&e.to_string());
                return Err(e.into());
            }
        };

        let mut list = state.list;
        let saved = match &dialog.mode {
            EditorMode::New => list.append(&fields, (self.clock)())?.clone(),
            EditorMode::Edit(id) => match list.update(id, &fields) {
                Ok(spec) => spec.clone(),
                Err(e) => return Err(self.report(e.into())),
            },
        };

        self.persist(list).await?;
        self.store.apply(EditorEvent::DialogClosed);
        self.presenter.close_dialog();
        info!(id = %saved.id, name = %saved.name, mode = ?dialog.mode, "watch entry saved");
        Ok(saved)
    }

    /// Asks for confirmation, then removes the entry according to the
    /// configured delete policy.
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome, EditorError> {
        let state = self.store.state();
        let Some(target) = state.list.get(id).cloned() else {
            return Err(self.report(NotFound(id.to_string()).into()));
        };

        let prompt = format!("Delete watch entry '{}' ({})?", target.name, target.domain);
        if !self.confirmer.confirm(&prompt) {
            debug!(id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let mut list = state.list;
        let removed = list.delete(id, self.delete_policy)?;
        self.persist(list).await?;
        info!(
            id,
            removed = removed.len(),
            policy = ?self.delete_policy,
            "watch entries deleted"
        );
        Ok(DeleteOutcome::Deleted { removed })
    }

    fn open_dialog(&self, mode: EditorMode, form: WatchSpecFields) {
        self.store.apply(EditorEvent::DialogOpened { mode, form });
        if let Some(dialog) = self.store.state().dialog {
            self.presenter.open_dialog(&dialog);
        }
    }

    async fn persist(&self, list: WatchList) -> Result<(), EditorError> {
        if let Err(e) = self.watch_list.save(&list).await {
            return Err(self.report(e.into()));
        }
        self.store.apply(EditorEvent::ListPersisted(list.clone()));
        self.presenter.render_watch_list(&list);
        Ok(())
    }

    fn report(&self, err: EditorError) -> EditorError {
        let message = err.to_string();
        self.store.apply(EditorEvent::UserError(message.clone()));
        self.presenter.show_error(&message);
        err
    }
}
