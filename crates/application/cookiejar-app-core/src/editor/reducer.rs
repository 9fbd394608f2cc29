use crate::domain::{BootState, EditDialog, EditorState};

use super::events::EditorEvent;

pub fn reduce(mut state: EditorState, ev: EditorEvent) -> EditorState {
    match ev {
        EditorEvent::LoadStarted => {
            state.boot = BootState::Loading;
        }

        EditorEvent::ListLoaded(list) => {
            state.list = list;
            state.boot = BootState::Ready;
        }

        EditorEvent::LoadFailed { message } => {
            state.boot = BootState::Failed(message);
        }

        EditorEvent::DialogOpened { mode, form } => {
            state.last_error = None;
            state.dialog = Some(EditDialog {
                mode,
                form,
                field_error: None,
            });
        }

        EditorEvent::FieldRejected(err) => {
            if let Some(dialog) = state.dialog.as_mut() {
                dialog.field_error = Some(err);
            }
        }

        EditorEvent::DialogClosed => state.dialog = None,

        EditorEvent::ListPersisted(list) => {
            state.list = list;
            state.last_error = None;
        }

        EditorEvent::UserError(msg) => {
            state.last_error = Some(msg);
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EditorMode;
    use cookiejar_core::{ValidationError, WatchList, WatchSpecFields};

    #[test]
    fn field_error_without_dialog_is_ignored() {
        let state = reduce(
            EditorState::default(),
            EditorEvent::FieldRejected(ValidationError::MissingName),
        );
        assert!(state.dialog.is_none());
    }

    #[test]
    fn reopening_dialog_clears_previous_field_error() {
        let mut state = reduce(
            EditorState::default(),
            EditorEvent::DialogOpened {
                mode: EditorMode::New,
                form: WatchSpecFields::default(),
            },
        );
        state = reduce(state, EditorEvent::FieldRejected(ValidationError::MissingDomain));
        assert_eq!(
            state.dialog.as_ref().unwrap().field_error,
            Some(ValidationError::MissingDomain)
        );

        state = reduce(
            state,
            EditorEvent::DialogOpened {
                mode: EditorMode::Edit("1".into()),
                form: WatchSpecFields::default(),
            },
        );
        let dialog = state.dialog.unwrap();
        assert_eq!(dialog.mode, EditorMode::Edit("1".into()));
        assert_eq!(dialog.field_error, None);
    }

    #[test]
    fn loaded_list_marks_ready() {
        let state = reduce(
            EditorState::default(),
            EditorEvent::ListLoaded(WatchList::builtin_default()),
        );
        assert_eq!(state.boot, BootState::Ready);
        assert_eq!(state.list, WatchList::builtin_default());
    }
}
