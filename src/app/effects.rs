//! Side effects triggered by messages after the pure update has run.

use crate::app::{App, Message, Model, ToastLevel};
use crate::draft;

impl App {
    pub(super) fn handle_message_side_effects(
        model: &mut Model,
        autosave: &mut crate::draft::AutosaveDebouncer,
        msg: &Message,
    ) {
        match msg {
            Message::Save => {
                match model.save_to_disk() {
                    Ok(()) => {
                        // The saved file supersedes any pending draft.
                        autosave.cancel();
                        Self::remove_draft(model);
                        let name = model
                            .file_path
                            .as_ref()
                            .map_or_else(|| "buffer".to_string(), |p| p.display().to_string());
                        model.show_toast(ToastLevel::Info, format!("Saved {name}"));
                        // A save completes a pending confirmed quit.
                        if model.quit_confirmed {
                            model.should_quit = true;
                        }
                    }
                    Err(err) => {
                        model.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
                    }
                }
            }
            Message::NewDocument => {
                autosave.cancel();
                Self::remove_draft(model);
            }
            _ => {}
        }
    }

    /// Flush a queued draft once edits have paused.
    pub(super) fn write_draft(model: &mut Model) {
        let Some(path) = model.file_path.as_ref() else {
            return;
        };
        let sidecar = draft::sidecar_path(path);
        if let Err(err) = draft::save(&sidecar, &model.buffer.text()) {
            model.show_toast(ToastLevel::Warning, format!("Draft autosave failed: {err}"));
        }
    }

    fn remove_draft(model: &mut Model) {
        let Some(path) = model.file_path.as_ref() else {
            return;
        };
        let sidecar = draft::sidecar_path(path);
        if let Err(err) = draft::remove(&sidecar) {
            model.show_toast(ToastLevel::Warning, format!("Draft cleanup failed: {err}"));
        }
    }
}
