use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::draft::AutosaveDebouncer;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization, the initial file read,
    /// or the event loop encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let (source, restored_draft) = self.load_initial_source()?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - tandem requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(self.file_path.clone(), &source, (size.width, size.height));
        model.view_mode = self.view;
        model.outline_visible = self.outline_visible;
        model.scroll_lock = self.scroll_lock;
        model.word_goal = self.word_goal;
        model.autosave_enabled = self.autosave_enabled;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model.apply_layout();
        model.refresh_preview();
        if restored_draft {
            model.dirty = true;
            model.show_toast(
                ToastLevel::Info,
                "Draft restored - Ctrl+S to keep it, Ctrl+Z to discard changes",
            );
        }

        execute!(stdout(), EnableMouseCapture)?;
        let result = Self::event_loop(&mut terminal, &mut model);
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    /// Read the document, preferring a draft sidecar written after the
    /// file's last modification. Returns the source text and whether a
    /// draft was restored.
    fn load_initial_source(&self) -> Result<(String, bool)> {
        let Some(path) = self.file_path.as_ref() else {
            return Ok((String::new(), false));
        };
        let file_text = if path.exists() {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            String::new()
        };
        if self.autosave_enabled
            && let Some(draft) = crate::draft::load(&crate::draft::sidecar_path(path))?
            && crate::draft::is_newer_than_file(&draft, path)
            && draft.text != file_text
        {
            return Ok((draft.text, true));
        }
        Ok((file_text, false))
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut autosave = AutosaveDebouncer::default();
        let mut needs_render = true;

        loop {
            let now = Instant::now();

            // Release the sync re-entrancy lock once its window has passed.
            model.sync.on_tick(now);

            if model.expire_toast(now) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            // Trailing edge of the scroll-sync throttles.
            if model.sync.source_throttle.take_trailing(now) {
                *model = update(std::mem::take(model), Message::SyncFromSource(now));
                needs_render = true;
            }
            if model.sync.preview_throttle.take_trailing(now) {
                *model = update(std::mem::take(model), Message::SyncFromPreview(now));
                needs_render = true;
            }

            // Flush a queued draft once the buffer has been quiet.
            if autosave.take_ready(now_ms) {
                Self::write_draft(model);
                needs_render = true;
            }

            let waiting = resize_debouncer.is_pending()
                || autosave.is_pending()
                || model.sync.source_throttle.has_trailing()
                || model.sync.preview_throttle.has_trailing();
            let poll_ms = if needs_render {
                0
            } else if waiting {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamps after the poll wait so debouncers and
                // throttles see accurate event times.
                let event_now = Instant::now();
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let msg = Self::handle_event(
                    event::read()?,
                    model,
                    event_now,
                    event_ms,
                    &mut resize_debouncer,
                );
                if let Some(msg) = msg {
                    Self::dispatch(model, msg, event_ms, &mut autosave);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    let drain_now = Instant::now();
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg = Self::handle_event(
                        event::read()?,
                        model,
                        drain_now,
                        drain_ms,
                        &mut resize_debouncer,
                    );
                    if let Some(msg) = msg {
                        Self::dispatch(model, msg, drain_ms, &mut autosave);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(model: &mut Model, msg: Message, now_ms: u64, autosave: &mut AutosaveDebouncer) {
        let edits = msg.edits_buffer();
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, autosave, &side_msg);
        if edits && model.autosave_enabled {
            autosave.queue(now_ms);
        }
    }
}
