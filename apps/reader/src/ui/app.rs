//! The UI loop: the single consumer of [`UiEvent`]s and the only writer of
//! the display mode.

use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::{Context, Result};
use client_core::SharedContentStore;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::{BackendCommand, SyncTarget};
use crate::config::Settings;
use crate::controller::{
    events::{UiEvent, UserCommand},
    orchestration::dispatch_backend_command,
    reducer::{reduce, Effect},
};
use crate::ui::view::{render, write_view};

const HELP: &str = "commands: t = toggle excerpt/full, r = redraw, h = help, q = quit";

pub struct ReaderApp {
    store: SharedContentStore,
    cmd_tx: Sender<BackendCommand>,
    settings: Settings,
    status: String,
}

impl ReaderApp {
    pub fn new(
        store: SharedContentStore,
        cmd_tx: Sender<BackendCommand>,
        settings: Settings,
    ) -> Self {
        Self {
            store,
            cmd_tx,
            settings,
            status: String::new(),
        }
    }

    /// Draws the current state, starts the sync, then applies events until
    /// the user quits or every sender is gone.
    pub fn run(&mut self, ui_rx: Receiver<UiEvent>, out: &mut impl Write) -> Result<()> {
        self.redraw(out)?;

        if let Some(target) = self.sync_target() {
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::StartSync {
                    target,
                    options: self.settings.sync_options(),
                },
                &mut self.status,
            );
            self.report_status(out)?;
        }

        while let Ok(event) = ui_rx.recv() {
            match reduce(&self.store, event) {
                Effect::None => {}
                Effect::Redraw => self.redraw(out)?,
                Effect::ShowHelp => {
                    writeln!(out, "{HELP}").context("failed to write help")?;
                }
                Effect::Quit => break,
            }
        }

        dispatch_backend_command(&self.cmd_tx, BackendCommand::Shutdown, &mut self.status);
        Ok(())
    }

    /// A bad endpoint leaves the current posts on screen, like any other
    /// failed sync.
    fn sync_target(&self) -> Option<SyncTarget> {
        if self.settings.offline {
            tracing::info!("offline mode; loading bundled posts only");
            return Some(SyncTarget::Bundled);
        }
        match self.settings.endpoint_url() {
            Ok(endpoint) => Some(SyncTarget::Remote(endpoint)),
            Err(err) => {
                tracing::warn!("post sync skipped: {err:#}");
                None
            }
        }
    }

    fn redraw(&self, out: &mut impl Write) -> Result<()> {
        let view = self.store.with_snapshot(|posts, mode| render(posts, mode));
        writeln!(out).context("failed to write view")?;
        write_view(&view, out).context("failed to write view")
    }

    fn report_status(&mut self, out: &mut impl Write) -> Result<()> {
        if !self.status.is_empty() {
            writeln!(out, "{}", self.status).context("failed to write status")?;
            self.status.clear();
        }
        Ok(())
    }
}

/// Reads commands from stdin on a dedicated thread and forwards them to the
/// UI loop.
pub fn spawn_input_reader(ui_tx: Sender<UiEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let event = match line {
                Ok(line) => match UserCommand::parse(&line) {
                    Some(command) => UiEvent::Input(command),
                    None => UiEvent::UnknownInput(line),
                },
                Err(err) => {
                    tracing::warn!("failed to read stdin: {err}");
                    break;
                }
            };
            let quit = matches!(event, UiEvent::Input(UserCommand::Quit));
            if ui_tx.send(event).is_err() || quit {
                return;
            }
        }
        let _ = ui_tx.send(UiEvent::InputClosed);
    })
}

#[cfg(test)]
mod tests {
    use client_core::{ContentStore, SyncEvent};
    use crossbeam_channel::bounded;
    use shared::domain::{ContentObject, Post, PostId};

    use super::*;

    fn offline_settings() -> Settings {
        Settings {
            offline: true,
            ..Settings::default()
        }
    }

    #[test]
    fn offline_session_renders_toggles_and_quits() {
        let store = SharedContentStore::seeded();
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(4);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(8);
        ui_tx.send(UiEvent::Input(UserCommand::Toggle)).unwrap();
        ui_tx.send(UiEvent::Input(UserCommand::Quit)).unwrap();

        let mut out = Vec::new();
        let mut app = ReaderApp::new(store.clone(), cmd_tx, offline_settings());
        app.run(ui_rx, &mut out).expect("run");

        let text = String::from_utf8(out).expect("utf8");
        let before = text.find("[t] Show full posts").expect("initial view");
        let after = text.find("[t] Show excerpts").expect("toggled view");
        assert!(before < after);
        assert!(store.display_mode().is_full());
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::StartSync {
                target: SyncTarget::Bundled,
                ..
            })
        ));
        assert!(matches!(cmd_rx.try_recv(), Ok(BackendCommand::Shutdown)));
    }

    #[test]
    fn invalid_endpoint_keeps_the_seed_on_screen() {
        let store = SharedContentStore::seeded();
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(4);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(8);
        ui_tx.send(UiEvent::Input(UserCommand::Help)).unwrap();
        ui_tx.send(UiEvent::Input(UserCommand::Quit)).unwrap();

        let settings = Settings {
            endpoint: "not a url".to_string(),
            ..Settings::default()
        };
        let mut out = Vec::new();
        let mut app = ReaderApp::new(store, cmd_tx, settings);
        app.run(ui_rx, &mut out).expect("bad endpoint is not fatal");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Hello World"));
        assert!(text.contains("h = help"));
        assert!(matches!(cmd_rx.try_recv(), Ok(BackendCommand::Shutdown)));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn online_session_queues_sync_and_redraws_on_commit() {
        let store = SharedContentStore::new(ContentStore::new());
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(4);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(8);

        // Stand-in for the backend worker committing a fetched list.
        store.replace_posts(vec![Post {
            id: PostId(7),
            title: ContentObject::rendered("Fetched"),
            content: ContentObject::rendered("<p>Body</p>"),
            excerpt: ContentObject::rendered("<p>Short</p>"),
            date: "2019-05-01T12:00:00".to_string(),
        }]);
        ui_tx
            .send(UiEvent::Sync(SyncEvent::Committed {
                generation: 1,
                post_count: 1,
            }))
            .unwrap();
        drop(ui_tx);

        let mut out = Vec::new();
        let mut app = ReaderApp::new(store, cmd_tx, Settings::default());
        app.run(ui_rx, &mut out).expect("run");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Fetched"));
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::StartSync {
                target: SyncTarget::Remote(_),
                ..
            })
        ));
        assert!(matches!(cmd_rx.try_recv(), Ok(BackendCommand::Shutdown)));
    }
}
