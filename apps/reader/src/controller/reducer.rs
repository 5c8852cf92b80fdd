//! Applies UI events to the store. The UI loop is the only caller, so toggle
//! writes never race each other.

use client_core::{SharedContentStore, SyncEvent};

use crate::controller::events::{UiEvent, UserCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Redraw,
    ShowHelp,
    Quit,
}

pub fn reduce(store: &SharedContentStore, event: UiEvent) -> Effect {
    match event {
        UiEvent::Input(UserCommand::Toggle) => {
            let next = store.display_mode().toggled();
            store.set_display_mode(next);
            Effect::Redraw
        }
        UiEvent::Input(UserCommand::Redraw) => Effect::Redraw,
        UiEvent::Input(UserCommand::Help) => Effect::ShowHelp,
        UiEvent::Input(UserCommand::Quit) | UiEvent::InputClosed => Effect::Quit,
        UiEvent::UnknownInput(line) => {
            tracing::debug!(input = %line.trim(), "unrecognized command");
            Effect::ShowHelp
        }
        UiEvent::Sync(SyncEvent::Committed { post_count, .. }) => {
            tracing::debug!(post_count, "redrawing with fetched posts");
            Effect::Redraw
        }
        // Failures stay invisible: the current list remains on screen.
        UiEvent::Sync(SyncEvent::Failed { kind, .. }) => {
            tracing::debug!(kind = kind.label(), "sync failed; keeping current view");
            Effect::None
        }
        UiEvent::Sync(_) => Effect::None,
        UiEvent::BackendStartupFailed(message) => {
            tracing::error!("backend worker startup failure: {message}");
            Effect::None
        }
    }
}
