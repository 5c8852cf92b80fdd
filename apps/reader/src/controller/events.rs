//! Events consumed by the UI loop.

use client_core::SyncEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Toggle,
    Redraw,
    Quit,
    Help,
}

impl UserCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "t" | "toggle" => Some(Self::Toggle),
            "r" | "redraw" | "" => Some(Self::Redraw),
            "q" | "quit" | "exit" => Some(Self::Quit),
            "h" | "help" | "?" => Some(Self::Help),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum UiEvent {
    Input(UserCommand),
    UnknownInput(String),
    /// Standard input closed.
    InputClosed,
    Sync(SyncEvent),
    BackendStartupFailed(String),
}
