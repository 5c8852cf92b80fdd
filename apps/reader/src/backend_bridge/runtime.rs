//! Backend worker: owns the tokio runtime and the in-flight sync, and feeds
//! sync events back into the UI loop.

use std::{sync::Arc, thread};

use client_core::{
    seed_posts, SharedContentStore, StaticPostSource, SyncController, SyncEvent, SyncHandle,
    SyncOptions,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::{BackendCommand, SyncTarget};
use crate::controller::events::UiEvent;

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    store: SharedContentStore,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendStartupFailed(format!(
                    "failed to build backend runtime: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let mut active: Option<SyncHandle> = None;
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::StartSync { target, options } => {
                        if let Some(previous) = active.take() {
                            previous.cancel();
                        }
                        let controller = build_controller(target, options);
                        tokio::spawn(forward_sync_events(
                            controller.subscribe_events(),
                            ui_tx.clone(),
                        ));
                        match controller.start(&store) {
                            Ok(handle) => active = Some(handle),
                            Err(err) => tracing::warn!("post sync not started: {err}"),
                        }
                    }
                    BackendCommand::Shutdown => {
                        if let Some(handle) = active.take() {
                            handle.cancel();
                        }
                        break;
                    }
                }
            }
            tracing::debug!("backend worker stopped");
        });
    })
}

fn build_controller(target: SyncTarget, options: SyncOptions) -> SyncController {
    match target {
        SyncTarget::Remote(endpoint) => SyncController::new(endpoint, options),
        SyncTarget::Bundled => SyncController::with_source(
            Arc::new(StaticPostSource::new(seed_posts())),
            options,
        ),
    }
}

async fn forward_sync_events(mut events: broadcast::Receiver<SyncEvent>, ui_tx: Sender<UiEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => match ui_tx.try_send(UiEvent::Sync(event)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("ui event queue full; dropped sync event")
                }
                Err(TrySendError::Disconnected(_)) => return,
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "sync event forwarder lagged");
            }
            Err(RecvError::Closed) => return,
        }
    }
}
