use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use duadeck_core::{ColumnOverride, FailureKind, LoadedDocument, RequestId};
use engine_logging::{engine_debug, engine_error};

use crate::Loader;

enum EngineCommand {
    Open {
        request_id: RequestId,
        document_id: String,
        columns: Option<ColumnOverride>,
    },
    Reload {
        request_id: RequestId,
    },
}

impl EngineCommand {
    fn request_id(&self) -> RequestId {
        match self {
            EngineCommand::Open { request_id, .. } | EngineCommand::Reload { request_id } => {
                *request_id
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Loaded {
        request_id: RequestId,
        result: Result<LoadedDocument, FailureKind>,
    },
}

/// Runs loads on a background tokio runtime; results come back as events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(loader: Loader) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let loader = Arc::new(loader);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start engine runtime: {}", err);
                    reject_all(cmd_rx, event_tx, err.to_string());
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let loader = loader.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(loader.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn open(
        &self,
        request_id: RequestId,
        document_id: impl Into<String>,
        columns: Option<ColumnOverride>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::Open {
            request_id,
            document_id: document_id.into(),
            columns,
        });
    }

    pub fn reload(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::Reload { request_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(loader: &Loader, command: EngineCommand, event_tx: mpsc::Sender<EngineEvent>) {
    let request_id = command.request_id();
    let result = match command {
        EngineCommand::Open {
            document_id,
            columns,
            ..
        } => loader.open(&document_id, columns).await,
        EngineCommand::Reload { .. } => loader.reload().await,
    };
    engine_debug!("Request {} finished ok={}", request_id, result.is_ok());
    let _ = event_tx.send(EngineEvent::Loaded { request_id, result });
}

fn reject_all(
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    reason: String,
) {
    while let Ok(command) = cmd_rx.recv() {
        let _ = event_tx.send(EngineEvent::Loaded {
            request_id: command.request_id(),
            result: Err(FailureKind::Unknown(reason.clone())),
        });
    }
}
