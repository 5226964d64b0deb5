//! Backend worker: owns the tokio runtime and the remote inventory, runs one
//! command at a time and reports back with `UiEvent`s.

use std::thread;

use client_core::{ClientConfig, ConfigError, InventoryStore, RemoteInventory};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    config: Result<ClientConfig, ConfigError>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                report_startup_failure(&ui_tx, format!("failed to build runtime: {err}"));
                return;
            }
        };

        let store = match config
            .map_err(|err| err.to_string())
            .and_then(|config| {
                tracing::info!(
                    project_url = %config.project_url,
                    table = %config.table,
                    "connecting to remote inventory"
                );
                RemoteInventory::from_config(&config).map_err(|err| err.to_string())
            }) {
            Ok(store) => store,
            Err(err) => {
                report_startup_failure(&ui_tx, err);
                return;
            }
        };

        let _ = ui_tx.send(UiEvent::Info(format!(
            "Connected to table '{}'",
            store.table()
        )));
        runtime.block_on(run(&store, cmd_rx, ui_tx));
        tracing::info!("backend worker stopped");
    });
}

fn report_startup_failure(ui_tx: &Sender<UiEvent>, message: String) {
    tracing::error!("backend worker startup failure: {message}");
    let _ = ui_tx.send(UiEvent::Error(UiError::from_message(
        UiErrorContext::BackendStartup,
        message,
    )));
}

/// Drains commands until the UI side hangs up.
pub async fn run<S: InventoryStore + ?Sized>(
    store: &S,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        for event in handle_command(store, cmd).await {
            if ui_tx.send(event).is_err() {
                return;
            }
        }
    }
}

/// Runs one command. Creates and updates are always followed by a refresh,
/// failed or not; a delete refreshes only when it succeeded.
pub async fn handle_command<S: InventoryStore + ?Sized>(
    store: &S,
    cmd: BackendCommand,
) -> Vec<UiEvent> {
    let cmd_name = cmd.name();
    tracing::debug!(command = cmd_name, "running backend command");

    let mut events = Vec::new();
    match cmd {
        BackendCommand::RefreshItems => {}
        BackendCommand::CreateItem { draft } => {
            if let Err(err) = store.create_item(&draft).await {
                events.push(failure(UiErrorContext::CreateItem, err));
            }
        }
        BackendCommand::UpdateItem { id, draft } => {
            if let Err(err) = store.update_item(&id, &draft).await {
                events.push(failure(UiErrorContext::UpdateItem, err));
            }
        }
        BackendCommand::DeleteItem { id } => {
            if let Err(err) = store.delete_item(&id).await {
                events.push(failure(UiErrorContext::DeleteItem, err));
                return events;
            }
        }
    }

    events.push(match store.list_items().await {
        Ok(items) => UiEvent::ItemsLoaded(items),
        Err(err) => failure(UiErrorContext::LoadItems, err),
    });
    events
}

fn failure(context: UiErrorContext, err: client_core::ClientError) -> UiEvent {
    tracing::warn!(context = ?context, error = %err, "remote inventory call failed");
    UiEvent::Error(UiError::from_message(context, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use client_core::{ClientError, StatusCode};
    use shared::domain::{Item, ItemDraft, ItemId};
    use tokio::sync::Mutex;

    /// In-memory table that records calls and can be told to fail writes.
    #[derive(Default)]
    struct FakeInventory {
        rows: Mutex<Vec<Item>>,
        calls: Mutex<Vec<&'static str>>,
        fail_writes: Option<String>,
        fail_reads: Option<String>,
    }

    impl FakeInventory {
        fn failing_writes(message: &str) -> Self {
            Self {
                fail_writes: Some(message.to_string()),
                ..Self::default()
            }
        }

        fn write_result(&self) -> Result<(), ClientError> {
            match &self.fail_writes {
                Some(message) => Err(ClientError::api(StatusCode::BAD_REQUEST, message.clone())),
                None => Ok(()),
            }
        }

        async fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl InventoryStore for FakeInventory {
        async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
            self.calls.lock().await.push("list");
            if let Some(message) = &self.fail_reads {
                return Err(ClientError::api(StatusCode::BAD_GATEWAY, message.clone()));
            }
            let mut rows = self.rows.lock().await.clone();
            rows.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(rows)
        }

        async fn create_item(&self, draft: &ItemDraft) -> Result<(), ClientError> {
            self.calls.lock().await.push("create");
            self.write_result()?;
            let mut rows = self.rows.lock().await;
            let next_id = rows.iter().filter_map(|row| row.id.as_i64()).max().unwrap_or(0) + 1;
            rows.push(Item {
                id: ItemId::Int(next_id),
                name: draft.name.clone(),
                quantity: draft.quantity.clone(),
                created_at: None,
            });
            Ok(())
        }

        async fn update_item(&self, id: &ItemId, draft: &ItemDraft) -> Result<(), ClientError> {
            self.calls.lock().await.push("update");
            self.write_result()?;
            if let Some(row) = self.rows.lock().await.iter_mut().find(|row| &row.id == id) {
                row.name = draft.name.clone();
                row.quantity = draft.quantity.clone();
            }
            Ok(())
        }

        async fn delete_item(&self, id: &ItemId) -> Result<(), ClientError> {
            self.calls.lock().await.push("delete");
            self.write_result()?;
            self.rows.lock().await.retain(|row| &row.id != id);
            Ok(())
        }
    }

    fn loaded_names(events: &[UiEvent]) -> Vec<String> {
        match events.last() {
            Some(UiEvent::ItemsLoaded(items)) => items.iter().map(|i| i.name.clone()).collect(),
            other => panic!("expected ItemsLoaded last, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn successful_insert_is_followed_by_list_containing_new_entry() {
        let store = FakeInventory::default();
        let events = handle_command(
            &store,
            BackendCommand::CreateItem {
                draft: ItemDraft::new("Rice", "1kg"),
            },
        )
        .await;

        assert_eq!(events.len(), 1);
        assert_eq!(loaded_names(&events), ["Rice"]);
        assert_eq!(store.calls().await, ["create", "list"]);
    }

    #[tokio::test]
    async fn failed_create_alerts_and_still_refreshes() {
        let store = FakeInventory::failing_writes("duplicate key value");
        let events = handle_command(
            &store,
            BackendCommand::CreateItem {
                draft: ItemDraft::new("Rice", "1kg"),
            },
        )
        .await;

        assert_eq!(events.len(), 2);
        match &events[0] {
            UiEvent::Error(err) => {
                assert_eq!(err.title(), "Error creating");
                assert_eq!(err.message(), "duplicate key value");
            }
            other => panic!("expected alert, got {other:?}"),
        }
        assert!(loaded_names(&events).is_empty());
        assert_eq!(store.calls().await, ["create", "list"]);
    }

    #[tokio::test]
    async fn failed_update_alerts_and_still_refreshes() {
        let store = FakeInventory::failing_writes("permission denied");
        let events = handle_command(
            &store,
            BackendCommand::UpdateItem {
                id: ItemId::Int(4),
                draft: ItemDraft::new("Rice", "2kg"),
            },
        )
        .await;

        assert!(matches!(&events[0], UiEvent::Error(err) if err.context() == UiErrorContext::UpdateItem));
        assert_eq!(store.calls().await, ["update", "list"]);
    }

    #[tokio::test]
    async fn failed_delete_alerts_without_refresh() {
        let store = FakeInventory::failing_writes("row is locked");
        let events = handle_command(&store, BackendCommand::DeleteItem { id: ItemId::Int(1) }).await;

        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], UiEvent::Error(err) if err.title() == "Error deleting"));
        assert_eq!(store.calls().await, ["delete"]);
    }

    #[tokio::test]
    async fn successful_delete_and_update_refresh_from_store() {
        let store = FakeInventory::default();
        for name in ["Rice", "Beans"] {
            handle_command(
                &store,
                BackendCommand::CreateItem {
                    draft: ItemDraft::new(name, "1"),
                },
            )
            .await;
        }

        let events = handle_command(
            &store,
            BackendCommand::UpdateItem {
                id: ItemId::Int(1),
                draft: ItemDraft::new("Brown rice", "1"),
            },
        )
        .await;
        assert_eq!(loaded_names(&events), ["Beans", "Brown rice"]);

        let events = handle_command(&store, BackendCommand::DeleteItem { id: ItemId::Int(2) }).await;
        assert_eq!(loaded_names(&events), ["Brown rice"]);
    }

    #[tokio::test]
    async fn failed_refresh_raises_loading_alert() {
        let store = FakeInventory {
            fail_reads: Some("network unreachable".to_string()),
            ..FakeInventory::default()
        };
        let events = handle_command(&store, BackendCommand::RefreshItems).await;
        assert_eq!(
            events,
            vec![UiEvent::Error(UiError::from_message(
                UiErrorContext::LoadItems,
                "network unreachable"
            ))]
        );
    }

    #[tokio::test]
    async fn run_processes_commands_in_order_until_ui_hangs_up() {
        let store = FakeInventory::default();
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(8);
        let (ui_tx, ui_rx) = crossbeam_channel::bounded(8);

        cmd_tx.send(BackendCommand::RefreshItems).expect("queue");
        cmd_tx
            .send(BackendCommand::CreateItem {
                draft: ItemDraft::new("Salt", "500g"),
            })
            .expect("queue");
        drop(cmd_tx);

        run(&store, cmd_rx, ui_tx).await;

        let events: Vec<UiEvent> = ui_rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(loaded_names(&events[..1]), Vec::<String>::new());
        assert_eq!(loaded_names(&events), ["Salt"]);
    }
}
