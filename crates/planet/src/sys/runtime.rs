use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use planetctl::protocol::HostRequest;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the socket server and the config watcher on their own thread. Events
/// reach the UI through `tx`; selections made in the UI arrive on `selections`.
pub fn start_background_services(
    tx: Sender<AppEvent>,
    selections: Receiver<HostRequest>,
    socket_path: PathBuf,
) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(socket_path, tx, selections).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
