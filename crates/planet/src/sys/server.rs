use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use planetctl::protocol::{self, HostRequest, ProtocolError};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast::{self, error::RecvError};

const OUTBOUND_CAPACITY: usize = 16;

/// Turns one line from a host into an event. Bad lines are logged and dropped
/// so the menu keeps whatever it was showing.
pub fn parse_event(line: &str) -> Option<AppEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match protocol::parse_inbound(line) {
        Ok(message) => Some(AppEvent::from(message)),
        Err(ProtocolError::UnknownAction(action)) => {
            log::debug!("Ignoring unknown action '{}'", action);
            None
        }
        Err(e) => {
            log::warn!("Dropping malformed message: {}", e);
            None
        }
    }
}

pub async fn run_server(
    socket_path: PathBuf,
    tx: Sender<AppEvent>,
    selections: Receiver<HostRequest>,
) {
    // Cleanup old socket if it exists
    if fs_err::metadata(&socket_path).is_ok() {
        let _ = fs_err::remove_file(&socket_path);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!(
                "Failed to bind unix socket {}: {}",
                socket_path.display(),
                e
            );
            return;
        }
    };
    log::info!("Listening on {}", socket_path.display());

    let (outbound, _) = broadcast::channel(OUTBOUND_CAPACITY);
    {
        let outbound = outbound.clone();
        tokio::spawn(async move {
            while let Ok(request) = selections.recv().await {
                if outbound.send(request).is_err() {
                    log::warn!("No host connected to receive {:?}", request);
                }
            }
        });
    }

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                tokio::spawn(handle_client(stream, tx.clone(), outbound.subscribe()));
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Feeds a client's lines to the UI and writes every selection back to it.
/// The connection is dropped as soon as the client stops sending.
async fn handle_client(
    stream: UnixStream,
    tx: Sender<AppEvent>,
    mut outbound: broadcast::Receiver<HostRequest>,
) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(event) = parse_event(&line)
                        && tx.send(event).await.is_err()
                    {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::error!("Failed to read from client: {}", e);
                    break;
                }
            },
            request = outbound.recv() => match request {
                Ok(request) => {
                    let line = match protocol::encode_line(&request) {
                        Ok(line) => line,
                        Err(e) => {
                            log::error!("Failed to encode {:?}: {}", request, e);
                            continue;
                        }
                    };
                    if writer.write_all(line.as_bytes()).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    log::warn!("Client fell behind, {} selections dropped", missed);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    #[test]
    fn open_line_becomes_open_event() {
        let line = r#"{"action":"openPlanetMenu","data":{"items":[{"icon":"palette","label":"Paint"}],"sub":false}}"#;
        match parse_event(line) {
            Some(AppEvent::Open(payload)) => {
                assert_eq!(payload.items.len(), 1);
                assert_eq!(payload.sub, Some(false));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn close_line_becomes_hide() {
        assert!(matches!(
            parse_event("{\"action\":\"closePlanetMenu\"}\n"),
            Some(AppEvent::Hide)
        ));
    }

    #[test]
    fn bad_lines_are_dropped() {
        assert!(parse_event("").is_none());
        assert!(parse_event("   ").is_none());
        assert!(parse_event("show").is_none());
        assert!(parse_event(r#"{"action":"openPlanetMenu","data":{}}"#).is_none());
        assert!(parse_event(r#"{"action":"somethingElse"}"#).is_none());
    }

    async fn connect(path: &std::path::Path) -> UnixStream {
        for _ in 0..50 {
            if let Ok(stream) = UnixStream::connect(path).await {
                return stream;
            }
            sleep(Duration::from_millis(20)).await;
        }
        panic!("server never came up at {}", path.display());
    }

    #[tokio::test]
    async fn round_trip_through_the_socket() {
        let path = std::env::temp_dir().join(format!("planet-test-{}.sock", std::process::id()));
        let (event_tx, event_rx) = async_channel::bounded(4);
        let (selection_tx, selection_rx) = async_channel::unbounded();
        tokio::spawn(run_server(path.clone(), event_tx, selection_rx));

        let stream = connect(&path).await;
        let (reader, mut writer) = stream.into_split();
        writer
            .write_all(b"{\"action\":\"openPlanetMenu\",\"data\":{\"items\":[]}}\n")
            .await
            .unwrap();

        let event = timeout(Duration::from_secs(2), event_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, AppEvent::Open(p) if p.items.is_empty()));

        selection_tx.send(HostRequest::PlanetClick(1)).await.unwrap();
        let mut lines = BufReader::new(reader).lines();
        let line = timeout(Duration::from_secs(2), lines.next_line())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(line, r#"{"request":"planetClick","data":1}"#);

        let _ = fs_err::remove_file(&path);
    }

    #[tokio::test]
    async fn hung_up_clients_are_released() {
        let path = std::env::temp_dir().join(format!("planet-eof-{}.sock", std::process::id()));
        let (event_tx, event_rx) = async_channel::bounded(4);
        let (_selection_tx, selection_rx) = async_channel::unbounded();
        tokio::spawn(run_server(path.clone(), event_tx, selection_rx));

        let stream = connect(&path).await;
        let (reader, mut writer) = stream.into_split();
        writer
            .write_all(b"{\"action\":\"closePlanetMenu\"}\n")
            .await
            .unwrap();
        writer.shutdown().await.unwrap();

        let event = timeout(Duration::from_secs(2), event_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, AppEvent::Hide));

        // the server closes its end once it sees EOF
        let mut lines = BufReader::new(reader).lines();
        let end = timeout(Duration::from_secs(2), lines.next_line())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(end, None);

        let _ = fs_err::remove_file(&path);
    }
}
