use crate::protocol::{self, HostRequest, InboundMessage, ProtocolError};
use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to planet at {}: {source}. Is planet running?", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("Connection closed before anything was selected")]
    Closed,
}

pub struct Client {
    stream: UnixStream,
}

impl Client {
    pub fn connect(path: &Path) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(path).map_err(|source| ClientError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { stream })
    }

    pub fn send(&mut self, message: &InboundMessage) -> Result<(), ClientError> {
        let line = protocol::encode_line(message)?;
        self.stream.write_all(line.as_bytes())?;
        self.stream.flush()?;
        Ok(())
    }

    /// Selections reported by the overlay, in order, until it hangs up.
    /// Lines that are not selections are skipped.
    pub fn selections(self) -> impl Iterator<Item = Result<HostRequest, ClientError>> {
        BufReader::new(self.stream)
            .lines()
            .filter_map(|line| match line {
                Ok(line) => match protocol::parse_request(line.trim()) {
                    Ok(request) => Some(Ok(request)),
                    Err(e) => {
                        log::warn!("Ignoring unexpected line from planet: {}", e);
                        None
                    }
                },
                Err(e) => Some(Err(ClientError::from(e))),
            })
    }

    pub fn wait_for_selection(self) -> Result<HostRequest, ClientError> {
        self.selections().next().unwrap_or(Err(ClientError::Closed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_error_names_the_socket() {
        let path = Path::new("/nonexistent/planet-test.sock");
        let err = Client::connect(path).err().unwrap();
        assert!(matches!(err, ClientError::Connect { .. }));
        assert!(err.to_string().contains("/nonexistent/planet-test.sock"));
    }

    #[test]
    fn reads_selections_from_the_stream() {
        let (ours, mut theirs) = UnixStream::pair().unwrap();
        theirs
            .write_all(b"noise\n{\"request\":\"planetClick\",\"data\":4}\n")
            .unwrap();
        drop(theirs);

        let client = Client { stream: ours };
        assert_eq!(
            client.wait_for_selection().unwrap(),
            HostRequest::PlanetClick(4)
        );
    }

    #[test]
    fn hang_up_without_selection_is_reported() {
        let (ours, theirs) = UnixStream::pair().unwrap();
        drop(theirs);
        let client = Client { stream: ours };
        assert!(matches!(
            client.wait_for_selection(),
            Err(ClientError::Closed)
        ));
    }
}
