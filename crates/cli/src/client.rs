// SPDX-License-Identifier: MIT

//! A short-lived connection to `secautod` over its Unix socket: one
//! request, one response, then disconnect. There is no persistent
//! connection pool — every command invocation dials the socket fresh.

use secauto_wire::{read_response, write_request, ProtocolError, Request, Response};
use tokio::net::UnixStream;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connecting to daemon at {path}: {source}")]
    Connect { path: String, #[source] source: std::io::Error },
    #[error("talking to daemon: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("daemon returned an error: {0}")]
    Daemon(String),
    #[error("daemon returned an unexpected response: {0:?}")]
    Unexpected(Response),
}

pub struct DaemonClient {
    socket_path: String,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<String>) -> Self {
        Self { socket_path: socket_path.into() }
    }

    async fn connect(&self) -> Result<UnixStream, ClientError> {
        UnixStream::connect(&self.socket_path)
            .await
            .map_err(|source| ClientError::Connect { path: self.socket_path.clone(), source })
    }

    /// Send `request` and return whatever the daemon answers, `Response::Error` included.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let mut stream = self.connect().await?;
        write_request(&mut stream, request).await?;
        Ok(read_response(&mut stream).await?)
    }

    /// Like [`Self::send`], but turns `Response::Error` into `Err`.
    pub async fn send_checked(&self, request: &Request) -> Result<Response, ClientError> {
        match self.send(request).await? {
            Response::Error { message } => Err(ClientError::Daemon(message)),
            other => Ok(other),
        }
    }

    /// Send a request that only ever answers `Ok` on success.
    pub async fn send_ok(&self, request: &Request) -> Result<(), ClientError> {
        match self.send_checked(request).await? {
            Response::Ok => Ok(()),
            other => Err(ClientError::Unexpected(other)),
        }
    }
}

pub(crate) fn reject<T>(response: Response) -> Result<T, ClientError> {
    match response {
        Response::Error { message } => Err(ClientError::Daemon(message)),
        other => Err(ClientError::Unexpected(other)),
    }
}
