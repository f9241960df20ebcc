//! Minimal blocking Redis client implementation
//!
//! Provides a blocking connect and methods for issuing the supported commands.

use crate::clients::Client;
use crate::cmd::Protocol;
use crate::Frame;
use bytes::Bytes;
use tokio::net::ToSocketAddrs;
use tokio::runtime::Runtime;

/// Established connection with a Redis server.
///
/// Backed by a single `TcpStream` and a `current_thread` Tokio runtime used
/// to drive the async [`Client`]. Its methods must not be called from within
/// another Tokio runtime.
#[derive(Debug)]
pub struct BlockingClient {
    /// The asynchronous `Client`.
    inner: Client,

    /// A `current_thread` runtime for executing operations on the asynchronous
    /// client in a blocking manner.
    rt: Runtime,
}

impl BlockingClient {
    /// Establish a connection with the Redis server located at `addr`.
    pub fn connect<T: ToSocketAddrs>(addr: T) -> crate::Result<BlockingClient> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        // Call the asynchronous connect method using the runtime.
        let inner = rt.block_on(Client::connect(addr))?;

        Ok(BlockingClient { inner, rt })
    }

    /// [Ping](crate::cmd::Ping) the server.
    pub fn ping(&mut self, msg: Option<Bytes>) -> crate::Result<Bytes> {
        self.rt.block_on(self.inner.ping(msg))
    }

    /// Buffer `cmd` until the next [`sync_commit`](BlockingClient::sync_commit).
    pub fn queue(&mut self, cmd: impl Protocol) -> crate::Result<()> {
        self.rt.block_on(self.inner.queue(cmd))
    }

    /// Send every queued command and block until all of their replies arrived.
    ///
    /// See [`Client::commit`].
    pub fn sync_commit(&mut self) -> crate::Result<Vec<Frame>> {
        self.rt.block_on(self.inner.commit())
    }
}
