//! Redis client implementation
//!
//! Provides an async connect and methods for queueing commands and committing
//! them in one round trip.

use crate::cmd::{Ping, Protocol};
use crate::{Connection, Frame};
use bytes::Bytes;
use std::io::{Error, ErrorKind};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, instrument};

/// Backed by a single `TcpStream`.
///
/// Commands are queued into the connection's write buffer with
/// [`queue`](Client::queue) and sent together by [`commit`](Client::commit),
/// which then waits for one reply per queued command.
#[derive(Debug)]
pub struct Client {
    connection: Connection,

    /// Number of queued commands whose replies have not been read yet.
    pending: usize,
}

impl Client {
    /// Establish a connection with the Redis server located at `addr`.
    pub async fn connect<T: ToSocketAddrs>(addr: T) -> crate::Result<Client> {
        let stream = TcpStream::connect(addr).await?;
        let connection = Connection::new(stream);

        Ok(Client {
            connection,
            pending: 0,
        })
    }

    /// [Ping] to the server.
    ///
    /// Any command still queued is committed first, its replies are discarded.
    ///
    /// [Ping]: crate::cmd::Ping
    #[instrument(skip(self))]
    pub async fn ping(&mut self, msg: Option<Bytes>) -> crate::Result<Bytes> {
        if self.pending > 0 {
            self.commit().await?;
        }

        let frame = Ping::new(msg).into_frame();
        debug!(request = ?frame);
        self.connection.write_frame(&frame).await?;

        match self.read_response().await? {
            Frame::Simple(value) => Ok(value.into()),
            Frame::Bulk(value) => Ok(value),
            frame => Err(frame.to_error()),
        }
    }

    /// Buffer `cmd` without sending it.
    ///
    /// Nothing reaches the server until [`commit`](Client::commit) is called,
    /// unless the write buffer fills up.
    pub async fn queue(&mut self, cmd: impl Protocol) -> crate::Result<()> {
        let frame = cmd.into_frame();
        debug!(request = ?frame);

        self.connection.buffer_frame(&frame).await?;
        self.pending += 1;

        Ok(())
    }

    /// Flush every queued command and wait for their replies.
    ///
    /// Replies are returned in the order the commands were queued. Error
    /// replies are returned as `Frame::Error` rather than `Err`, so a single
    /// rejected command does not hide the replies of the others.
    ///
    /// # Errors
    ///
    /// I/O failures and the server closing the connection. The connection is
    /// out of sync afterwards and should be dropped.
    #[instrument(skip(self), fields(pending = self.pending))]
    pub async fn commit(&mut self) -> crate::Result<Vec<Frame>> {
        let pending = std::mem::take(&mut self.pending);

        self.connection.flush().await?;

        let mut replies = Vec::with_capacity(pending);
        for _ in 0..pending {
            let reply = self.read_frame().await?;
            debug!(?reply);
            replies.push(reply);
        }

        Ok(replies)
    }

    /// Reads a response frame from the socket.
    ///
    /// If an `Error` frame is received, it is converted to `Err`.
    async fn read_response(&mut self) -> crate::Result<Frame> {
        let response = self.read_frame().await?;
        debug!(?response);

        match response {
            Frame::Error(msg) => Err(msg.into()),
            frame => Ok(frame),
        }
    }

    /// Reads the next frame, treating a closed socket as an error.
    async fn read_frame(&mut self) -> crate::Result<Frame> {
        match self.connection.read_frame().await? {
            Some(frame) => Ok(frame),
            None => {
                let err = Error::new(ErrorKind::ConnectionReset, "connection reset by server");

                Err(err.into())
            }
        }
    }
}
