//!
//! A small in-memory server for the hash and set command families, spawning
//! a task per connection.
//!

use crate::{Command, Connection, Db};
use std::future::Future;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Semaphore, broadcast, mpsc};
use tokio::time::{self, Duration};
use tracing::{debug, error, info, instrument};

const MAX_CONNECTIONS: usize = 500;

/// Server listener state. Created in the `run` call.
#[derive(Debug)]
struct Listener {
    /// Shared database handle, holding every hash and set.
    db: Db,

    /// supplied by the `run` caller.
    tcp_listener: TcpListener,

    limit_connections: Arc<Semaphore>,

    /// Broadcasts a shutdown signal to all active connections.
    ///
    /// When shutdown is initiated, a `()` value is sent via the broadcast::Sender.
    shutdown_sender: broadcast::Sender<()>,

    /// Cloned into every connection task. `run` returns once the last clone
    /// is dropped.
    shutdown_complete_tx: mpsc::Sender<()>,
}

/// Serve hash and set commands on `listener` until `shutdown` completes.
///
/// Every connection gets its own task, all of them sharing one keyspace.
/// Pass `tokio::signal::ctrl_c()` for a process-wide server, or a future that
/// never completes for one that lives as long as its runtime.
pub async fn run(listener: TcpListener, shutdown: impl Future) {
    // When the provided `shutdown` future completes, we must send a shutdown
    // message to all active connections.
    let (shutdown_sender, _) = broadcast::channel(1);
    let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel(1);

    let mut server = Listener {
        tcp_listener: listener,
        db: Db::new(),
        limit_connections: Arc::new(Semaphore::new(MAX_CONNECTIONS)),
        shutdown_sender,
        shutdown_complete_tx,
    };

    // Concurrently run the server and listen for the `shutdown` signal.
    tokio::select! {
        res = server.run() => {
            if let Err(err) = res {
                error!(cause = %err, "failed to accept");
            }
        }
        _ = shutdown => {
            info!("The shutdown signal has been received");
        }
    }

    let Listener {
        shutdown_complete_tx,
        shutdown_sender,
        ..
    } = server;
    drop(shutdown_sender);
    // Drop final `Sender` so the `Receiver` below can complete
    drop(shutdown_complete_tx);

    // Wait for all active connections to finish processing.
    let _ = shutdown_complete_rx.recv().await;
}

impl Listener {
    /// Accept connections forever, one task per connection.
    async fn run(&mut self) -> crate::Result<()> {
        info!("accepting inbound connections");

        loop {
            // Wait for a permit to become available. The semaphore is never
            // closed, so acquiring only fails if that invariant is broken.
            let permit = self.limit_connections.clone().acquire_owned().await?;

            let socket = self.accept().await?;

            let db = self.db.clone();
            let shutdown = Shutdown {
                signal: self.shutdown_sender.subscribe(),
                received: false,
            };
            // Spawn a new task to process the connections.
            tokio::spawn(async move {
                if let Err(err) = process(Connection::new(socket), db, shutdown).await {
                    error!(cause = ?err, "connection error");
                }

                // returns the permit back to the semaphore.
                drop(permit);
            });
        }
    }

    /// Accept an inbound connection.
    ///
    /// Errors are handled by backing off and retrying. An exponential backoff
    /// strategy is used. If accepting fails on the 6th try after
    /// waiting for 64 seconds, then this function returns with an error.
    async fn accept(&mut self) -> crate::Result<TcpStream> {
        let mut backoff = 1;

        loop {
            match self.tcp_listener.accept().await {
                Ok((socket, _)) => return Ok(socket),
                Err(err) => {
                    if backoff > 64 {
                        return Err(err.into());
                    }
                }
            }

            // Pause execution
            time::sleep(Duration::from_secs(backoff)).await;

            backoff *= 2;
        }
    }
}

/// Lets a connection task notice the server shutting down.
#[derive(Debug)]
struct Shutdown {
    signal: broadcast::Receiver<()>,
    received: bool,
}

impl Shutdown {
    fn is_shutdown(&self) -> bool {
        self.received
    }

    /// Wait for the shutdown broadcast, returning at once if it was already seen.
    async fn recv(&mut self) {
        if !self.received {
            // a closed channel means the server is going away too
            let _ = self.signal.recv().await;
            self.received = true;
        }
    }
}

/// Apply each request on `connection` to `db` and write its reply.
///
/// A frame that is not a well-formed command ends the connection with `Err`.
/// On shutdown the current command finishes before the task exits.
#[instrument]
async fn process(mut connection: Connection, db: Db, mut shutdown: Shutdown) -> crate::Result<()> {
    // As long as the shutdown signal has not been received, try to read a new request frame.
    while !shutdown.is_shutdown() {
        // While reading a request frame, also listen for the shutdown signal.
        let maybe_frame = tokio::select! {
            res = connection.read_frame() => res?,
            _ = shutdown.recv() => {
                return Ok(());
            }
        };

        // peer closed the socket
        let frame = match maybe_frame {
            Some(frame) => frame,
            None => return Ok(()),
        };

        let cmd = Command::from_frame(frame)?;
        debug!(name = cmd.get_name(), ?cmd);

        cmd.apply(&db, &mut connection).await?;
    }

    Ok(())
}
