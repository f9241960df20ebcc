mod client;
pub use client::Client;

mod blocking_client;
pub use blocking_client::BlockingClient;

use crate::{DEFAULT_HOST, DEFAULT_PORT};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// A connection shared by any number of facades.
///
/// The mutex is held for one queue-and-commit, so commands issued through
/// different facades never interleave within a commit.
pub type SharedClient = Arc<Mutex<BlockingClient>>;

/// Create a client and immediately connect it to `host:port`.
///
/// # Errors
///
/// Any failure while building the runtime, resolving `host` or connecting is
/// returned, the call never panics.
pub fn connect(host: &str, port: u16) -> crate::Result<SharedClient> {
    let addr = format!("{host}:{port}");

    match BlockingClient::connect(addr.as_str()) {
        Ok(client) => {
            debug!(%addr, "connected");
            Ok(Arc::new(Mutex::new(client)))
        }
        Err(err) => {
            warn!(%addr, cause = %err, "failed to connect");
            Err(err)
        }
    }
}

/// [`connect`] to [`DEFAULT_HOST`]:[`DEFAULT_PORT`].
pub fn connect_default() -> crate::Result<SharedClient> {
    connect(DEFAULT_HOST, DEFAULT_PORT)
}
