use crate::clients::SharedClient;
use crate::cmd::Protocol;
use crate::{codec, Frame};
use bytes::Bytes;
use serde::Serialize;
use std::borrow::Borrow;
use tracing::debug;

/// Queue `cmd` on the shared connection, commit, and return its reply.
///
/// The connection stays locked for the whole round trip.
pub(crate) fn sync_commit(client: &SharedClient, cmd: impl Protocol) -> crate::Result<Frame> {
    let mut client = client
        .lock()
        .map_err(|_| "shared client lock poisoned by a panicked caller")?;

    client.queue(cmd)?;
    let mut replies = client.sync_commit()?;
    debug!(?replies, "committed");

    replies
        .pop()
        .ok_or_else(|| "server sent no reply for the committed command".into())
}

/// Encode every item of `values`.
pub(crate) fn encode_all<T, I>(values: I) -> crate::Result<Vec<Bytes>>
where
    T: Serialize,
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    values
        .into_iter()
        .map(|value| codec::encode(<I::Item as Borrow<T>>::borrow(&value)))
        .collect()
}
