//! Typed facades over remote hashes and sets.
//!
//! A facade is bound to one key on the server and to a [`SharedClient`].
//! It keeps no local state, every call is a synchronous round trip:
//! arguments are [encoded](crate::codec::encode), the command is queued and
//! committed on the shared connection, and the reply is
//! [decoded](crate::codec::decode) back into typed values.
//!
//! Replies of an unexpected shape, including error replies such as
//! `WRONGTYPE`, are read as "no effect" (`false`, `0`, `None` or an empty
//! collection). Only transport failures surface as `Err`.
//!
//! [`SharedClient`]: crate::clients::SharedClient

mod hash;
pub use hash::Hash;

mod reply;

mod set;
pub use set::Set;

mod util;
