//! The supported Redis commands.
//!
//! Each command is a struct that knows how to encode itself into a request
//! frame (client side) and how to parse and apply itself (server side).

mod hash;
pub use hash::{HDel, HExists, HGet, HKeys, HLen, HSet, HSetNx, HVals};

mod ping;
pub use ping::Ping;

mod set;
pub use set::{SAdd, SCard, SIsMember, SMembers, SRem};

mod set_algebra;
pub use set_algebra::{SetAlgebra, SetOp};

mod unknown;
pub use unknown::Unknown;

use crate::{Connection, Db, Frame, Parse};
use bytes::Bytes;

/// Converts a command into the frame sent over the wire.
pub trait Protocol {
    fn into_frame(self) -> Frame;
}

/// Enumeration of supported Redis commands.
///
/// Methods called on `Command` are delegated to the command implementation.
#[derive(Debug)]
pub enum Command {
    Ping(Ping),
    HSet(HSet),
    HSetNx(HSetNx),
    HGet(HGet),
    HExists(HExists),
    HDel(HDel),
    HKeys(HKeys),
    HVals(HVals),
    HLen(HLen),
    SAdd(SAdd),
    SRem(SRem),
    SCard(SCard),
    SIsMember(SIsMember),
    SMembers(SMembers),
    SetAlgebra(SetAlgebra),
    Unknown(Unknown),
}

impl Command {
    /// Parse a command from a received frame.
    ///
    /// The `Frame` must represent a Redis command supported by `redispack` and
    /// be the array variant.
    ///
    /// # Returns
    ///
    /// On success, the command value is returned, otherwise, `Err` is returned.
    pub fn from_frame(frame: Frame) -> crate::Result<Command> {
        // The frame value is decorated with `Parse`, which provides a
        // "cursor" like API which makes parsing the command easier.
        let mut parse = Parse::new(frame)?;

        // All redis commands begin with the command name as a string. The name
        // is read and converted to lower case in order to do case sensitive
        // matching.
        let command_name = parse.next_string()?.to_lowercase();

        let command = match &command_name[..] {
            "ping" => Command::Ping(Ping::parse_frames(&mut parse)?),
            "hset" => Command::HSet(HSet::parse_frames(&mut parse)?),
            "hsetnx" => Command::HSetNx(HSetNx::parse_frames(&mut parse)?),
            "hget" => Command::HGet(HGet::parse_frames(&mut parse)?),
            "hexists" => Command::HExists(HExists::parse_frames(&mut parse)?),
            "hdel" => Command::HDel(HDel::parse_frames(&mut parse)?),
            "hkeys" => Command::HKeys(HKeys::parse_frames(&mut parse)?),
            "hvals" => Command::HVals(HVals::parse_frames(&mut parse)?),
            "hlen" => Command::HLen(HLen::parse_frames(&mut parse)?),
            "sadd" => Command::SAdd(SAdd::parse_frames(&mut parse)?),
            "srem" => Command::SRem(SRem::parse_frames(&mut parse)?),
            "scard" => Command::SCard(SCard::parse_frames(&mut parse)?),
            "sismember" => Command::SIsMember(SIsMember::parse_frames(&mut parse)?),
            "smembers" => Command::SMembers(SMembers::parse_frames(&mut parse)?),
            "sdiff" => Command::SetAlgebra(SetAlgebra::parse_frames(SetOp::Diff, &mut parse)?),
            "sinter" => Command::SetAlgebra(SetAlgebra::parse_frames(SetOp::Inter, &mut parse)?),
            "sunion" => Command::SetAlgebra(SetAlgebra::parse_frames(SetOp::Union, &mut parse)?),
            _ => {
                // The command is not recognized and an Unknown command is
                // returned.
                //
                // `return` is called here to skip the `finish()` call below. As
                // the command is not recognized, there is most likely
                // unconsumed fields remaining in the `Parse` instance.
                return Ok(Command::Unknown(Unknown::new(command_name)));
            }
        };

        // Check if there is any remaining unconsumed fields in the `Parse`
        // value. If fields remain, this indicates an unexpected frame format
        // and an error is returned.
        parse.finish()?;

        Ok(command)
    }

    /// Apply the command to the specified `Db` instance.
    ///
    /// The response is written to `dst`. This is called by the server in order
    /// to execute a received command.
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        use Command::*;

        match self {
            Ping(cmd) => cmd.apply(dst).await,
            HSet(cmd) => cmd.apply(db, dst).await,
            HSetNx(cmd) => cmd.apply(db, dst).await,
            HGet(cmd) => cmd.apply(db, dst).await,
            HExists(cmd) => cmd.apply(db, dst).await,
            HDel(cmd) => cmd.apply(db, dst).await,
            HKeys(cmd) => cmd.apply(db, dst).await,
            HVals(cmd) => cmd.apply(db, dst).await,
            HLen(cmd) => cmd.apply(db, dst).await,
            SAdd(cmd) => cmd.apply(db, dst).await,
            SRem(cmd) => cmd.apply(db, dst).await,
            SCard(cmd) => cmd.apply(db, dst).await,
            SIsMember(cmd) => cmd.apply(db, dst).await,
            SMembers(cmd) => cmd.apply(db, dst).await,
            SetAlgebra(cmd) => cmd.apply(db, dst).await,
            Unknown(cmd) => cmd.apply(dst).await,
        }
    }

    /// Returns the command name
    pub(crate) fn get_name(&self) -> &str {
        match self {
            Command::Ping(_) => "ping",
            Command::HSet(_) => "hset",
            Command::HSetNx(_) => "hsetnx",
            Command::HGet(_) => "hget",
            Command::HExists(_) => "hexists",
            Command::HDel(_) => "hdel",
            Command::HKeys(_) => "hkeys",
            Command::HVals(_) => "hvals",
            Command::HLen(_) => "hlen",
            Command::SAdd(_) => "sadd",
            Command::SRem(_) => "srem",
            Command::SCard(_) => "scard",
            Command::SIsMember(_) => "sismember",
            Command::SMembers(_) => "smembers",
            Command::SetAlgebra(cmd) => cmd.op().name(),
            Command::Unknown(cmd) => cmd.get_name(),
        }
    }
}

/// Encode a count for an integer reply.
pub(crate) fn count_frame(count: usize) -> Frame {
    Frame::Integer(i64::try_from(count).unwrap_or(i64::MAX))
}

/// Redis answers flag queries with `1` or `0`.
pub(crate) fn flag_frame(flag: bool) -> Frame {
    Frame::Integer(i64::from(flag))
}

/// Encode a listing as an array of bulk strings.
pub(crate) fn bulk_array_frame(items: Vec<Bytes>) -> Frame {
    Frame::Array(items.into_iter().map(Frame::Bulk).collect())
}

