use crate::cmd::{bulk_array_frame, count_frame, flag_frame, Protocol};
use crate::frame::PushFrame;
use crate::{Connection, Db, Frame, Parse};
use bytes::Bytes;
use tracing::{debug, instrument};

/// Adds the given members to the set stored at `key`.
///
/// Members already present are ignored. Replies with the number of members
/// that were added.
#[derive(Debug)]
pub struct SAdd {
    key: String,
    members: Vec<Bytes>,
}

impl SAdd {
    pub fn new(key: impl ToString, members: Vec<Bytes>) -> SAdd {
        SAdd {
            key: key.to_string(),
            members,
        }
    }

    /// # Format
    ///
    /// ```text
    /// SADD key member [member ...]
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<SAdd> {
        let key = parse.next_string()?;
        let members = parse.remaining_bytes()?;

        Ok(SAdd { key, members })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.sadd(&self.key, self.members) {
            Ok(added) => count_frame(added),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for SAdd {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("sadd".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        for member in self.members {
            frame.push_bulk(member);
        }

        frame.into()
    }
}

/// Removes the given members from the set stored at `key`.
///
/// Replies with the number of members that were removed.
#[derive(Debug)]
pub struct SRem {
    key: String,
    members: Vec<Bytes>,
}

impl SRem {
    pub fn new(key: impl ToString, members: Vec<Bytes>) -> SRem {
        SRem {
            key: key.to_string(),
            members,
        }
    }

    /// # Format
    ///
    /// ```text
    /// SREM key member [member ...]
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<SRem> {
        let key = parse.next_string()?;
        let members = parse.remaining_bytes()?;

        Ok(SRem { key, members })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.srem(&self.key, &self.members) {
            Ok(removed) => count_frame(removed),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for SRem {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("srem".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        for member in self.members {
            frame.push_bulk(member);
        }

        frame.into()
    }
}

/// Replies with the cardinality of the set stored at `key`, `0` if absent.
#[derive(Debug)]
pub struct SCard {
    key: String,
}

impl SCard {
    pub fn new(key: impl ToString) -> SCard {
        SCard {
            key: key.to_string(),
        }
    }

    /// # Format
    ///
    /// ```text
    /// SCARD key
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<SCard> {
        let key = parse.next_string()?;

        Ok(SCard { key })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.scard(&self.key) {
            Ok(card) => count_frame(card),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for SCard {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("scard".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));

        frame.into()
    }
}

/// Replies `1` if `member` belongs to the set stored at `key`, `0` otherwise.
#[derive(Debug)]
pub struct SIsMember {
    key: String,
    member: Bytes,
}

impl SIsMember {
    pub fn new(key: impl ToString, member: Bytes) -> SIsMember {
        SIsMember {
            key: key.to_string(),
            member,
        }
    }

    /// # Format
    ///
    /// ```text
    /// SISMEMBER key member
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<SIsMember> {
        let key = parse.next_string()?;
        let member = parse.next_bytes()?;

        Ok(SIsMember { key, member })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.sismember(&self.key, &self.member) {
            Ok(is_member) => flag_frame(is_member),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for SIsMember {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("sismember".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        frame.push_bulk(self.member);

        frame.into()
    }
}

/// Replies with every member of the set stored at `key`.
#[derive(Debug)]
pub struct SMembers {
    key: String,
}

impl SMembers {
    pub fn new(key: impl ToString) -> SMembers {
        SMembers {
            key: key.to_string(),
        }
    }

    /// # Format
    ///
    /// ```text
    /// SMEMBERS key
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<SMembers> {
        let key = parse.next_string()?;

        Ok(SMembers { key })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.smembers(&self.key) {
            Ok(members) => bulk_array_frame(members),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for SMembers {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("smembers".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));

        frame.into()
    }
}
