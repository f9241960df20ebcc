use crate::cmd::{bulk_array_frame, count_frame, flag_frame, Protocol};
use crate::frame::PushFrame;
use crate::{Connection, Db, Frame, Parse, ParseError};
use bytes::Bytes;
use tracing::{debug, instrument};

/// Sets `field` in the hash stored at `key` to `value`.
///
/// Creates the hash if it does not exist and overwrites the field if it does.
/// Replies with the number of fields that were added, updated fields are not
/// counted.
#[derive(Debug)]
pub struct HSet {
    key: String,
    pairs: Vec<(Bytes, Bytes)>,
}

impl HSet {
    pub fn new(key: impl ToString, field: Bytes, value: Bytes) -> HSet {
        HSet {
            key: key.to_string(),
            pairs: vec![(field, value)],
        }
    }

    /// # Format
    ///
    /// ```text
    /// HSET key field value [field value ...]
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<HSet> {
        use ParseError::EndOfStream;

        let key = parse.next_string()?;
        let mut pairs = vec![(parse.next_bytes()?, parse.next_bytes()?)];

        loop {
            let field = match parse.next_bytes() {
                Ok(field) => field,
                Err(EndOfStream) => break,
                Err(err) => return Err(err.into()),
            };
            // A field without a value is a malformed request.
            let value = parse.next_bytes()?;

            pairs.push((field, value));
        }

        Ok(HSet { key, pairs })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.hset(&self.key, self.pairs) {
            Ok(created) => count_frame(created),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for HSet {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("hset".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        for (field, value) in self.pairs {
            frame.push_bulk(field);
            frame.push_bulk(value);
        }

        frame.into()
    }
}

/// Sets `field` in the hash stored at `key` only if it does not exist yet.
///
/// Replies `1` if the field was set and `0` if it already existed, in which
/// case the stored value is left untouched.
#[derive(Debug)]
pub struct HSetNx {
    key: String,
    field: Bytes,
    value: Bytes,
}

impl HSetNx {
    pub fn new(key: impl ToString, field: Bytes, value: Bytes) -> HSetNx {
        HSetNx {
            key: key.to_string(),
            field,
            value,
        }
    }

    /// # Format
    ///
    /// ```text
    /// HSETNX key field value
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<HSetNx> {
        let key = parse.next_string()?;
        let field = parse.next_bytes()?;
        let value = parse.next_bytes()?;

        Ok(HSetNx { key, field, value })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.hsetnx(&self.key, self.field, self.value) {
            Ok(created) => flag_frame(created),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for HSetNx {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("hsetnx".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        frame.push_bulk(self.field);
        frame.push_bulk(self.value);

        frame.into()
    }
}

/// Get the value of `field` in the hash stored at `key`.
///
/// If the hash or the field does not exist the special value nil is returned.
#[derive(Debug)]
pub struct HGet {
    key: String,
    field: Bytes,
}

impl HGet {
    pub fn new(key: impl ToString, field: Bytes) -> HGet {
        HGet {
            key: key.to_string(),
            field,
        }
    }

    /// # Format
    ///
    /// ```text
    /// HGET key field
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<HGet> {
        let key = parse.next_string()?;
        let field = parse.next_bytes()?;

        Ok(HGet { key, field })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.hget(&self.key, &self.field) {
            Ok(Some(value)) => Frame::Bulk(value),
            // there is no value.
            Ok(None) => Frame::Null,
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for HGet {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("hget".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        frame.push_bulk(self.field);

        frame.into()
    }
}

/// Replies `1` if `field` exists in the hash stored at `key`, `0` otherwise.
#[derive(Debug)]
pub struct HExists {
    key: String,
    field: Bytes,
}

impl HExists {
    pub fn new(key: impl ToString, field: Bytes) -> HExists {
        HExists {
            key: key.to_string(),
            field,
        }
    }

    /// # Format
    ///
    /// ```text
    /// HEXISTS key field
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<HExists> {
        let key = parse.next_string()?;
        let field = parse.next_bytes()?;

        Ok(HExists { key, field })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.hexists(&self.key, &self.field) {
            Ok(exists) => flag_frame(exists),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for HExists {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("hexists".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        frame.push_bulk(self.field);

        frame.into()
    }
}

/// Removes the given fields from the hash stored at `key`.
///
/// Fields that do not exist are ignored. Replies with the number of fields
/// that were removed.
#[derive(Debug)]
pub struct HDel {
    key: String,
    fields: Vec<Bytes>,
}

impl HDel {
    pub fn new(key: impl ToString, fields: Vec<Bytes>) -> HDel {
        HDel {
            key: key.to_string(),
            fields,
        }
    }

    /// # Format
    ///
    /// ```text
    /// HDEL key field [field ...]
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<HDel> {
        let key = parse.next_string()?;
        let fields = parse.remaining_bytes()?;

        Ok(HDel { key, fields })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.hdel(&self.key, &self.fields) {
            Ok(removed) => count_frame(removed),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for HDel {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("hdel".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        for field in self.fields {
            frame.push_bulk(field);
        }

        frame.into()
    }
}

/// Replies with every field name of the hash stored at `key`.
#[derive(Debug)]
pub struct HKeys {
    key: String,
}

impl HKeys {
    pub fn new(key: impl ToString) -> HKeys {
        HKeys {
            key: key.to_string(),
        }
    }

    /// # Format
    ///
    /// ```text
    /// HKEYS key
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<HKeys> {
        let key = parse.next_string()?;

        Ok(HKeys { key })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.hkeys(&self.key) {
            Ok(fields) => bulk_array_frame(fields),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for HKeys {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("hkeys".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));

        frame.into()
    }
}

/// Replies with every value of the hash stored at `key`.
#[derive(Debug)]
pub struct HVals {
    key: String,
}

impl HVals {
    pub fn new(key: impl ToString) -> HVals {
        HVals {
            key: key.to_string(),
        }
    }

    /// # Format
    ///
    /// ```text
    /// HVALS key
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<HVals> {
        let key = parse.next_string()?;

        Ok(HVals { key })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.hvals(&self.key) {
            Ok(values) => bulk_array_frame(values),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for HVals {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("hvals".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));

        frame.into()
    }
}

/// Replies with the number of fields in the hash stored at `key`.
#[derive(Debug)]
pub struct HLen {
    key: String,
}

impl HLen {
    pub fn new(key: impl ToString) -> HLen {
        HLen {
            key: key.to_string(),
        }
    }

    /// # Format
    ///
    /// ```text
    /// HLEN key
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<HLen> {
        let key = parse.next_string()?;

        Ok(HLen { key })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = match db.hlen(&self.key) {
            Ok(len) => count_frame(len),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for HLen {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from("hlen".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));

        frame.into()
    }
}
