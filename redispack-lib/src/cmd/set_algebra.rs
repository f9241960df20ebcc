use crate::cmd::{bulk_array_frame, Protocol};
use crate::frame::PushFrame;
use crate::{Connection, Db, Frame, Parse, ParseError};
use bytes::Bytes;
use tracing::{debug, instrument};

/// Which combination `SetAlgebra` computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    /// `SDIFF`: members of the first set missing from all the others.
    Diff,
    /// `SINTER`: members present in every set.
    Inter,
    /// `SUNION`: members present in any set.
    Union,
}

impl SetOp {
    pub fn name(self) -> &'static str {
        match self {
            SetOp::Diff => "sdiff",
            SetOp::Inter => "sinter",
            SetOp::Union => "sunion",
        }
    }
}

/// `SDIFF`, `SINTER` and `SUNION` over the sets stored at `keys`.
///
/// Absent keys count as empty sets. Replies with the resulting members.
#[derive(Debug)]
pub struct SetAlgebra {
    op: SetOp,
    keys: Vec<String>,
}

impl SetAlgebra {
    pub fn new(op: SetOp, keys: Vec<String>) -> SetAlgebra {
        SetAlgebra { op, keys }
    }

    pub fn op(&self) -> SetOp {
        self.op
    }

    /// # Format
    ///
    /// Expects an array frame containing two or more entries.
    ///
    /// ```text
    /// SDIFF key [key ...]
    /// ```
    pub(crate) fn parse_frames(op: SetOp, parse: &mut Parse) -> crate::Result<SetAlgebra> {
        use ParseError::EndOfStream;

        let mut keys = vec![parse.next_string()?];

        loop {
            match parse.next_string() {
                Ok(s) => keys.push(s),
                Err(EndOfStream) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(SetAlgebra { op, keys })
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, db, dst), fields(op = self.op.name()))]
    pub(crate) async fn apply(self, db: &Db, dst: &mut Connection) -> crate::Result<()> {
        let result = match self.op {
            SetOp::Diff => db.sdiff(&self.keys),
            SetOp::Inter => db.sinter(&self.keys),
            SetOp::Union => db.sunion(&self.keys),
        };
        let resp_frame = match result {
            Ok(members) => bulk_array_frame(members),
            Err(err) => err.into(),
        };

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for SetAlgebra {
    fn into_frame(self) -> Frame {
        let mut frame = vec![];
        frame.push_bulk(Bytes::from(self.op.name().as_bytes()));
        for key in self.keys {
            frame.push_bulk(Bytes::from(key.into_bytes()));
        }

        frame.into()
    }
}
