use crate::cmd::Protocol;
use crate::{Connection, Frame, Parse, ParseError};
use bytes::Bytes;
use tracing::{debug, instrument};

/// Liveness check for a connection.
///
/// Replies `PONG`, or echoes `message` back as a bulk string when one is
/// given. Being the only command that touches no key, it is what
/// [`Client::ping`](crate::Client::ping) sends once any pipelined replies
/// have been drained.
#[derive(Debug, Default)]
pub struct Ping {
    message: Option<Bytes>,
}

impl Ping {
    pub fn new(message: Option<Bytes>) -> Ping {
        Ping { message }
    }

    /// # Format
    ///
    /// ```text
    /// PING [message]
    /// ```
    pub(crate) fn parse_frames(parse: &mut Parse) -> crate::Result<Ping> {
        let message = match parse.next_bytes() {
            Ok(message) => Some(message),
            Err(ParseError::EndOfStream) => None,
            Err(err) => return Err(err.into()),
        };

        Ok(Ping { message })
    }

    fn reply(self) -> Frame {
        self.message
            .map_or_else(|| Frame::Simple("PONG".to_string()), Frame::Bulk)
    }

    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, dst), fields(echo = self.message.is_some()))]
    pub(crate) async fn apply(self, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = self.reply();

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}

impl Protocol for Ping {
    fn into_frame(self) -> Frame {
        let mut frame = vec![Frame::Bulk(Bytes::from_static(b"ping"))];
        frame.extend(self.message.map(Frame::Bulk));

        frame.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_frames() {
        assert_eq!(
            Ping::new(None).into_frame(),
            Frame::Array(vec![Frame::Bulk(Bytes::from_static(b"ping"))])
        );
        assert_eq!(
            Ping::new(Some(Bytes::from_static(b"hi"))).into_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from_static(b"ping")),
                Frame::Bulk(Bytes::from_static(b"hi")),
            ])
        );
    }

    #[test]
    fn pong_or_echo() {
        assert_eq!(Ping::default().reply(), Frame::Simple("PONG".to_string()));
        assert_eq!(
            Ping::new(Some(Bytes::from_static(b"hi"))).reply(),
            Frame::Bulk(Bytes::from_static(b"hi"))
        );
    }
}
