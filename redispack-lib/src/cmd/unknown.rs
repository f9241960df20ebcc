use crate::{Connection, Frame};
use tracing::{debug, instrument};

/// Stands in for any command the server does not implement.
#[derive(Debug)]
pub struct Unknown {
    command_name: String,
}

impl Unknown {
    pub(crate) fn new(name: impl ToString) -> Unknown {
        Unknown {
            command_name: name.to_string(),
        }
    }

    pub(crate) fn get_name(&self) -> &str {
        &self.command_name
    }

    /// Responds to the client, indicating the command is not recognized.
    ///
    /// [apply]: crate::cmd::Command::apply
    #[instrument(skip(self, dst))]
    pub(crate) async fn apply(self, dst: &mut Connection) -> crate::Result<()> {
        let resp_frame = Frame::Error(format!("ERR unknown command '{}'", self.command_name));

        debug!(?resp_frame);
        dst.write_frame(&resp_frame).await?;

        Ok(())
    }
}
