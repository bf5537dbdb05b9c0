//! Share through an external program (`xclip`, `wl-copy`, a mail script, ...).

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{ShareError, SharePayload, ShareTarget};

/// Runs a configured command for each share.
///
/// The command line is split on whitespace. The payload is written to the
/// program's stdin as `text\nurl\n` and exposed as the environment variables
/// `BOOKFINDER_SHARE_TITLE`, `BOOKFINDER_SHARE_TEXT`, and `BOOKFINDER_SHARE_URL`.
#[derive(Debug, Clone)]
pub struct CommandShareTarget {
    program: String,
    args: Vec<String>,
}

impl CommandShareTarget {
    /// Parses a command line such as `"wl-copy"` or `"mail -s book me@example.com"`.
    ///
    /// Returns `None` for a blank command line.
    #[must_use]
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl ShareTarget for CommandShareTarget {
    fn is_available(&self) -> bool {
        !self.program.is_empty()
    }

    #[tracing::instrument(skip(self, payload), fields(program = %self.program))]
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("BOOKFINDER_SHARE_TITLE", &payload.title)
            .env("BOOKFINDER_SHARE_TEXT", &payload.text)
            .env("BOOKFINDER_SHARE_URL", &payload.url)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ShareError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let body = format!("{}\n{}\n", payload.text, payload.url);
            // Programs that ignore stdin may exit before the write lands.
            if let Err(error) = stdin.write_all(body.as_bytes()).await
                && error.kind() != ErrorKind::BrokenPipe
            {
                return Err(error.into());
            }
        }

        let status = child.wait().await?;
        debug!(%status, "Share command finished");
        if status.success() {
            Ok(())
        } else {
            Err(ShareError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            })
        }
    }
}
