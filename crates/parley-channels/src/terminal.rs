use crate::channel::ChannelMessage;
use crate::dispatch::CommandDispatcher;
use parley_core::ParleyResult;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

pub const HELP_TEXT: &str =
    "Commands: /reset, /personality <text>, /history, /quit. Anything else is sent to the model.";

/// Interactive read-eval-print loop over a [`CommandDispatcher`].
pub struct TerminalChannel {
    dispatcher: CommandDispatcher,
    prompt: String,
}

impl TerminalChannel {
    pub fn new(dispatcher: CommandDispatcher) -> Self {
        Self {
            dispatcher,
            prompt: "> ".to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Run on the process's stdin and stdout.
    pub async fn run_stdio(&self) -> ParleyResult<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.run(stdin, tokio::io::stdout()).await
    }

    /// Read lines until EOF or `/quit`, writing one reply per line.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> ParleyResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            writer.write_all(self.prompt.as_bytes()).await?;
            writer.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "/quit" || line == "/exit" {
                break;
            }

            let message = ChannelMessage {
                channel_id: "terminal".to_string(),
                sender_id: "local".to_string(),
                content: line.to_string(),
                from_bot: false,
            };
            let reply = match self.dispatcher.handle(&message).await {
                Some(reply) => reply,
                None => HELP_TEXT.to_string(),
            };
            writer.write_all(reply.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }

        debug!("Terminal loop finished");
        writer.flush().await?;
        Ok(())
    }
}
