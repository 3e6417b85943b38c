//! Stdio transport — reads JSON-RPC from stdin, writes to stdout.

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult};

use super::framing::{self, Frame, MAX_MESSAGE_BYTES};

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Run the transport loop on the process stdin/stdout.
    pub async fn run(&self) -> McpResult<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        tracing::info!("Stdio transport started");
        self.serve(reader, writer).await
    }

    /// Serve newline-delimited JSON-RPC until the reader reaches EOF.
    ///
    /// Lines that are too long or not UTF-8 get an error reply with a null id
    /// and the loop carries on with the next line.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            let frame = framing::read_frame(&mut reader, &mut buf)
                .await
                .map_err(McpError::Io)?;

            let framed = match frame {
                Frame::Eof => {
                    tracing::info!("EOF on input, shutting down");
                    break;
                }
                Frame::Oversized(len) => {
                    let e = McpError::InvalidRequest(format!(
                        "Message of {len} bytes exceeds {MAX_MESSAGE_BYTES} bytes"
                    ));
                    tracing::warn!("{e}");
                    framing::parse_error_response(&e)?
                }
                Frame::Line => match self.reply_to(&buf).await? {
                    Some(framed) => framed,
                    None => continue,
                },
            };

            writer
                .write_all(framed.as_bytes())
                .await
                .map_err(McpError::Io)?;
            writer.flush().await.map_err(McpError::Io)?;
        }

        Ok(())
    }

    async fn reply_to(&self, raw: &[u8]) -> McpResult<Option<String>> {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(e) => {
                let e = McpError::ParseError(format!("Invalid UTF-8: {e}"));
                tracing::warn!("Parse error: {e}");
                return framing::parse_error_response(&e).map(Some);
            }
        };
        if line.is_empty() {
            return Ok(None);
        }

        match framing::parse_message(line) {
            Ok(msg) => {
                tracing::debug!("<- {}", msg.method().unwrap_or("(response)"));
                match self.handler.handle_message(msg).await {
                    Some(response) => framing::frame_message(&response).map(Some),
                    None => Ok(None),
                }
            }
            Err(e) => {
                tracing::warn!("Parse error: {e}");
                framing::parse_error_response(&e).map(Some)
            }
        }
    }
}
