//! Message framing for newline-delimited JSON.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::types::{JsonRpcError, JsonRpcMessage, McpError, McpResult, RequestId};

/// Largest accepted inbound line.
pub const MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

/// Outcome of reading one line from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Input is exhausted.
    Eof,
    /// A line within the size limit is in the buffer, without its newline.
    Line,
    /// The line was longer than [`MAX_MESSAGE_BYTES`] and was skipped.
    Oversized(usize),
}

/// Read one newline-terminated line as raw bytes.
///
/// At most [`MAX_MESSAGE_BYTES`] are buffered. The rest of a longer line is
/// read and discarded, so the next call starts on the following line.
pub async fn read_frame<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let mut total = 0usize;

    loop {
        let (used, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(match total {
                    0 => Frame::Eof,
                    n if n > MAX_MESSAGE_BYTES => Frame::Oversized(n),
                    _ => Frame::Line,
                });
            }

            let newline = available.iter().position(|&b| b == b'\n');
            let chunk = &available[..newline.unwrap_or(available.len())];
            total += chunk.len();
            if total <= MAX_MESSAGE_BYTES {
                buf.extend_from_slice(chunk);
            } else if !buf.is_empty() {
                buf.clear();
                buf.shrink_to_fit();
            }
            (chunk.len() + usize::from(newline.is_some()), newline.is_some())
        };
        reader.consume(used);

        if done {
            return Ok(if total > MAX_MESSAGE_BYTES {
                Frame::Oversized(total)
            } else {
                Frame::Line
            });
        }
    }
}

/// Parse a single line of text as a JSON-RPC message.
pub fn parse_message(line: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }
    if trimmed.len() > MAX_MESSAGE_BYTES {
        return Err(McpError::InvalidRequest(format!(
            "Message of {} bytes exceeds {MAX_MESSAGE_BYTES} bytes",
            trimmed.len()
        )));
    }

    serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))
}

/// Serialize a value to a JSON line (with trailing newline).
pub fn frame_message(value: &serde_json::Value) -> McpResult<String> {
    let mut json = serde_json::to_string(value).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}

/// Error reply for a line that could not be parsed; the id is unknown.
pub fn parse_error_response(error: &McpError) -> McpResult<String> {
    let reply: JsonRpcError = error.to_json_rpc_error(RequestId::Null);
    let value = serde_json::to_value(reply).map_err(McpError::Json)?;
    frame_message(&value)
}
