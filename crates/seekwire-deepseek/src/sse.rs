// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line framing for streamed chat-completion responses.
//!
//! The body is split into lines only; recognizing `data:` lines and the
//! `[DONE]` sentinel is left to [`StreamAccumulator`](crate::accumulator::StreamAccumulator).

use std::pin::Pin;

use futures::stream::{Stream, StreamExt, TryStreamExt};
use seekwire_core::SeekwireError;
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};
use tokio_util::io::StreamReader;

/// Longest line accepted before the stream is treated as broken.
pub const MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

/// A stream of body lines with `\n` / `\r\n` terminators removed.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, SeekwireError>> + Send>>;

/// Splits a streaming response body into lines.
///
/// A final line without a terminator is still yielded. Bytes that are not
/// valid UTF-8 are replaced with U+FFFD rather than failing the stream, so a
/// bad line reaches the accumulator and is ignored or skipped there. Read
/// failures and oversized lines surface as [`SeekwireError::StreamRead`].
pub fn line_stream(response: reqwest::Response) -> LineStream {
    let body = response.bytes_stream().map_err(std::io::Error::other);
    let reader = StreamReader::new(body);
    let codec = AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), MAX_LINE_BYTES);
    let lines = FramedRead::new(reader, codec);

    Box::pin(lines.map(|result| {
        result
            .map(|line| decode_line(&line))
            .map_err(|e| SeekwireError::StreamRead {
                message: e.to_string(),
                source: Some(Box::new(e)),
            })
    }))
}

/// Drops a trailing `\r` and decodes lossily.
fn decode_line(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
