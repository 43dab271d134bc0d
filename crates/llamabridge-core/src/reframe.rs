//! NDJSON → SSE reframing for streamed chat completions.
//!
//! Ollama streams one JSON record per line, while OpenAI clients expect
//! Server-Sent Events:
//!
//! NDJSON in:  `{"model":"llama3","created_at":"...","message":{"role":"assistant","content":"hi"},"done":false}\n`
//! SSE out:    `data: {"id":"chatcmpl-...","object":"chat.completion.chunk",...}\n\n`
//!
//! The network chunks the backend stream arbitrarily, so a chunk may hold
//! half a record, several records, or split a UTF-8 character. Only line
//! breaks delimit records. [`StreamReframer`] keeps the unterminated tail
//! between chunks and emits events as soon as a line completes.

use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use crate::dialect::ollama::OllamaChatRecord;
use crate::dialect::openai::ChatCompletionChunk;
use crate::error::TranslateError;
use crate::translate::translate_stream_record;

/// Literal terminator event closing every stream.
pub const SSE_DONE: &str = "data: [DONE]\n\n";

/// One outbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A translated frame.
    Frame(ChatCompletionChunk),
    /// The terminal `[DONE]` sentinel.
    Done,
}

impl StreamEvent {
    /// Encode as an SSE event: `data: <payload>` followed by a blank line.
    pub fn to_sse(&self) -> Result<Bytes, TranslateError> {
        match self {
            Self::Frame(chunk) => {
                let json = serde_json::to_string(chunk).map_err(TranslateError::Encode)?;
                Ok(Bytes::from(format!("data: {json}\n\n")))
            }
            Self::Done => Ok(Bytes::from_static(SSE_DONE.as_bytes())),
        }
    }
}

/// Per-stream reframing state.
///
/// Construct one per backend stream; never share across streams. Feed every
/// received chunk to [`push`](Self::push) in arrival order, then call
/// [`finish`](Self::finish) when the backend closes the connection.
#[derive(Debug)]
pub struct StreamReframer {
    request_id: String,
    model: String,
    /// Bytes received after the last line break.
    buf: BytesMut,
    /// Prefix of `buf` already known to hold no line break.
    scanned: usize,
    /// True until the first frame has been emitted.
    first: bool,
    /// Set once the sentinel has been emitted.
    finished: bool,
}

impl StreamReframer {
    /// Create a reframer for one stream.
    ///
    /// `request_id` is stamped on every frame; `model` is the name the
    /// client asked for.
    pub fn new(request_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            model: model.into(),
            buf: BytesMut::new(),
            scanned: 0,
            first: true,
            finished: false,
        }
    }

    /// Whether the sentinel has already been emitted.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume one network chunk and return the events it completes.
    ///
    /// After a `done` record the sentinel is emitted, any buffered bytes are
    /// dropped and all later input is ignored.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        self.buf.extend_from_slice(chunk);

        while let Some(line_end) = self.next_line_end() {
            let line = self.buf.split_to(line_end);
            self.scanned = 0;
            if self.process_line(&line, &mut events) {
                self.close(&mut events);
                break;
            }
        }

        events
    }

    /// Handle end of input from the backend.
    ///
    /// A final line that never got its terminator is still processed. The
    /// sentinel is emitted even when no `done` record was seen.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        let tail = self.buf.split();
        self.scanned = 0;
        if !self.process_line(&tail, &mut events) {
            debug!(request_id = %self.request_id, "Backend stream ended without a done record");
        }
        self.close(&mut events);
        events
    }

    /// Parse and translate one line. Returns true if it was the done record.
    fn process_line(&mut self, line: &[u8], events: &mut Vec<StreamEvent>) -> bool {
        let line = line.trim_ascii();
        if line.is_empty() {
            return false;
        }

        let record: OllamaChatRecord = match serde_json::from_slice(line) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    request_id = %self.request_id,
                    error = %e,
                    line = %String::from_utf8_lossy(line),
                    "Skipping malformed backend stream record"
                );
                return false;
            }
        };

        let frame = translate_stream_record(&record, &self.request_id, &self.model, self.first);
        self.first = false;
        events.push(StreamEvent::Frame(frame));

        record.done
    }

    /// End of the next complete line, resuming where the last search stopped.
    fn next_line_end(&mut self) -> Option<usize> {
        let found = find_newline(&self.buf, self.scanned);
        if found.is_none() {
            self.scanned = self.buf.len();
        }
        found
    }

    fn close(&mut self, events: &mut Vec<StreamEvent>) {
        self.finished = true;
        self.buf.clear();
        self.scanned = 0;
        events.push(StreamEvent::Done);
    }
}

/// Find the next newline at or after `from`, returning the position after it.
fn find_newline(buf: &BytesMut, from: usize) -> Option<usize> {
    buf[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| from + pos + 1)
}
