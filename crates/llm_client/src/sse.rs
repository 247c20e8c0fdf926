//! Decoding of OpenAI-compatible SSE bodies into content deltas.
//!
//! Event framing (multi-line `data:` fields, CRLF, comments, split UTF-8) is
//! left to `eventsource-stream`; this module only interprets each event's
//! data. The synchronous decoder is pull-based: callers hand it chunks in
//! arrival order and get back the deltas completed by each chunk.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::pin::Pin;

use eventsource_stream::{EventStream, Eventsource};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{future, FutureExt, StreamExt};
use reqwest::Response;
use serde::Deserialize;

use crate::error::LLMError;
use crate::provider::DeltaStream;

const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Debug, PartialEq)]
enum SseData {
    Delta(String),
    Done,
    Skip,
}

/// Interpret the data of one SSE event.
fn parse_event_data(data: &str) -> SseData {
    let data = data.trim();

    if data == DONE_SENTINEL {
        return SseData::Done;
    }
    if data.is_empty() {
        return SseData::Skip;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map_or(SseData::Skip, SseData::Delta),
        Err(e) => {
            log::debug!("Skipping unparseable SSE payload: {}", e);
            SseData::Skip
        }
    }
}

type Chunk = Result<Vec<u8>, Infallible>;

/// Push-style front end over an `eventsource-stream` parser.
///
/// Fed chunks are queued on an in-memory channel and the event stream is
/// drained without blocking, so a chunk yields exactly the deltas of the
/// events it completes.
pub struct SseDeltaDecoder {
    sender: Option<UnboundedSender<Chunk>>,
    events: Pin<Box<EventStream<UnboundedReceiver<Chunk>>>>,
    done: bool,
}

impl Default for SseDeltaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SseDeltaDecoder {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self {
            sender: Some(sender),
            events: Box::pin(receiver.eventsource()),
            done: false,
        }
    }

    /// True once `[DONE]` has been seen. Further input is ignored.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        self.feed_bytes(chunk.as_bytes())
    }

    /// Raw body bytes, split anywhere.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done {
            return Vec::new();
        }
        if let Some(sender) = &self.sender {
            if sender.unbounded_send(Ok(chunk.to_vec())).is_err() {
                log::warn!("SSE decoder input closed, dropping {} bytes", chunk.len());
            }
        }
        self.drain()
    }

    /// End of input. Anything still buffered is handed to the parser's
    /// end-of-stream handling.
    pub fn finish(&mut self) -> Vec<String> {
        self.sender = None;
        self.drain()
    }

    fn drain(&mut self) -> Vec<String> {
        let mut deltas = Vec::new();
        while !self.done {
            match self.events.next().now_or_never() {
                Some(Some(Ok(event))) => match parse_event_data(&event.data) {
                    SseData::Delta(delta) => deltas.push(delta),
                    SseData::Done => {
                        self.done = true;
                        self.sender = None;
                    }
                    SseData::Skip => {}
                },
                Some(Some(Err(e))) => log::warn!("Skipping malformed SSE input: {}", e),
                // Stream ended, or waiting for more input.
                Some(None) | None => break,
            }
        }
        deltas
    }
}

/// Iterator of deltas over an iterator of body chunks. Chunks are pulled
/// only when no decoded delta is pending, and never after `[DONE]`.
pub struct SseDeltas<I> {
    chunks: I,
    decoder: SseDeltaDecoder,
    pending: VecDeque<String>,
    exhausted: bool,
}

impl<I> SseDeltas<I> {
    pub fn new(chunks: I) -> Self {
        Self {
            chunks,
            decoder: SseDeltaDecoder::new(),
            pending: VecDeque::new(),
            exhausted: false,
        }
    }
}

impl<I, S> Iterator for SseDeltas<I>
where
    I: Iterator<Item = S>,
    S: AsRef<[u8]>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(delta) = self.pending.pop_front() {
                return Some(delta);
            }
            if self.exhausted || self.decoder.is_done() {
                return None;
            }
            match self.chunks.next() {
                Some(chunk) => self.pending.extend(self.decoder.feed_bytes(chunk.as_ref())),
                None => {
                    self.exhausted = true;
                    self.pending.extend(self.decoder.finish());
                }
            }
        }
    }
}

/// Content deltas of a streamed response body, ending at `[DONE]`.
pub fn delta_stream(response: Response) -> DeltaStream {
    let stream = response
        .bytes_stream()
        .eventsource()
        .map(|event| match event {
            Ok(event) => Ok(parse_event_data(&event.data)),
            Err(e) => Err(LLMError::Stream(e.to_string())),
        })
        .take_while(|item| future::ready(!matches!(item, Ok(SseData::Done))))
        .filter_map(|item| async move {
            match item {
                Ok(SseData::Delta(delta)) => Some(Ok(delta)),
                Ok(_) => None,
                Err(err) => Some(Err(err)),
            }
        });

    Box::pin(stream)
}
