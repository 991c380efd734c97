//! Infrastructure implementation of the `Console` port.
//!
//! `Session` owns one bidirectional byte channel to a running console: the
//! stdin/stdout of an `ssh -tt` child in production, one half of an
//! in-memory duplex in tests. Output is buffered as text; expectations scan
//! the whole buffer and consume it up to the end of the match.

use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::application::ports::{Console, Matched};
use crate::domain::ConsoleError;
use crate::domain::config::Timeouts;

/// How long `close` waits for the transport process before killing it.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

const READ_CHUNK: usize = 4096;

/// Interrupt character (Ctrl-C).
const INTERRUPT: u8 = 0x03;

/// Which way a traced chunk travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

/// One entry of the session's diagnostic trace.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub at: DateTime<Utc>,
    pub direction: Direction,
    pub text: String,
}

/// Outcome of waiting on the receive buffer.
enum Wait {
    Found(usize, Matched),
    TimedOut,
    Eof,
}

/// Console session over an `ssh -tt` child process.
pub type SshSession = Session<ChildStdout, ChildStdin>;

/// A console session over any async byte channel.
pub struct Session<R, W> {
    reader: R,
    writer: W,
    child: Option<Child>,
    buffer: String,
    pending: Vec<u8>,
    trace: Vec<TraceEvent>,
    timeouts: Timeouts,
    closed: bool,
    eof: bool,
}

impl<R, W> Session<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    #[must_use]
    pub fn new(reader: R, writer: W, timeouts: Timeouts) -> Self {
        Self {
            reader,
            writer,
            child: None,
            buffer: String::new(),
            pending: Vec::new(),
            trace: Vec::new(),
            timeouts,
            closed: false,
            eof: false,
        }
    }

    /// Attaches the process that owns the channel, so `close` can reap it.
    #[must_use]
    pub fn with_child(mut self, child: Child) -> Self {
        self.child = Some(child);
        self
    }

    /// Everything sent and received so far, in order.
    #[must_use]
    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    /// Output received but not yet consumed by an expectation.
    #[must_use]
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn record(&mut self, direction: Direction, text: &str) {
        trace!(?direction, text, "console");
        self.trace.push(TraceEvent {
            at: Utc::now(),
            direction,
            text: text.to_string(),
        });
    }

    fn receive(&mut self, bytes: &[u8]) {
        let text = decode_utf8(&mut self.pending, bytes);
        if !text.is_empty() {
            self.record(Direction::Received, &text);
            self.buffer.push_str(&text);
        }
    }

    /// First pattern, in list order, that matches anywhere in the buffer.
    fn scan(&mut self, patterns: &[&Regex]) -> Option<(usize, Matched)> {
        let (index, range) = patterns
            .iter()
            .enumerate()
            .find_map(|(i, re)| re.find(&self.buffer).map(|m| (i, m.range())))?;
        let matched = Matched {
            before: self.buffer[..range.start].to_string(),
            text: self.buffer[range.clone()].to_string(),
        };
        self.buffer.drain(..range.end);
        Some((index, matched))
    }

    async fn wait_for(&mut self, patterns: &[&Regex], timeout: Duration) -> Result<Wait, ConsoleError> {
        if self.closed {
            return Err(ConsoleError::Closed);
        }
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some((index, matched)) = self.scan(patterns) {
                return Ok(Wait::Found(index, matched));
            }
            if self.eof {
                return Ok(Wait::Eof);
            }
            match tokio::time::timeout_at(deadline, self.reader.read(&mut chunk)).await {
                Err(_) => return Ok(Wait::TimedOut),
                Ok(Ok(0)) => {
                    self.eof = true;
                    if !self.pending.is_empty() {
                        let tail = String::from_utf8_lossy(&self.pending).into_owned();
                        self.pending.clear();
                        self.record(Direction::Received, &tail);
                        self.buffer.push_str(&tail);
                    }
                }
                Ok(Ok(n)) => self.receive(&chunk[..n]),
                Ok(Err(e)) => return Err(e.into()),
            }
        }
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), ConsoleError> {
        if self.closed {
            return Err(ConsoleError::Closed);
        }
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

impl<R, W> Console for Session<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    async fn send(&mut self, text: &str) -> Result<(), ConsoleError> {
        let line = format!("{text}\n");
        self.write(line.as_bytes()).await?;
        self.record(Direction::Sent, &line);
        Ok(())
    }

    async fn send_interrupt(&mut self) -> Result<(), ConsoleError> {
        self.write(&[INTERRUPT]).await?;
        self.record(Direction::Sent, "^C");
        Ok(())
    }

    async fn expect(&mut self, pattern: &Regex, timeout: Duration) -> Result<Matched, ConsoleError> {
        match self.wait_for(&[pattern], timeout).await? {
            Wait::Found(_, matched) => Ok(matched),
            Wait::TimedOut => Err(ConsoleError::Timeout {
                pattern: pattern.as_str().to_string(),
                waited: timeout,
            }),
            Wait::Eof => Err(ConsoleError::NoMatch {
                patterns: vec![pattern.as_str().to_string()],
            }),
        }
    }

    async fn expect_branch<T>(
        &mut self,
        branches: &[(Regex, T)],
        timeout: Duration,
    ) -> Result<(T, Matched), ConsoleError>
    where
        T: Copy + Send + Sync,
    {
        let patterns: Vec<&Regex> = branches.iter().map(|(re, _)| re).collect();
        match self.wait_for(&patterns, timeout).await? {
            Wait::Found(index, matched) => Ok((branches[index].1, matched)),
            Wait::TimedOut | Wait::Eof => Err(ConsoleError::NoMatch {
                patterns: patterns.iter().map(|re| re.as_str().to_string()).collect(),
            }),
        }
    }

    fn discard_pending(&mut self) {
        if !self.buffer.is_empty() {
            debug!(bytes = self.buffer.len(), "discarding unconsumed console output");
        }
        self.buffer.clear();
    }

    async fn close(&mut self) -> Result<(), ConsoleError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if let Err(e) = self.writer.shutdown().await {
            debug!(error = %e, "console channel shutdown failed");
        }
        if let Some(mut child) = self.child.take() {
            match tokio::time::timeout(CLOSE_GRACE, child.wait()).await {
                Ok(status) => {
                    let status = status?;
                    debug!(%status, "console transport exited");
                }
                Err(_) => {
                    debug!("console transport did not exit; killing it");
                    child.kill().await?;
                }
            }
        }
        Ok(())
    }
}

/// Appends `bytes` to the undecoded tail in `pending` and returns the text
/// that is complete. An incomplete trailing sequence stays in `pending`;
/// invalid sequences decode to U+FFFD.
pub(crate) fn decode_utf8(pending: &mut Vec<u8>, bytes: &[u8]) -> String {
    pending.extend_from_slice(bytes);
    let mut out = String::new();
    loop {
        match std::str::from_utf8(pending) {
            Ok(text) => {
                out.push_str(text);
                pending.clear();
                return out;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&pending[..valid]));
                match e.error_len() {
                    None => {
                        pending.drain(..valid);
                        return out;
                    }
                    Some(len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        pending.drain(..valid + len);
                    }
                }
            }
        }
    }
}
