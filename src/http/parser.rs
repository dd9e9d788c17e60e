use std::fmt;
use std::io;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::request::{Method, ParsedRequest, Request};

/// Upper bound on lines read from one request head, request line included.
pub const MAX_HEAD_LINES: usize = 5;

/// Upper bound on the length of a single head line, line ending excluded.
pub const MAX_LINE_LEN: usize = 8192;

const READ_CHUNK: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line did not split into method, target and version
    WrongTokenCount(usize),
    /// Method other than GET
    UnsupportedMethod(String),
    /// Target not starting with '/'
    InvalidTarget(String),
    /// Request line exceeded MAX_LINE_LEN
    LineTooLong,
    /// Line budget spent on blank lines
    MissingRequestLine,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::WrongTokenCount(n) => write!(f, "expected 3 tokens, got {}", n),
            ParseError::UnsupportedMethod(m) => write!(f, "unsupported method {:?}", m),
            ParseError::InvalidTarget(t) => write!(f, "target {:?} does not start with '/'", t),
            ParseError::LineTooLong => write!(f, "request line longer than {} bytes", MAX_LINE_LEN),
            ParseError::MissingRequestLine => write!(f, "no request line within {} lines", MAX_HEAD_LINES),
        }
    }
}

impl std::error::Error for ParseError {}

/// Validates a single request line.
///
/// The line is split on single spaces and must yield exactly
/// `GET <target> <version>` with a target starting with `/`. A trailing line
/// ending is ignored, as are trailing spaces.
pub fn parse_request_line(line: &str) -> ParsedRequest {
    let line = line.trim_end_matches(['\r', '\n']);

    let mut tokens: Vec<&str> = line.split(' ').collect();
    while tokens.last() == Some(&"") {
        tokens.pop();
    }

    if tokens.len() != 3 {
        return ParsedRequest::Invalid(ParseError::WrongTokenCount(tokens.len()));
    }

    let Some(method) = Method::from_str(tokens[0]) else {
        return ParsedRequest::Invalid(ParseError::UnsupportedMethod(tokens[0].to_string()));
    };

    let path = tokens[1];
    if !path.starts_with('/') {
        return ParsedRequest::Invalid(ParseError::InvalidTarget(path.to_string()));
    }

    ParsedRequest::Valid(Request {
        method,
        path: path.to_string(),
        version: tokens[2].to_string(),
    })
}

#[derive(Debug, PartialEq, Eq)]
enum HeadLine {
    Text(String),
    Blank,
    TooLong,
    Eof,
    Exhausted,
}

/// Line-oriented reader for the request head.
///
/// Reads at most [`MAX_HEAD_LINES`] lines in total, no matter how many
/// header lines the client sends. Bytes past the consumed lines stay in the
/// internal buffer and are never looked at.
#[derive(Debug)]
pub struct HeadReader {
    buffer: BytesMut,
    lines_read: usize,
    done: bool,
    read_timeout: Option<Duration>,
}

impl Default for HeadReader {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadReader {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(READ_CHUNK),
            lines_read: 0,
            done: false,
            read_timeout: None,
        }
    }

    /// Fails each read that takes longer than `timeout` with `TimedOut`.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Lines consumed so far, blank ones included.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Reads and parses the first non-empty line.
    ///
    /// Returns `None` if the peer closed the connection before sending one.
    pub async fn read_request_line<R>(&mut self, stream: &mut R) -> io::Result<Option<ParsedRequest>>
    where
        R: AsyncRead + Unpin,
    {
        loop {
            match self.next_line(stream).await? {
                HeadLine::Blank => continue,
                HeadLine::Text(line) => return Ok(Some(parse_request_line(&line))),
                HeadLine::TooLong => {
                    return Ok(Some(ParsedRequest::Invalid(ParseError::LineTooLong)));
                }
                HeadLine::Exhausted => {
                    return Ok(Some(ParsedRequest::Invalid(ParseError::MissingRequestLine)));
                }
                HeadLine::Eof => return Ok(None),
            }
        }
    }

    /// Discards header lines up to the blank line that ends the head.
    ///
    /// Stops early when the line budget runs out, a line is too long, or the
    /// peer closes. Returns the number of header lines discarded.
    pub async fn drain_headers<R>(&mut self, stream: &mut R) -> io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        let mut discarded = 0;

        while let HeadLine::Text(line) = self.next_line(stream).await? {
            tracing::trace!(header = %line, "Discarding header line");
            discarded += 1;
        }

        Ok(discarded)
    }

    async fn next_line<R>(&mut self, stream: &mut R) -> io::Result<HeadLine>
    where
        R: AsyncRead + Unpin,
    {
        if self.done {
            return Ok(HeadLine::Eof);
        }
        if self.lines_read >= MAX_HEAD_LINES {
            return Ok(HeadLine::Exhausted);
        }

        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let raw = self.buffer.split_to(pos + 1);
                return Ok(self.finish_line(&raw));
            }

            if self.buffer.len() > MAX_LINE_LEN {
                self.done = true;
                return Ok(HeadLine::TooLong);
            }

            if self.fill(stream).await? == 0 {
                self.done = true;

                // A final line without a terminator still counts.
                if self.buffer.is_empty() {
                    return Ok(HeadLine::Eof);
                }
                let raw = self.buffer.split();
                return Ok(self.finish_line(&raw));
            }
        }
    }

    fn finish_line(&mut self, raw: &[u8]) -> HeadLine {
        self.lines_read += 1;

        let content = trim_line_ending(raw);
        if content.len() > MAX_LINE_LEN {
            self.done = true;
            return HeadLine::TooLong;
        }
        if content.is_empty() {
            return HeadLine::Blank;
        }

        HeadLine::Text(String::from_utf8_lossy(content).into_owned())
    }

    async fn fill<R>(&mut self, stream: &mut R) -> io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        let mut temp = [0u8; READ_CHUNK];

        let n = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, stream.read(&mut temp))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "timed out reading request head"))??,
            None => stream.read(&mut temp).await?,
        };

        self.buffer.extend_from_slice(&temp[..n]);
        Ok(n)
    }
}

fn trim_line_ending(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}
