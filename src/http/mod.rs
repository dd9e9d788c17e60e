//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.0 subset: one `GET` per connection, answered
//! with a static file or a bare status line, then the connection closes.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine driving the other parts
//! - **`parser`**: Request line validation and the bounded head reader
//! - **`request`**: Parsed request representation
//! - **`response`**: Status codes and response outcomes
//! - **`files`**: Maps request targets to files under the document root
//! - **`mime`**: Content-Type detection based on file extensions
//! - **`writer`**: Serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ ReadRequestLine  │ ← First non-empty line of the head
//!        └──────┬───────────┘
//!       valid   │   invalid ──────────────┐
//!               ▼                         │
//!        ┌──────────────────┐             │
//!        │    Dispatch      │ ← Resolve target to a file
//!        └──────┬───────────┘             │
//!               ▼                         ▼
//!        ┌──────────────────────────────────┐
//!        │          WriteResponse           │ ← 200 / 301 / 404 / 400
//!        └──────┬───────────────────────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │  DrainHeaders    │ ← Discard the rest of the head (bounded)
//!        └──────┬───────────┘
//!               ▼
//!        Close → Terminated (slot released)
//! ```
//!
//! A client that disconnects before sending a request line goes straight
//! to `Close`. An I/O error in any state abandons the remaining steps.

pub mod connection;
pub mod files;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
