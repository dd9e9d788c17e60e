//! Connection acceptance and admission control
//!
//! - **`admission`**: bounded registry of active connection slots
//! - **`listener`**: the accepting loop that admits connections and spawns
//!   one task per connection

pub mod admission;
pub mod listener;

pub use admission::{ConnectionAdmitter, ConnectionSlot};
