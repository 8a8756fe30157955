//! Message and completion types shared by the dispatcher and backends.

mod message;

pub use message::*;
