//! Core type definitions.

mod credentials;
mod timestamp;

pub use credentials::Credentials;
pub use timestamp::TimestampFormat;
