//! Port traits for the engine's external collaborators.
//!
//! - `external` - credential verification and user directory
//! - `testing` - clock injection
//! - `error` - port error types

mod error;
mod external;
mod testing;

pub use error::DirectoryError;
pub use external::{DirectoryRecord, TokenVerifierPort, UserDirectoryPort};
pub use testing::ClockPort;

#[cfg(test)]
pub use external::{MockTokenVerifierPort, MockUserDirectoryPort};
