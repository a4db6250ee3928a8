//! Service layer for domain logic.
//!
//! Pure computations that sit between stored documents and the HTTP layer:
//! crowd level classification and booking code generation. Nothing here
//! touches storage directly.

pub mod booking_code;

pub mod crowd;

pub use booking_code::BookingCode;
pub use crowd::{classify, crowd_level, BookingCounts, CrowdLevel, CrowdLevelError};
