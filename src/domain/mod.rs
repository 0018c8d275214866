//! Domain layer for line-guard
//!
//! Pure data for line length enforcement: violations, run totals and errors.
//! Nothing here touches the filesystem.

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
