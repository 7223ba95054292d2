pub mod acquirer;
pub mod boc;
pub mod direct;
pub mod relay;
pub mod source;
pub mod util;

// Re-export the pieces callers compose
pub use acquirer::Acquirer;
pub use boc::BocRateProvider;
pub use source::{SourcePage, SourceStrategy};
