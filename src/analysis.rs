pub mod aggregate;
pub mod classify;
pub mod correlation;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod records;
