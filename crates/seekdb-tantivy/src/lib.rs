//! Tantivy-backed search driver.
//!
//! Lowers the core query expressions into tantivy query objects, executes
//! compound searches against a host-owned index, and forwards document
//! mutations to the index writer.

mod compile;
pub mod driver;

pub use driver::TantivyDriver;
