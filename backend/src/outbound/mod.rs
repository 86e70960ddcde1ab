//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local repositories for development and tests
//! - **cache**: in-process rendered page cache
//!
//! Adapters translate between domain types and their storage representation
//! and hold no business rules.

pub mod cache;
pub mod memory;
pub mod persistence;
