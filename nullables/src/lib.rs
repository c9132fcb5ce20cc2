//! Nullable chain access for deterministic testing.
//!
//! The chain reader and writer seams are abstracted behind traits in
//! `accesschain-types`. This crate provides in-memory implementations that
//! return scripted responses, record every interaction, and never touch a
//! network.
//!
//! Usage: swap the real chain implementations for nullables in tests.

pub mod reader;
pub mod writer;

pub use reader::NullChainReader;
pub use writer::NullChainWriter;
