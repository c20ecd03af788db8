//! Utilities shared by the binaries

pub mod shutdown;

pub use shutdown::ShutdownManager;
