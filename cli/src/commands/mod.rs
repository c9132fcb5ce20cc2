//! Command handlers, one module per command family.

pub mod grant;
pub mod ngo;
pub mod verify;
