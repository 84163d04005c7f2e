//! Portal services.

pub mod session;
