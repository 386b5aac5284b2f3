//! Core types shared by every Parish crate: configuration, route constants,
//! pagination bounds, validation helpers and the domain vocabulary enums.

pub mod config;
pub mod constants;
pub mod error;
pub mod page;
pub mod types;
pub mod validate;
