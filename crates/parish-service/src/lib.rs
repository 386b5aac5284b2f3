//! Domain services for Parish. Each service owns a handle to the storage
//! provider, validates its input, and takes one connection per operation.

pub mod error;
pub mod family;
pub mod member;
pub mod offering;
pub mod password;
pub mod prayer;
mod refs;
pub mod seed;
pub mod services;
pub mod system;

pub use services::Services;

#[cfg(test)]
mod testing;
