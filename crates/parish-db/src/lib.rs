//! Storage access for Parish: the SQL value model, the connection seam shared by
//! the hosted libSQL client and the local SQLite pool, the dynamic query
//! builders, and per-entity queries and models.

pub mod db;
pub mod error;
pub mod model;
