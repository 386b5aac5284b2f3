//! Statement builders and the per-entity queries built on them.

pub mod column;
pub mod insert;
pub mod select;
pub mod update;

pub mod family;
pub mod member;
pub mod offering;
pub mod prayer;
pub mod system;
pub mod user;

pub use column::Column;
pub use insert::InsertQuery;
pub use select::{Direction, Op, SelectQuery};
pub use update::{UpdateOutcome, UpdateQuery};
