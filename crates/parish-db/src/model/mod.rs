pub mod family;
pub mod member;
pub mod offering;
pub mod prayer;
pub mod system;
pub mod user;

/// Declares a row struct whose fields are read by column name, plus a
/// `COLUMNS` constant listing those names in declaration order. Queries for
/// the struct project exactly these columns, so the constant doubles as the
/// fallback projection when a driver omits column names.
macro_rules! record {
    ($(#[$meta:meta])* pub struct $name:ident {
        $($(#[$fmeta:meta])* pub $field:ident : $ty:ty),+ $(,)?
    }) => {
        $(#[$meta])*
        pub struct $name {
            $($(#[$fmeta])* pub $field: $ty,)+
        }

        impl $name {
            pub const COLUMNS: &'static [&'static str] = &[$(stringify!($field)),+];
        }

        impl $crate::db::result::FromRow for $name {
            fn from_row(row: &$crate::db::result::Row<'_>) -> $crate::error::DbResult<Self> {
                Ok(Self {
                    $($field: row.get(stringify!($field))?,)+
                })
            }
        }
    };
}

pub(crate) use record;

pub(crate) const fn default_true() -> bool {
    true
}
