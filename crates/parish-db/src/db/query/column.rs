/// A whitelisted column of one entity. Only these identifiers are ever
/// interpolated into SQL text; values are always bound.
pub trait Column: Copy + std::fmt::Debug + PartialEq {
    /// Bare column name, as used in `INSERT` column lists and `SET` clauses.
    fn name(self) -> &'static str;

    /// Name qualified with the table alias used by the entity's `SELECT`.
    fn qualified(self) -> &'static str;
}

/// Declares a column enum. With `as "alias"` the qualified form is `alias.column`.
macro_rules! columns {
    ($(#[$meta:meta])* $vis:vis enum $name:ident as $alias:literal {
        $($variant:ident => $sql:literal),+ $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)+
        }

        impl $crate::db::query::column::Column for $name {
            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $sql,)+
                }
            }

            fn qualified(self) -> &'static str {
                match self {
                    $(Self::$variant => concat!($alias, ".", $sql),)+
                }
            }
        }
    };
    ($(#[$meta:meta])* $vis:vis enum $name:ident {
        $($variant:ident => $sql:literal),+ $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)+
        }

        impl $crate::db::query::column::Column for $name {
            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $sql,)+
                }
            }

            fn qualified(self) -> &'static str {
                <Self as $crate::db::query::column::Column>::name(self)
            }
        }
    };
}

pub(crate) use columns;
