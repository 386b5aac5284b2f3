//! Closed vocabularies stored as text columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(CoreError::InvalidInput(format!(
                        concat!("unknown ", stringify!($name), " '{}'"),
                        other
                    ))),
                }
            }
        }
    };
}

text_enum!(
    /// Member gender as recorded in the church registry.
    Gender {
        Male => "남",
        Female => "여",
    }
);

text_enum!(
    /// Who may read a prayer request.
    Visibility {
        Public => "public",
        Members => "members",
        Private => "private",
    }
);

text_enum!(PrayerStatus {
    Active => "active",
    Answered => "answered",
    Completed => "completed",
});

text_enum!(LogLevel {
    Debug => "DEBUG",
    Info => "INFO",
    Warning => "WARNING",
    Error => "ERROR",
    Critical => "CRITICAL",
});

text_enum!(BackupType {
    Manual => "manual",
    Auto => "auto",
    Scheduled => "scheduled",
});

text_enum!(BackupStatus {
    Success => "success",
    Failed => "failed",
    InProgress => "in_progress",
});

text_enum!(
    /// How a system setting's text value should be interpreted by clients.
    SettingType {
        String => "string",
        Number => "number",
        Boolean => "boolean",
        Json => "json",
    }
);

impl Default for Visibility {
    fn default() -> Self {
        Self::Public
    }
}

impl Default for PrayerStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl Default for BackupStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

impl Default for SettingType {
    fn default() -> Self {
        Self::String
    }
}
