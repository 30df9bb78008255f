//! Macro for implementing Display and FromStr for status-like enums
//!
//! Status enums are persisted as lowercase text columns and exchanged as
//! strings at the command boundary; this macro keeps both directions in one
//! table.
//!
//! # Example
//!
//! ```rust
//! use calbridge_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Visibility {
//!     Public,
//!     Private,
//! }
//!
//! impl_domain_status_conversions!(Visibility {
//!     Public => "public",
//!     Private => "private",
//! });
//!
//! assert_eq!(Visibility::Private.to_string(), "private");
//! assert_eq!("PUBLIC".parse::<Visibility>().unwrap(), Visibility::Public);
//! ```

/// Implements `Display` and case-insensitive `FromStr` for a fieldless enum.
///
/// Each `$variant => $str` pair maps a variant to its canonical lowercase
/// representation. Parsing failures return a `String` naming the enum.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string form, as stored in the database.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
