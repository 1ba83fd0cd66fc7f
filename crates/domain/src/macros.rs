//! Macro for implementing Display and FromStr for status enums
//!
//! The provider reports statuses as lowercase strings (`in_progress`,
//! `three_days`, ...). This macro keeps the wire spelling in one place and
//! derives both directions of the conversion from it.
//!
//! # Example
//!
//! ```rust
//! use esignbridge_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum DeliveryStatus {
//!     Pending,
//!     Delivered,
//! }
//!
//! impl_domain_status_conversions!(DeliveryStatus {
//!     Pending => "pending",
//!     Delivered => "delivered",
//! });
//! ```

/// Implements Display and FromStr traits for status enums
///
/// This macro generates:
/// - Display trait: writes the wire spelling of the variant
/// - FromStr trait: parses case-insensitive strings to enum variants
/// - `as_str()`: the wire spelling as a `&'static str`
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire spelling of this status.
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

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
