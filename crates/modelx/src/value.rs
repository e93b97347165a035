//! Bindable field values and their zero predicate.
//!
//! Every field that takes part in a generated statement is read as a [`SqlValue`]: something
//! that can be sent to Postgres ([`ToSql`]) and that knows whether it holds its type's zero
//! value ([`IsZero`]). The zero predicate only matters for the key column of an INSERT,
//! where a zero key is left out so the database can generate one.
//!
//! | type | zero when |
//! |------|-----------|
//! | integers | `== 0` |
//! | `f32` / `f64` | positive zero (`-0.0` is a set value) |
//! | `bool` | `false` |
//! | `String` / `&str` | empty |
//! | `Vec<T>` | empty |
//! | `Option<T>` | `None` (`Some(0)` is not zero) |
//! | `uuid::Uuid` | nil |
//! | `serde_json::Value` | `Null` |
//! | chrono `NaiveDate` / `NaiveTime` / `NaiveDateTime` | equal to `Default` (epoch / midnight) |
//! | chrono `DateTime<Tz>` | the Unix epoch |
//! | `rust_decimal::Decimal` (feature) | zero |
//! | `time::OffsetDateTime` (feature) | the Unix epoch |

use tokio_postgres::types::ToSql;

/// Whether a value equals the zero value of its type.
///
/// Implement this (together with [`ToSql`]) to use custom types as record fields.
pub trait IsZero {
    fn is_zero(&self) -> bool;
}

/// A field value that can be bound to a statement.
///
/// Implemented for every `T: ToSql + IsZero + Sync`; use it as `&dyn SqlValue`.
pub trait SqlValue: ToSql + Sync {
    /// Whether the value is its type's zero value.
    fn is_zero(&self) -> bool;

    /// View the value as a tokio-postgres parameter.
    fn as_sql(&self) -> &(dyn ToSql + Sync);
}

impl<T> SqlValue for T
where
    T: ToSql + IsZero + Sync,
{
    fn is_zero(&self) -> bool {
        IsZero::is_zero(self)
    }

    fn as_sql(&self) -> &(dyn ToSql + Sync) {
        self
    }
}

macro_rules! impl_is_zero_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IsZero for $ty {
                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_is_zero_int!(i8, i16, i32, i64, u32);

impl IsZero for f32 {
    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}

impl IsZero for f64 {
    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}

impl IsZero for bool {
    fn is_zero(&self) -> bool {
        !*self
    }
}

impl IsZero for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for &str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsZero for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsZero for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl IsZero for uuid::Uuid {
    fn is_zero(&self) -> bool {
        self.is_nil()
    }
}

impl IsZero for serde_json::Value {
    fn is_zero(&self) -> bool {
        self.is_null()
    }
}

impl IsZero for chrono::NaiveDate {
    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl IsZero for chrono::NaiveTime {
    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl IsZero for chrono::NaiveDateTime {
    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl<Tz: chrono::TimeZone> IsZero for chrono::DateTime<Tz> {
    fn is_zero(&self) -> bool {
        self.timestamp() == 0 && self.timestamp_subsec_nanos() == 0
    }
}

#[cfg(feature = "rust_decimal")]
impl IsZero for rust_decimal::Decimal {
    fn is_zero(&self) -> bool {
        rust_decimal::Decimal::is_zero(self)
    }
}

#[cfg(feature = "time")]
impl IsZero for time::OffsetDateTime {
    fn is_zero(&self) -> bool {
        *self == time::OffsetDateTime::UNIX_EPOCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn zero(v: &dyn SqlValue) -> bool {
        v.is_zero()
    }

    #[test]
    fn numbers() {
        assert!(zero(&0_i32));
        assert!(zero(&0_i64));
        assert!(zero(&0_i16));
        assert!(zero(&0_u32));
        assert!(!zero(&10_i64));
        assert!(!zero(&-1_i32));
        assert!(zero(&0.0_f64));
        assert!(!zero(&0.5_f32));
    }

    #[test]
    fn negative_zero_is_not_zero() {
        assert!(zero(&0.0_f32));
        assert!(!zero(&-0.0_f32));
        assert!(!zero(&-0.0_f64));
        assert!(!zero(&f64::NAN));
    }

    #[test]
    fn text_and_bool() {
        assert!(zero(&String::new()));
        assert!(!zero(&"foo".to_string()));
        assert!(zero(&""));
        assert!(zero(&false));
        assert!(!zero(&true));
    }

    #[test]
    fn option_is_zero_only_when_none() {
        assert!(zero(&None::<i64>));
        assert!(!zero(&Some(0_i64)));
        assert!(!zero(&Some(String::new())));
    }

    #[test]
    fn collections_uuid_and_json() {
        assert!(zero(&Vec::<i32>::new()));
        assert!(!zero(&vec![1_u8]));
        assert!(zero(&uuid::Uuid::nil()));
        assert!(!zero(&uuid::Uuid::new_v4()));
        assert!(zero(&serde_json::Value::Null));
        assert!(!zero(&serde_json::json!({})));
    }

    #[test]
    fn timestamps_are_zero_at_the_epoch() {
        assert!(zero(&Utc.timestamp_opt(0, 0).unwrap()));
        assert!(!zero(&Utc.timestamp_opt(0, 1).unwrap()));
        assert!(!zero(&Utc::now()));
        assert!(zero(&chrono::NaiveDateTime::default()));
        assert!(zero(&NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()));
        assert!(!zero(&NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
        assert!(zero(&chrono::NaiveTime::default()));
    }
}
