// Domain: exact currency amounts and their conversions at the f64 boundary
// Engine values are rounded and clamped against the original integer bounds on the way out

use alloy_primitives::U256;

/// Currency amount in the pool's smallest unit.
pub type Amount = U256;

/// Converts an amount into the engine's floating point domain.
///
/// Goes through the decimal representation so any width converts with
/// correct rounding.
pub fn to_f64(amount: Amount) -> f64 {
    amount.to_string().parse::<f64>().unwrap_or(f64::INFINITY)
}

/// Signed difference `a - b` as `f64`, computed exactly before conversion.
pub fn signed_difference(a: Amount, b: Amount) -> f64 {
    if a >= b {
        to_f64(a - b)
    } else {
        -to_f64(b - a)
    }
}

/// Rounds an engine value to the nearest non-negative integer amount.
///
/// Negative values round to zero. Returns `None` for values that are not
/// finite or do not fit into an [`Amount`].
pub fn from_f64_rounded(value: f64) -> Option<Amount> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    if rounded <= 0.0 {
        return Some(Amount::ZERO);
    }
    format!("{:.0}", rounded).parse::<Amount>().ok()
}

/// Whether `value` lies within `tolerance` of an integer.
///
/// The tolerance is relative for magnitudes above one.
pub fn is_near_integer(value: f64, tolerance: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    (value - value.round()).abs() <= tolerance * value.abs().max(1.0)
}

/// Decimal string (de)serialization for [`Amount`].
///
/// Accepts decimal strings, `0x` hex strings and plain JSON integers on input.
pub mod serde_decimal {
    use super::Amount;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    pub(super) struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a non-negative integer or integer string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(Amount::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            u64::try_from(v)
                .map(Amount::from)
                .map_err(|_| E::custom(format!("amount must not be negative: {}", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            v.trim()
                .parse::<Amount>()
                .map_err(|e| E::custom(format!("invalid amount '{}': {}", v, e)))
        }
    }
}

/// Same as [`serde_decimal`] for optional amounts.
pub mod serde_decimal_opt {
    use super::serde_decimal::AmountVisitor;
    use super::Amount;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        amount: &Option<Amount>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match amount {
            Some(amount) => serializer.serialize_some(&amount.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Amount>, D::Error> {
        deserializer.deserialize_option(OptionVisitor)
    }

    struct OptionVisitor;

    impl<'de> Visitor<'de> for OptionVisitor {
        type Value = Option<Amount>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "null, a non-negative integer or integer string")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(AmountVisitor).map(Some)
        }
    }
}
