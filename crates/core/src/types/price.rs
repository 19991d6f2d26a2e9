//! Fixed-point money amounts.
//!
//! Prices travel over the wire as decimal strings ("19.99") and are stored in
//! `NUMERIC(10, 2)` columns. Wrapping [`Decimal`] keeps the round-trip exact:
//! a course created with price "19.99" reads back as "19.99", never
//! 19.990000000000002. Amounts are normalized to exactly two decimal places
//! on construction ("7.5" becomes "7.50"), matching what the `NUMERIC(10, 2)`
//! column hands back, so the volatile and persistent stores agree on the
//! wire string.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Not a decimal number.
    #[error("price must be a decimal number")]
    Invalid,
    /// Negative amounts are not allowed.
    #[error("price cannot be negative")]
    Negative,
    /// More than two decimal places.
    #[error("price must have at most 2 decimal places")]
    TooPrecise,
}

/// A non-negative money amount, held at exactly two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price from its string encoding (e.g. "19.99").
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the input is not a decimal number, is
    /// negative, or carries more than two decimal places.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(input.trim()).map_err(|_| PriceError::Invalid)?;
        Self::from_decimal(amount)
    }

    /// Wrap a raw decimal, enforcing the sign and scale constraints and
    /// normalizing to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the amount is negative or has more than two
    /// decimal places.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }
        if amount.scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        let mut amount = amount;
        amount.rescale(2);
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a decimal string with at most 2 decimal places")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Price, E> {
        Price::parse(value).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(PriceVisitor)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_decimal(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
