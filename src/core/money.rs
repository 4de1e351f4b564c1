//! Fixed-point money in integer cents.
//!
//! Every price in the system is held as a whole number of cents so that repeated
//! additions never drift. Conversion to a decimal string happens only when a
//! value is displayed.

use crate::errors::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// An amount of money with two-digit precision, stored as cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(0);

    /// Largest magnitude a menu may use for a price or a price delta ($1,000,000.00).
    pub const MENU_LIMIT: Self = Self(100_000_000);

    /// Builds an amount from a whole number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Whether the amount is strictly less than zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Whether the magnitude stays within [`Money::MENU_LIMIT`].
    #[must_use]
    pub const fn within_menu_limit(self) -> bool {
        self.0.unsigned_abs() <= Self::MENU_LIMIT.0.unsigned_abs()
    }

    /// Multiplies a unit amount by a quantity, saturating at the bounds of `i64` cents.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Parses a decimal string such as `"8"`, `"8.5"`, `"-0.25"` or `"12.50"`.
    ///
    /// Digits beyond the second decimal place are accepted only when they are zeros.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] when the text is not a plain decimal number.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidAmount {
            value: text.to_string(),
        };

        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        if fraction.len() > 2 && fraction[2..].bytes().any(|b| b != b'0') {
            return Err(invalid());
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut cents: i64 = 0;
        for (place, digit) in fraction.bytes().take(2).enumerate() {
            let value = i64::from(digit - b'0');
            cents += if place == 0 { value * 10 } else { value };
        }

        let total = dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -total } else { total }))
    }

    /// Converts a floating-point amount (as found in JSON menus) to cents,
    /// rounding to the nearest cent.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] for NaN, infinities, or values too large for cents.
    pub fn from_f64(value: f64) -> Result<Self> {
        // Largest magnitude that still fits comfortably in i64 cents.
        const LIMIT: f64 = 9.0e16;

        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() >= LIMIT {
            return Err(Error::InvalidAmount {
                value: value.to_string(),
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        let cents = cents as i64;
        Ok(Self(cents))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    /// Formats as `$12.50`, or `-$0.50` for negative amounts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

/// Menu files carry prices either as JSON numbers or as decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(value) => Self::from_f64(value),
            RawAmount::Text(text) => Self::parse(&text),
        }
        .map_err(serde::de::Error::custom)
    }
}
