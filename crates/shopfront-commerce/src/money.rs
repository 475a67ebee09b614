//! Money type for representing monetary values.
//!
//! Amounts are integer counts of the currency's minor unit (paise, cents),
//! so sums and comparisons never drift the way floating point does.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "INR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "₹").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "\u{20b9}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Minor units per major unit (100 for two decimal places).
    pub fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub const fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a Money value from whole major units (rupees, dollars).
    ///
    /// Returns `None` on overflow.
    pub fn from_major(units: i64, currency: Currency) -> Option<Self> {
        units
            .checked_mul(currency.minor_per_major())
            .map(|amount| Self::new(amount, currency))
    }

    /// Parse a decimal amount such as `"49.99"` exactly.
    ///
    /// More fractional digits than the currency carries are rejected rather
    /// than rounded.
    ///
    /// ```
    /// use shopfront_commerce::money::{Currency, Money};
    /// let price = Money::parse("49.99", Currency::INR).unwrap();
    /// assert_eq!(price.amount_minor, 4999);
    /// ```
    pub fn parse(input: &str, currency: Currency) -> Result<Self, CommerceError> {
        let invalid = || CommerceError::InvalidAmount(input.to_string());
        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        let places = currency.decimal_places() as usize;
        if whole.is_empty()
            || fraction.len() > places
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
            || (digits.contains('.') && fraction.is_empty())
        {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let mut minor: i64 = 0;
        if !fraction.is_empty() {
            let padded = format!("{:0<width$}", fraction, width = places);
            minor = padded.parse().map_err(|_| invalid())?;
        }

        let amount = whole
            .checked_mul(currency.minor_per_major())
            .and_then(|a| a.checked_add(minor))
            .ok_or(CommerceError::Overflow)?;
        Ok(Self::new(if negative { -amount } else { amount }, currency))
    }

    /// Create a zero amount in the given currency.
    pub const fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Add another Money value.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.check_currency(other)?;
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Result<Money, CommerceError> {
        self.check_currency(other)?;
        self.amount_minor
            .checked_sub(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by an integer factor such as a quantity.
    pub fn try_multiply(&self, factor: i64) -> Result<Money, CommerceError> {
        self.amount_minor
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Take a rate expressed in basis points (1/100 of a percent).
    ///
    /// Rounds half away from zero to the minor unit.
    pub fn basis_points(&self, bps: u32) -> Result<Money, CommerceError> {
        let scaled = i128::from(self.amount_minor) * i128::from(bps);
        let half = if scaled < 0 { -5_000 } else { 5_000 };
        let rounded = (scaled + half) / 10_000;
        i64::try_from(rounded)
            .map(|amount| Money::new(amount, self.currency))
            .map_err(|_| CommerceError::Overflow)
    }

    /// Sum an iterator of Money values.
    pub fn try_sum<'a>(
        iter: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    /// Format as a display string (e.g., "₹49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let per_major = self.currency.minor_per_major().unsigned_abs();
        let abs = self.amount_minor.unsigned_abs();
        let places = self.currency.decimal_places() as usize;
        if places == 0 {
            return format!("{}{}", sign, abs);
        }
        format!(
            "{}{}.{:0places$}",
            sign,
            abs / per_major,
            abs % per_major,
            places = places
        )
    }

    fn check_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
