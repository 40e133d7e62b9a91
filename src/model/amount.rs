//! Amount type for handling monetary values written in the pt-BR locale.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that use
//! a comma as the decimal separator, e.g. `1234,56`. Parsing never fails: text that does not start
//! with a number becomes zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Parses a locale-formatted number into a `Decimal`.
///
/// The first comma is treated as the decimal separator and replaced with a period, then the
/// longest leading numeric prefix is parsed, so `"12abc"` is `12`. Empty strings, stray text and
/// values that cannot be represented all become zero.
///
/// Values outside the range of `Decimal` (about ±7.9e28), such as `"1e30"`, cannot be represented
/// and also become zero.
///
/// ```
/// # use cash_audit::model::parse_locale_number;
/// # use rust_decimal::Decimal;
/// # use std::str::FromStr;
/// assert_eq!(parse_locale_number("1234,56"), Decimal::from_str("1234.56").unwrap());
/// assert_eq!(parse_locale_number(""), Decimal::ZERO);
/// assert_eq!(parse_locale_number("n/a"), Decimal::ZERO);
/// ```
pub fn parse_locale_number(raw: &str) -> Decimal {
    let replaced = raw.replacen(',', ".", 1);
    float_prefix(&replaced).unwrap_or(Decimal::ZERO)
}

/// Scans the leading `[+-]digits[.digits][e[+-]digits]` of `s`, ignoring leading whitespace.
fn float_prefix(s: &str) -> Option<Decimal> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut negative = false;

    if let Some(&sign) = bytes.first() {
        if sign == b'-' || sign == b'+' {
            negative = sign == b'-';
            i += 1;
        }
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = &s[frac_start..j];
        i = j;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut mantissa = String::with_capacity(i + 2);
    if negative {
        mantissa.push('-');
    }
    mantissa.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        mantissa.push('.');
        mantissa.push_str(frac_digits);
    }

    match exponent(&s[i..]) {
        Some(exp) => Decimal::from_scientific(&format!("{mantissa}e{exp}")).ok(),
        None => Decimal::from_str(&mantissa).ok(),
    }
}

/// Returns the exponent if `rest` starts with a complete `e[+-]digits` suffix.
fn exponent(rest: &str) -> Option<&str> {
    let after_e = rest.strip_prefix(['e', 'E'])?;
    let unsigned = after_e.strip_prefix(['-', '+']).unwrap_or(after_e);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let sign_len = after_e.len() - unsigned.len();
    Some(&after_e[..sign_len + digits])
}

/// Represents a monetary value in Brazilian reais.
///
/// `Display` renders the value the way operators read it on the dashboard, e.g. `R$ 1.234,56`,
/// while serialization uses the plain decimal text (`1234.56`) so that the value survives a round
/// trip through JSON without locale concerns.
///
/// ```
/// # use cash_audit::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-1234,5").unwrap();
/// assert_eq!(amount.to_string(), "-R$ 1.234,50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }
}

impl FromStr for Amount {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Amount(parse_locale_number(s)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp(2);
        let sign = if !rounded.is_zero() && rounded.is_sign_negative() {
            "-"
        } else {
            ""
        };
        let us = format_num::format_num!(",.2", rounded.abs().to_f64().unwrap_or_default());
        // Swap the separators: 1,234.56 -> 1.234,56
        let br: String = us
            .chars()
            .map(|c| match c {
                ',' => '.',
                '.' => ',',
                other => other,
            })
            .collect();
        write!(f, "{sign}R$ {br}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.normalize().to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Amount(parse_locale_number(&s)))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
