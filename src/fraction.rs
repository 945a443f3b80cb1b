// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Exact rational arithmetic for facility counts and recipe rates.
//!
//! Facility counts are exact mixed fractions all the way through the
//! pipeline; floats only appear at display boundaries (DOT labels,
//! SVG coordinates).

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::{Error, ErrorCode, ErrorKind, Result};

/// A normalized rational number: denominator > 0, gcd(numerator,
/// denominator) == 1.  Construction enforces the invariant; arithmetic
/// preserves it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: i64,
    den: i64,
}

/// Mixed-number decomposition of a [`Fraction`]: an integer part plus a
/// normalized proper-fraction remainder (denominator > 0,
/// 0 <= numerator < denominator).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedNumber {
    pub integer: i64,
    pub numerator: i64,
    pub denominator: i64,
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Reduce a rational computed in i128 intermediates and narrow back to
/// i64 storage, or `None` if it does not fit after reduction.  The
/// denominator must be nonzero.
fn reduce(num: i128, den: i128) -> Option<Fraction> {
    let sign = if den < 0 { -1 } else { 1 };
    let g = match gcd(num, den) {
        0 => 1,
        g => g,
    };
    let num = i64::try_from(sign * num / g).ok()?;
    let den = i64::try_from(sign * den / g).ok()?;
    Some(Fraction { num, den })
}

/// Infallible construction for the operator impls, where both operands
/// came from small validated values.  Compounding arithmetic (chain
/// solving) goes through `checked_mul`/`checked_div` instead.
fn make(num: i128, den: i128) -> Fraction {
    assert!(den != 0, "internal fraction error: zero denominator");
    reduce(num, den).expect("internal fraction error: i64 overflow")
}

fn overflow_err(lhs: Fraction, op: char, rhs: Fraction) -> Error {
    Error::new(
        ErrorKind::Query,
        ErrorCode::BadFraction,
        Some(format!("{lhs} {op} {rhs} overflows")),
    )
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    pub fn new(num: i64, den: i64) -> Result<Fraction> {
        if den == 0 {
            return Err(Error::new(
                ErrorKind::Init,
                ErrorCode::BadFraction,
                Some(format!("zero denominator in {num}/{den}")),
            ));
        }
        Ok(make(num as i128, den as i128))
    }

    pub fn from_integer(n: i64) -> Fraction {
        Fraction { num: n, den: 1 }
    }

    pub fn numer(&self) -> i64 {
        self.num
    }

    pub fn denom(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_positive(&self) -> bool {
        self.num > 0
    }

    /// Multiplication that surfaces i64 overflow as an error instead of
    /// panicking.  Used in chain arithmetic, where counts compound
    /// level by level.
    pub fn checked_mul(self, rhs: Fraction) -> Result<Fraction> {
        reduce(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
        .ok_or_else(|| overflow_err(self, '*', rhs))
    }

    /// Division that surfaces a zero divisor or i64 overflow as an
    /// error instead of panicking.  Used where the divisor comes from
    /// loaded data.
    pub fn checked_div(self, rhs: Fraction) -> Result<Fraction> {
        if rhs.is_zero() {
            return Err(Error::new(
                ErrorKind::Query,
                ErrorCode::DivideByZero,
                Some(format!("{self} / 0")),
            ));
        }
        reduce(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
        .ok_or_else(|| overflow_err(self, '/', rhs))
    }

    /// Decompose into integer part and proper-fraction remainder.  Uses
    /// euclidean division so the remainder is always in [0, den).
    pub fn mixed(&self) -> MixedNumber {
        let integer = self.num.div_euclid(self.den);
        let numerator = self.num.rem_euclid(self.den);
        MixedNumber {
            integer,
            numerator,
            denominator: self.den,
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Fraction::ZERO
    }
}

impl Add for Fraction {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        make(
            self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Sub for Fraction {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        make(
            self.num as i128 * rhs.den as i128 - rhs.num as i128 * self.den as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Mul for Fraction {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        make(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Div for Fraction {
    type Output = Self;
    /// Panics on a zero divisor; use [`Fraction::checked_div`] when the
    /// divisor comes from external data.
    fn div(self, rhs: Self) -> Self {
        make(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // denominators are positive, so cross multiplication preserves order
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else if self.num.abs() < self.den {
            write!(f, "{}/{}", self.num, self.den)
        } else {
            let m = self.mixed();
            write!(f, "{}+{}/{}", m.integer, m.numerator, m.denominator)
        }
    }
}

fn parse_err(s: &str) -> Error {
    Error::new(
        ErrorKind::Init,
        ErrorCode::BadFraction,
        Some(format!("cannot parse '{s}' as a fraction")),
    )
}

/// Parses the dataset's fraction notation: `"3"`, `"2/3"`, `"16+2/3"`,
/// and decimal strings like `"2.5"`.
impl FromStr for Fraction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Fraction> {
        let s = s.trim();
        if s.is_empty() {
            return Err(parse_err(s));
        }

        let (integer, rest) = match s.split_once('+') {
            Some((int_part, fraction_part)) => {
                let integer: i64 = int_part.trim().parse().map_err(|_| parse_err(s))?;
                (integer, fraction_part.trim())
            }
            None => (0, s),
        };

        let fraction = if let Some((num, den)) = rest.split_once('/') {
            let num: i64 = num.trim().parse().map_err(|_| parse_err(s))?;
            let den: i64 = den.trim().parse().map_err(|_| parse_err(s))?;
            Fraction::new(num, den)?
        } else if let Some((whole, decimals)) = rest.split_once('.') {
            if decimals.is_empty() || decimals.len() > 9 || !decimals.bytes().all(|b| b.is_ascii_digit()) {
                return Err(parse_err(s));
            }
            // "-0.5" needs the sign tracked separately: the whole part
            // parses to 0 and loses it
            let negative = whole.starts_with('-');
            let whole: i64 = if whole.is_empty() {
                0
            } else {
                whole.parse().map_err(|_| parse_err(s))?
            };
            let frac_digits: i64 = decimals.parse().map_err(|_| parse_err(s))?;
            let scale = 10i64.pow(decimals.len() as u32);
            let decimal_part = Fraction::new(frac_digits, scale)?;
            if negative {
                Fraction::from_integer(whole) - decimal_part
            } else {
                Fraction::from_integer(whole) + decimal_part
            }
        } else {
            let n: i64 = rest.parse().map_err(|_| parse_err(s))?;
            Fraction::from_integer(n)
        };

        Ok(Fraction::from_integer(integer) + fraction)
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.den == 1 {
            serializer.serialize_i64(self.num)
        } else {
            serializer.collect_str(self)
        }
    }
}

struct FractionVisitor;

impl Visitor<'_> for FractionVisitor {
    type Value = Fraction;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an integer or a fraction string like '2/3' or '16+2/3'")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Fraction, E> {
        Ok(Fraction::from_integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Fraction, E> {
        i64::try_from(v)
            .map(Fraction::from_integer)
            .map_err(|_| E::custom(format!("integer out of range: {v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Fraction, E> {
        Fraction::from_str(&format!("{v}")).map_err(|err| E::custom(format!("{err}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Fraction, E> {
        Fraction::from_str(v).map_err(|err| E::custom(format!("{err}")))
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Fraction, D::Error> {
        deserializer.deserialize_any(FractionVisitor)
    }
}
