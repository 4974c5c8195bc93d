use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub},
    str::FromStr,
};

use crate::EngineError;

/// Maximum number of digits (integer + fraction) a decimal amount may carry.
pub const MAX_DIGITS: usize = 14;

const FRACTION_DIGITS: usize = 2;

/// Signed money amount represented as **integer cents**.
///
/// Every balance, transaction amount and budget plan in the ledger goes
/// through this type, so arithmetic never touches floating point.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(1234_50);
/// assert_eq!(amount.to_string(), "1234.50");
/// assert_eq!("1234,5".parse::<MoneyCents>().unwrap(), amount);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as separator, an optional leading `+`/`-`, at most
    /// two fraction digits and at most [`MAX_DIGITS`] digits overall.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |msg: &str| EngineError::Validation(format!("invalid amount: {msg}"));

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (int_part, frac_part) = match unsigned.find(['.', ',']) {
            Some(idx) => (&unsigned[..idx], &unsigned[idx + 1..]),
            None => (unsigned, ""),
        };

        if int_part.is_empty() {
            return Err(invalid("missing integer part"));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("not a decimal number"));
        }
        if frac_part.len() > FRACTION_DIGITS {
            return Err(invalid("at most 2 decimals are allowed"));
        }

        let int_digits = int_part.trim_start_matches('0');
        if int_digits.len() + FRACTION_DIGITS > MAX_DIGITS {
            return Err(invalid("too many digits"));
        }

        let mut cents: i64 = 0;
        let padded = frac_part.bytes().chain(std::iter::repeat(b'0'));
        for digit in int_digits
            .bytes()
            .chain(padded.take(FRACTION_DIGITS))
        {
            cents = cents * 10 + i64::from(digit - b'0');
        }

        Ok(MoneyCents(if negative { -cents } else { cents }))
    }
}
