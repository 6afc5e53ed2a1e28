use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use crate::EngineError;

/// Basis points in a whole (100%).
pub const FULL_BP: i64 = 10_000;

/// Largest amount a single record may carry: 10 trillion in cents.
pub const MAX_AMOUNT_MINOR: i64 = 1_000_000_000_000_000;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary arithmetic in the engine (receipts,
/// distributions, costs) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns the `share` of this amount, rounded half away from zero to
    /// the cent.
    ///
    /// ```rust
    /// use engine::{BasisPoints, MoneyCents};
    ///
    /// let share = MoneyCents::new(1001).share(BasisPoints::new(5000));
    /// assert_eq!(share.cents(), 501);
    /// ```
    #[must_use]
    pub fn share(self, share: BasisPoints) -> MoneyCents {
        MoneyCents(ratio_rounded(self.0, share.0, FULL_BP))
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

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}

impl std::iter::Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed2(s)
            .map(MoneyCents)
            .map_err(|reason| EngineError::InvalidAmount(reason.to_string()))
    }
}

/// A percentage expressed in hundredths of a percent (`10000` = 100%).
///
/// ```rust
/// use engine::BasisPoints;
///
/// assert_eq!("60.5".parse::<BasisPoints>().unwrap().value(), 6050);
/// assert_eq!(BasisPoints::new(3333).to_string(), "33.33%");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BasisPoints(i64);

impl BasisPoints {
    pub const FULL: BasisPoints = BasisPoints(FULL_BP);

    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Share of `part` in `total`, rounded half away from zero.
    ///
    /// A zero total yields zero.
    #[must_use]
    pub fn of(part: i64, total: i64) -> Self {
        if total == 0 {
            return Self(0);
        }
        Self(ratio_rounded(part, FULL_BP, total))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}%", abs / 100, abs % 100)
    }
}

impl FromStr for BasisPoints {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
        parse_fixed2(trimmed)
            .map(BasisPoints)
            .map_err(|reason| EngineError::InvalidPercentage(reason.to_string()))
    }
}

/// `value * numerator / denominator`, rounded half away from zero.
///
/// Computed in `i128` so cent amounts times basis points cannot overflow.
fn ratio_rounded(value: i64, numerator: i64, denominator: i64) -> i64 {
    let product = i128::from(value) * i128::from(numerator);
    let denominator = i128::from(denominator);
    let quotient = product / denominator;
    let remainder = product % denominator;
    let rounded = if remainder.abs() * 2 >= denominator.abs() {
        if (product < 0) != (denominator < 0) {
            quotient - 1
        } else {
            quotient + 1
        }
    } else {
        quotient
    };
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}

/// Parses a fixed-point decimal with at most two fractional digits into an
/// integer scaled by 100.
fn parse_fixed2(s: &str) -> Result<i64, &'static str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("empty value");
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim().replace(',', ".");
    if rest.is_empty() {
        return Err("empty value");
    }

    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (rest.as_str(), ""),
    };

    if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
        return Err("invalid format");
    }
    if !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return Err("invalid format");
    }

    let whole: i64 = int_part.parse().map_err(|_| "value too large")?;
    let fraction: i64 = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().map_err(|_| "invalid format")? * 10,
        2 => frac_part.parse::<i64>().map_err(|_| "invalid format")?,
        _ => return Err("too many decimals"),
    };

    let total = whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(fraction))
        .ok_or("value too large")?;

    if negative {
        total.checked_neg().ok_or("value too large")
    } else {
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!("  2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("1.2.3".parse::<MoneyCents>().is_err());
        assert!(".5".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn percentage_parses_with_optional_sign() {
        assert_eq!("40".parse::<BasisPoints>().unwrap(), BasisPoints::new(4000));
        assert_eq!("12.5%".parse::<BasisPoints>().unwrap(), BasisPoints::new(1250));
        assert_eq!(
            "1.234".parse::<BasisPoints>(),
            Err(EngineError::InvalidPercentage("too many decimals".to_string()))
        );
    }

    #[test]
    fn share_rounds_half_away_from_zero() {
        // 0.05 * 50% = 0.025 -> 0.03
        assert_eq!(MoneyCents::new(5).share(BasisPoints::new(5000)).cents(), 3);
        // 0.04 * 50% = 0.02
        assert_eq!(MoneyCents::new(4).share(BasisPoints::new(5000)).cents(), 2);
        assert_eq!(MoneyCents::new(-5).share(BasisPoints::new(5000)).cents(), -3);
        assert_eq!(
            MoneyCents::new(100_000).share(BasisPoints::new(6000)).cents(),
            60_000
        );
    }

    #[test]
    fn basis_points_of_total() {
        assert_eq!(BasisPoints::of(1, 3), BasisPoints::new(3333));
        assert_eq!(BasisPoints::of(2, 3), BasisPoints::new(6667));
        assert_eq!(BasisPoints::of(5, 0), BasisPoints::new(0));
        assert_eq!(BasisPoints::of(10, 10), BasisPoints::FULL);
    }
}
