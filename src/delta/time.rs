use core::ops::Neg;

use crate::{
    delta::DayDelta,
    error::{err, Error},
    util::calendar::{NANOS_PER_SECOND, SECONDS_PER_DAY},
};

const NANOS_PER_SEC_I64: i64 = 1_000_000_000;

/// A signed duration of time, in units of seconds with a fractional
/// nanosecond part.
///
/// # Normalized form
///
/// A `TimeDelta` always satisfies two invariants: the nanosecond part
/// is strictly less than one second in magnitude, and the seconds and
/// nanoseconds have the same sign whenever both are nonzero. The pair
/// therefore encodes a single signed quantity without ambiguity, and
/// every operation re-establishes the invariants before returning.
///
/// ```
/// use calclock::TimeDelta;
///
/// // Mixed signs are reconciled on construction.
/// let delta = TimeDelta::new(1, -400_000_000);
/// assert_eq!(delta.as_secs(), 0);
/// assert_eq!(delta.subsec_nanos(), 600_000_000);
/// ```
///
/// # Days and weeks
///
/// For the purposes of this type, a day is exactly 86,400 seconds and a
/// week is exactly 7 days. There is deliberately no conversion from
/// months: months vary in length, so a month count only makes sense
/// applied to a calendar-aware value. See
/// [`MonthDelta`](crate::MonthDelta).
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimeDelta {
    secs: i64,
    nanos: i32,
}

impl TimeDelta {
    /// The zero duration, the additive identity.
    pub const ZERO: TimeDelta = TimeDelta { secs: 0, nanos: 0 };

    /// The minimum representable duration.
    pub const MIN: TimeDelta =
        TimeDelta { secs: i64::MIN, nanos: -999_999_999 };

    /// The maximum representable duration.
    pub const MAX: TimeDelta =
        TimeDelta { secs: i64::MAX, nanos: 999_999_999 };

    /// Creates a new `TimeDelta` from the given seconds and
    /// nanoseconds, normalizing the result.
    ///
    /// Whole seconds are carried out of the nanosecond part, and one
    /// second's worth of nanoseconds is moved across the zero boundary
    /// when the signs of the two parts disagree.
    ///
    /// # Panics
    ///
    /// When the carry out of `nanos` overflows the seconds component.
    /// This can only happen within two seconds of [`TimeDelta::MIN`]
    /// or [`TimeDelta::MAX`].
    #[inline]
    pub const fn new(secs: i64, nanos: i32) -> TimeDelta {
        let mut secs = secs;
        let mut nanos = nanos;
        if nanos >= NANOS_PER_SECOND || nanos <= -NANOS_PER_SECOND {
            let carry = (nanos / NANOS_PER_SECOND) as i64;
            secs = match secs.checked_add(carry) {
                Some(secs) => secs,
                None => panic!("seconds overflow in TimeDelta::new"),
            };
            nanos %= NANOS_PER_SECOND;
        }
        if secs < 0 && nanos > 0 {
            secs += 1;
            nanos -= NANOS_PER_SECOND;
        } else if secs > 0 && nanos < 0 {
            secs -= 1;
            nanos += NANOS_PER_SECOND;
        }
        TimeDelta { secs, nanos }
    }

    /// Creates a new `TimeDelta` from a whole number of seconds.
    #[inline]
    pub const fn from_secs(secs: i64) -> TimeDelta {
        TimeDelta { secs, nanos: 0 }
    }

    /// Creates a new `TimeDelta` from a number of milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> TimeDelta {
        TimeDelta {
            secs: millis / 1_000,
            nanos: ((millis % 1_000) * 1_000_000) as i32,
        }
    }

    /// Creates a new `TimeDelta` from a number of microseconds.
    #[inline]
    pub const fn from_micros(micros: i64) -> TimeDelta {
        TimeDelta {
            secs: micros / 1_000_000,
            nanos: ((micros % 1_000_000) * 1_000) as i32,
        }
    }

    /// Creates a new `TimeDelta` from a number of nanoseconds.
    #[inline]
    pub const fn from_nanos(nanos: i64) -> TimeDelta {
        TimeDelta {
            secs: nanos / NANOS_PER_SEC_I64,
            nanos: (nanos % NANOS_PER_SEC_I64) as i32,
        }
    }

    /// Creates a new `TimeDelta` from a whole number of minutes.
    ///
    /// # Errors
    ///
    /// When the number of seconds overflows.
    #[inline]
    pub fn from_mins(mins: i64) -> Result<TimeDelta, Error> {
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| err!("{mins} minutes overflows a time delta"))?;
        Ok(TimeDelta::from_secs(secs))
    }

    /// Creates a new `TimeDelta` from a whole number of hours.
    ///
    /// # Errors
    ///
    /// When the number of seconds overflows.
    #[inline]
    pub fn from_hours(hours: i64) -> Result<TimeDelta, Error> {
        let secs = hours
            .checked_mul(3_600)
            .ok_or_else(|| err!("{hours} hours overflows a time delta"))?;
        Ok(TimeDelta::from_secs(secs))
    }

    /// Creates a new `TimeDelta` from a whole number of days, where a
    /// day is exactly 86,400 seconds.
    ///
    /// # Errors
    ///
    /// When the number of seconds overflows.
    #[inline]
    pub fn from_days(days: i64) -> Result<TimeDelta, Error> {
        let secs = days
            .checked_mul(SECONDS_PER_DAY)
            .ok_or_else(|| err!("{days} days overflows a time delta"))?;
        Ok(TimeDelta::from_secs(secs))
    }

    /// Creates a new `TimeDelta` from a whole number of weeks, where a
    /// week is exactly 7 days.
    ///
    /// # Errors
    ///
    /// When the number of seconds overflows.
    #[inline]
    pub fn from_weeks(weeks: i64) -> Result<TimeDelta, Error> {
        let secs = weeks
            .checked_mul(7 * SECONDS_PER_DAY)
            .ok_or_else(|| err!("{weeks} weeks overflows a time delta"))?;
        Ok(TimeDelta::from_secs(secs))
    }

    /// Returns the whole seconds component.
    #[inline]
    pub const fn as_secs(self) -> i64 {
        self.secs
    }

    /// Returns the fractional nanosecond component, in
    /// `-999_999_999..=999_999_999` and sign-consistent with
    /// [`TimeDelta::as_secs`].
    #[inline]
    pub const fn subsec_nanos(self) -> i32 {
        self.nanos
    }

    /// Returns the total number of nanoseconds in this duration.
    #[inline]
    pub const fn as_nanos(self) -> i128 {
        self.secs as i128 * NANOS_PER_SEC_I64 as i128 + self.nanos as i128
    }

    /// Returns true when this duration is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.secs == 0 && self.nanos == 0
    }

    /// Returns true when this duration is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.secs < 0 || self.nanos < 0
    }

    /// Returns the sign of this duration: `-1`, `0` or `1`.
    #[inline]
    pub const fn signum(self) -> i8 {
        if self.is_zero() {
            0
        } else if self.is_negative() {
            -1
        } else {
            1
        }
    }

    /// Returns the absolute value of this duration.
    ///
    /// # Panics
    ///
    /// When this duration is [`TimeDelta::MIN`], whose negation is not
    /// representable.
    #[inline]
    pub const fn abs(self) -> TimeDelta {
        if !self.is_negative() {
            return self;
        }
        match self.secs.checked_neg() {
            Some(secs) => TimeDelta { secs, nanos: -self.nanos },
            None => panic!("absolute value of TimeDelta::MIN"),
        }
    }

    /// Returns the negation of this duration.
    ///
    /// # Errors
    ///
    /// When this duration is [`TimeDelta::MIN`], whose negation is not
    /// representable.
    #[inline]
    pub fn checked_neg(self) -> Result<TimeDelta, Error> {
        let secs = self
            .secs
            .checked_neg()
            .ok_or_else(|| err!("negating minimal time delta overflows"))?;
        Ok(TimeDelta { secs, nanos: -self.nanos })
    }

    /// Adds two durations together.
    ///
    /// # Errors
    ///
    /// When the sum overflows the representable range.
    #[inline]
    pub fn checked_add(self, rhs: TimeDelta) -> Result<TimeDelta, Error> {
        let mut secs = self.secs.checked_add(rhs.secs).ok_or_else(|| {
            err!("adding time deltas overflows the seconds component")
        })?;
        let mut nanos = self.nanos + rhs.nanos;
        if nanos >= NANOS_PER_SECOND {
            nanos -= NANOS_PER_SECOND;
            secs = secs.checked_add(1).ok_or_else(|| {
                err!("adding time deltas overflows the seconds component")
            })?;
        } else if nanos <= -NANOS_PER_SECOND {
            nanos += NANOS_PER_SECOND;
            secs = secs.checked_sub(1).ok_or_else(|| {
                err!("adding time deltas overflows the seconds component")
            })?;
        }
        // The carry above cannot overflow again, so re-establishing
        // sign agreement is infallible from here.
        Ok(TimeDelta::new_unchecked_carry(secs, nanos))
    }

    /// Subtracts the given duration from this one.
    ///
    /// # Errors
    ///
    /// When the difference overflows the representable range.
    #[inline]
    pub fn checked_sub(self, rhs: TimeDelta) -> Result<TimeDelta, Error> {
        // `rhs.checked_neg()` would spuriously fail on `MIN`, so
        // negate component-wise inside the addition instead.
        let mut secs = self.secs.checked_sub(rhs.secs).ok_or_else(|| {
            err!("subtracting time deltas overflows the seconds component")
        })?;
        let mut nanos = self.nanos - rhs.nanos;
        if nanos >= NANOS_PER_SECOND {
            nanos -= NANOS_PER_SECOND;
            secs = secs.checked_add(1).ok_or_else(|| {
                err!(
                    "subtracting time deltas overflows the seconds component"
                )
            })?;
        } else if nanos <= -NANOS_PER_SECOND {
            nanos += NANOS_PER_SECOND;
            secs = secs.checked_sub(1).ok_or_else(|| {
                err!(
                    "subtracting time deltas overflows the seconds component"
                )
            })?;
        }
        Ok(TimeDelta::new_unchecked_carry(secs, nanos))
    }

    /// Multiplies this duration by an integer scale.
    ///
    /// # Errors
    ///
    /// When the product overflows the representable range.
    #[inline]
    pub fn checked_mul(self, rhs: i64) -> Result<TimeDelta, Error> {
        let nanos = self
            .as_nanos()
            .checked_mul(rhs as i128)
            .ok_or_else(|| err!("scaling time delta by {rhs} overflows"))?;
        TimeDelta::from_total_nanos(nanos)
            .ok_or_else(|| err!("scaling time delta by {rhs} overflows"))
    }

    /// Multiplies this duration by a fractional scale.
    ///
    /// The fractional remainder of the scaled seconds is redistributed
    /// into the nanosecond field before the nanoseconds themselves are
    /// scaled, so sub-second precision survives large second counts.
    ///
    /// # Errors
    ///
    /// When the scale is not finite or the product overflows.
    #[inline]
    pub fn mul_f64(self, rhs: f64) -> Result<TimeDelta, Error> {
        if !rhs.is_finite() {
            return Err(err!("scale factor {rhs} is not finite"));
        }
        self.scale_f64(rhs)
    }

    /// Divides this duration by a fractional divisor.
    ///
    /// # Errors
    ///
    /// When the divisor is zero or not finite, or the quotient
    /// overflows. Division by zero is a reported error, never a silent
    /// infinity.
    #[inline]
    pub fn div_f64(self, rhs: f64) -> Result<TimeDelta, Error> {
        if rhs == 0.0 {
            return Err(err!("division of time delta by zero"));
        }
        if !rhs.is_finite() {
            return Err(err!("divisor {rhs} is not finite"));
        }
        self.scale_f64(1.0 / rhs)
    }

    #[inline]
    fn scale_f64(self, factor: f64) -> Result<TimeDelta, Error> {
        let scaled_secs = self.secs as f64 * factor;
        let whole_secs = scaled_secs.trunc();
        if !(i64::MIN as f64..=i64::MAX as f64).contains(&whole_secs) {
            return Err(err!(
                "scaling time delta by {factor} overflows its seconds"
            ));
        }
        // The fractional remainder of the scaled seconds moves into
        // nanosecond units first, then the nanosecond part is scaled.
        let frac_nanos = (scaled_secs - whole_secs)
            * (NANOS_PER_SECOND as f64)
            + self.nanos as f64 * factor;
        let carry_secs = (frac_nanos / NANOS_PER_SECOND as f64).trunc();
        let nanos = (frac_nanos % NANOS_PER_SECOND as f64) as i32;
        let secs = (whole_secs as i64)
            .checked_add(carry_secs as i64)
            .ok_or_else(|| {
                err!("scaling time delta by {factor} overflows its seconds")
            })?;
        Ok(TimeDelta::new_unchecked_carry(secs, nanos))
    }

    /// Converts this duration to a whole number of days under the given
    /// rounding policy. A day is exactly 86,400 seconds.
    ///
    /// # Example
    ///
    /// ```
    /// use calclock::{DayDelta, DayRounding, TimeDelta};
    ///
    /// let d = TimeDelta::from_hours(36)?;
    /// assert_eq!(d.to_days(DayRounding::Trunc), DayDelta::from_days(1));
    /// assert_eq!(d.to_days(DayRounding::HalfExpand), DayDelta::from_days(2));
    /// assert_eq!(d.to_days(DayRounding::Expand), DayDelta::from_days(2));
    /// # Ok::<(), calclock::Error>(())
    /// ```
    #[inline]
    pub fn to_days(self, mode: DayRounding) -> DayDelta {
        let days = self.secs / SECONDS_PER_DAY;
        let rem_nanos = (self.secs % SECONDS_PER_DAY) * NANOS_PER_SEC_I64
            + self.nanos as i64;
        if rem_nanos == 0 {
            return DayDelta::from_days(days);
        }
        let bump = match mode {
            DayRounding::Trunc => 0,
            DayRounding::HalfExpand => {
                const HALF_DAY_NANOS: i64 =
                    SECONDS_PER_DAY / 2 * NANOS_PER_SEC_I64;
                if rem_nanos.abs() >= HALF_DAY_NANOS {
                    self.signum() as i64
                } else {
                    0
                }
            }
            DayRounding::Expand => self.signum() as i64,
        };
        // `days` is within +/-106 billion, so the bump cannot overflow.
        DayDelta::from_days(days + bump)
    }

    /// Builds a delta from a total nanosecond count, if representable.
    #[inline]
    fn from_total_nanos(nanos: i128) -> Option<TimeDelta> {
        let secs = nanos / (NANOS_PER_SEC_I64 as i128);
        if i64::try_from(secs).is_err() {
            return None;
        }
        Some(TimeDelta {
            secs: secs as i64,
            nanos: (nanos % (NANOS_PER_SEC_I64 as i128)) as i32,
        })
    }

    /// Like `TimeDelta::new`, but requires `|nanos| < 10^9` so that
    /// only the sign fixup remains, which cannot overflow.
    #[inline]
    const fn new_unchecked_carry(secs: i64, nanos: i32) -> TimeDelta {
        let mut secs = secs;
        let mut nanos = nanos;
        if secs < 0 && nanos > 0 {
            secs += 1;
            nanos -= NANOS_PER_SECOND;
        } else if secs > 0 && nanos < 0 {
            secs -= 1;
            nanos += NANOS_PER_SECOND;
        }
        TimeDelta { secs, nanos }
    }
}

/// Negates this duration.
///
/// # Panics
///
/// When the duration is `TimeDelta::MIN`. For checked negation, see
/// [`TimeDelta::checked_neg`].
impl Neg for TimeDelta {
    type Output = TimeDelta;

    #[inline]
    fn neg(self) -> TimeDelta {
        self.checked_neg()
            .expect("negating TimeDelta::MIN is not representable")
    }
}

impl core::fmt::Debug for TimeDelta {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.nanos == 0 {
            write!(f, "{}s", self.secs)
        } else if self.secs == 0 {
            write!(f, "{}ns", self.nanos)
        } else {
            write!(f, "{}s {}ns", self.secs, self.nanos.abs())
        }
    }
}

/// The rounding policy for converting a [`TimeDelta`] to whole days.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DayRounding {
    /// Discards the sub-day remainder, truncating toward zero.
    Trunc,
    /// Rounds to the nearest whole day, with ties away from zero.
    HalfExpand,
    /// Rounds any nonzero sub-day remainder away from zero.
    Expand,
}

#[cfg(test)]
impl quickcheck::Arbitrary for TimeDelta {
    fn arbitrary(g: &mut quickcheck::Gen) -> TimeDelta {
        // Stay far from the representational extremes; arithmetic at
        // the edges is tested deterministically.
        let secs = i64::arbitrary(g) / 4;
        let nanos = i32::arbitrary(g).rem_euclid(NANOS_PER_SECOND);
        TimeDelta::new(secs, if secs < 0 { -nanos } else { nanos })
    }
}
