use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::{
    delta::TimeDelta,
    error::Error,
    util::calendar::{NANOS_PER_SECOND, SECONDS_PER_DAY},
};

/// A representation of civil "wall clock" time.
///
/// A `Time` value has nanosecond precision and carries no date and no
/// time zone. Its canonical form is a pair of the second of the day (in
/// `0..86_400`) and a nanosecond fraction (in `0..1_000_000_000`).
///
/// # Normalizing construction
///
/// Two inputs outside the canonical ranges are accepted and folded
/// immediately:
///
/// * An hour of `24` is an alias for hour `0`, so `24:15:00` is
///   `00:15:00`.
/// * A second of `60` is tolerated as direct leap-second input and
///   carries into the next minute (and `23:59:60` wraps to midnight).
///   Carries never *produce* a second of `60`; accessors only report
///   canonical values.
///
/// # Arithmetic
///
/// Adding or subtracting a [`TimeDelta`] wraps around the clock in both
/// directions; a `Time` is always within one day by construction and no
/// day overflow is tracked. The `Add` and `Sub` operators use the
/// wrapping forms:
///
/// ```
/// use calclock::{civil::Time, TimeDelta};
///
/// let t = Time::new(23, 0, 0, 0)?;
/// assert_eq!(t + TimeDelta::from_hours(1)?, Time::midnight());
/// # Ok::<(), calclock::Error>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Time {
    second_of_day: i32,
    nanosecond: i32,
}

impl Time {
    /// The earliest clock time, `00:00:00.000000000`.
    pub const MIN: Time = Time { second_of_day: 0, nanosecond: 0 };

    /// The latest clock time, `23:59:59.999999999`.
    pub const MAX: Time =
        Time { second_of_day: 86_399, nanosecond: 999_999_999 };

    /// Creates a new `Time` value from its component hour, minute,
    /// second and fractional nanosecond values.
    ///
    /// Validation order is hour, then minute, then second, then
    /// nanosecond.
    ///
    /// # Errors
    ///
    /// This returns an error unless all of the following are true:
    ///
    /// * The hour is in `0..=24` (`24` folds to `0`).
    /// * The minute is in `0..=59`.
    /// * The second is in `0..=60` (`60` carries into the next minute).
    /// * The nanosecond is in `0..=999_999_999`.
    ///
    /// # Example
    ///
    /// ```
    /// use calclock::civil::Time;
    ///
    /// let t = Time::new(13, 35, 59, 123_456_789)?;
    /// assert_eq!(t.hour(), 13);
    /// assert_eq!(t.subsec_nanosecond(), 123_456_789);
    /// assert!(Time::new(13, 60, 0, 0).is_err());
    /// # Ok::<(), calclock::Error>(())
    /// ```
    #[inline]
    pub fn new(
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> Result<Time, Error> {
        if !(0..=24).contains(&hour) {
            return Err(Error::range("hour", hour, 0, 24));
        }
        if !(0..=59).contains(&minute) {
            return Err(Error::range("minute", minute, 0, 59));
        }
        if !(0..=60).contains(&second) {
            return Err(Error::range("second", second, 0, 60));
        }
        if !(0..NANOS_PER_SECOND).contains(&subsec_nanosecond) {
            return Err(Error::range(
                "subsec_nanosecond",
                subsec_nanosecond,
                0,
                NANOS_PER_SECOND - 1,
            ));
        }
        let hour = if hour == 24 { 0 } else { hour };
        let mut second_of_day =
            hour as i32 * 3600 + minute as i32 * 60 + second as i32;
        // Only reachable via a leap second input at 23:59:60.
        if second_of_day >= SECONDS_PER_DAY as i32 {
            second_of_day -= SECONDS_PER_DAY as i32;
        }
        Ok(Time { second_of_day, nanosecond: subsec_nanosecond })
    }

    /// Creates a new `Time` with zeroed minutes, seconds and
    /// nanoseconds.
    #[inline]
    pub fn from_hour(hour: i8) -> Result<Time, Error> {
        Time::new(hour, 0, 0, 0)
    }

    /// Creates a new `Time` with zeroed seconds and nanoseconds.
    #[inline]
    pub fn from_hour_minute(hour: i8, minute: i8) -> Result<Time, Error> {
        Time::new(hour, minute, 0, 0)
    }

    /// Creates a new `Time` from an hour, a minute and a second with a
    /// decimal fraction.
    ///
    /// The fractional part is truncated to nanosecond precision.
    ///
    /// # Errors
    ///
    /// This returns an error when the hour or minute is out of range,
    /// or when the second is not a finite number in `[0, 61)` (the
    /// whole second may be `60` as direct leap-second input, like in
    /// [`Time::new`]).
    ///
    /// # Example
    ///
    /// ```
    /// use calclock::civil::Time;
    ///
    /// let t = Time::from_decimal_second(7, 30, 12.25)?;
    /// assert_eq!(t.second(), 12);
    /// assert_eq!(t.subsec_nanosecond(), 250_000_000);
    /// # Ok::<(), calclock::Error>(())
    /// ```
    #[inline]
    pub fn from_decimal_second(
        hour: i8,
        minute: i8,
        second: f64,
    ) -> Result<Time, Error> {
        if !second.is_finite() || !(0.0..61.0).contains(&second) {
            return Err(Error::range("second", second as i64, 0, 60));
        }
        let whole = second.trunc();
        let mut nanos =
            ((second - whole) * (NANOS_PER_SECOND as f64)) as i32;
        // Guard against the float landing exactly on 10^9 after
        // truncation of, e.g., 59.9999999999999999.
        if nanos >= NANOS_PER_SECOND {
            nanos = NANOS_PER_SECOND - 1;
        }
        Time::new(hour, minute, whole as i8, nanos)
    }

    /// Creates a new `Time` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This routine panics when [`Time::new`] would return an error.
    ///
    /// # Example
    ///
    /// ```
    /// use calclock::civil::Time;
    ///
    /// const NOON: Time = Time::constant(12, 0, 0, 0);
    /// assert_eq!(NOON.hour(), 12);
    /// ```
    #[inline]
    pub const fn constant(
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> Time {
        if hour < 0 || hour > 24 {
            panic!("invalid hour");
        }
        if minute < 0 || minute > 59 {
            panic!("invalid minute");
        }
        if second < 0 || second > 60 {
            panic!("invalid second");
        }
        if subsec_nanosecond < 0 || subsec_nanosecond >= NANOS_PER_SECOND {
            panic!("invalid nanosecond");
        }
        let hour = if hour == 24 { 0 } else { hour };
        let mut second_of_day =
            hour as i32 * 3600 + minute as i32 * 60 + second as i32;
        if second_of_day >= SECONDS_PER_DAY as i32 {
            second_of_day -= SECONDS_PER_DAY as i32;
        }
        Time { second_of_day, nanosecond: subsec_nanosecond }
    }

    /// Returns the first moment of the day, `00:00:00.000000000`.
    #[inline]
    pub const fn midnight() -> Time {
        Time::MIN
    }

    /// Builds a `Time` from a canonical second of the day and
    /// nanosecond fraction.
    #[inline]
    pub(crate) fn from_second_of_day(
        second_of_day: i32,
        nanosecond: i32,
    ) -> Result<Time, Error> {
        if !(0..SECONDS_PER_DAY as i32).contains(&second_of_day) {
            return Err(Error::range(
                "second-of-day",
                second_of_day,
                0,
                SECONDS_PER_DAY - 1,
            ));
        }
        if !(0..NANOS_PER_SECOND).contains(&nanosecond) {
            return Err(Error::range(
                "subsec_nanosecond",
                nanosecond,
                0,
                NANOS_PER_SECOND - 1,
            ));
        }
        Ok(Time { second_of_day, nanosecond })
    }

    /// Returns the hour, in `0..=23`.
    #[inline]
    pub fn hour(self) -> i8 {
        (self.second_of_day / 3600) as i8
    }

    /// Returns the minute, in `0..=59`.
    #[inline]
    pub fn minute(self) -> i8 {
        (self.second_of_day % 3600 / 60) as i8
    }

    /// Returns the second, in `0..=59`.
    #[inline]
    pub fn second(self) -> i8 {
        (self.second_of_day % 60) as i8
    }

    /// Returns the fractional nanosecond, in `0..=999_999_999`.
    #[inline]
    pub fn subsec_nanosecond(self) -> i32 {
        self.nanosecond
    }

    /// Returns the whole second of the day, in `0..=86_399`.
    #[inline]
    pub fn second_of_day(self) -> i32 {
        self.second_of_day
    }

    /// Returns this clock time as a [`TimeDelta`] since midnight.
    ///
    /// # Example
    ///
    /// ```
    /// use calclock::{civil::Time, TimeDelta};
    ///
    /// let t = Time::new(0, 1, 1, 500_000_000)?;
    /// assert_eq!(t.since_midnight(), TimeDelta::new(61, 500_000_000));
    /// # Ok::<(), calclock::Error>(())
    /// ```
    #[inline]
    pub fn since_midnight(self) -> TimeDelta {
        TimeDelta::new(self.second_of_day as i64, self.nanosecond)
    }

    /// Adds the given delta to this time, wrapping around the clock on
    /// overflow in either direction.
    ///
    /// # Example
    ///
    /// ```
    /// use calclock::{civil::Time, TimeDelta};
    ///
    /// let t = Time::new(23, 59, 59, 0)?;
    /// assert_eq!(
    ///     t.wrapping_add(TimeDelta::from_secs(2)),
    ///     Time::new(0, 0, 1, 0)?,
    /// );
    /// # Ok::<(), calclock::Error>(())
    /// ```
    #[inline]
    pub fn wrapping_add(self, delta: TimeDelta) -> Time {
        self.wrapping_shift(
            delta.as_secs().rem_euclid(SECONDS_PER_DAY),
            delta.subsec_nanos(),
        )
    }

    /// Subtracts the given delta from this time, wrapping around the
    /// clock on overflow in either direction.
    #[inline]
    pub fn wrapping_sub(self, delta: TimeDelta) -> Time {
        // Negating the components (instead of the delta) sidesteps
        // overflow on `TimeDelta::MIN`.
        self.wrapping_shift(
            -delta.as_secs().rem_euclid(SECONDS_PER_DAY),
            -delta.subsec_nanos(),
        )
    }

    #[inline]
    fn wrapping_shift(self, secs: i64, nanos: i32) -> Time {
        let mut second_of_day = self.second_of_day as i64 + secs;
        let mut nanosecond = self.nanosecond + nanos;
        if nanosecond >= NANOS_PER_SECOND {
            nanosecond -= NANOS_PER_SECOND;
            second_of_day += 1;
        } else if nanosecond < 0 {
            nanosecond += NANOS_PER_SECOND;
            second_of_day -= 1;
        }
        Time {
            second_of_day: second_of_day.rem_euclid(SECONDS_PER_DAY) as i32,
            nanosecond,
        }
    }

    /// Returns the delta from this time until the given time.
    ///
    /// The result is negative when `other` is earlier in the day.
    #[inline]
    pub fn until(self, other: Time) -> TimeDelta {
        TimeDelta::new(
            (other.second_of_day - self.second_of_day) as i64,
            other.nanosecond - self.nanosecond,
        )
    }

    /// Returns the delta from the given time until this time.
    #[inline]
    pub fn since(self, other: Time) -> TimeDelta {
        other.until(self)
    }
}

impl Default for Time {
    fn default() -> Time {
        Time::midnight()
    }
}

impl core::fmt::Debug for Time {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.nanosecond == 0 {
            write!(
                f,
                "{:02}:{:02}:{:02}",
                self.hour(),
                self.minute(),
                self.second(),
            )
        } else {
            write!(
                f,
                "{:02}:{:02}:{:02}.{:09}",
                self.hour(),
                self.minute(),
                self.second(),
                self.nanosecond,
            )
        }
    }
}

impl core::fmt::Display for Time {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// Adds a time delta. This uses wrapping arithmetic.
impl Add<TimeDelta> for Time {
    type Output = Time;

    #[inline]
    fn add(self, rhs: TimeDelta) -> Time {
        self.wrapping_add(rhs)
    }
}

/// Adds a time delta in place. This uses wrapping arithmetic.
impl AddAssign<TimeDelta> for Time {
    #[inline]
    fn add_assign(&mut self, rhs: TimeDelta) {
        *self = self.add(rhs);
    }
}

/// Subtracts a time delta. This uses wrapping arithmetic.
impl Sub<TimeDelta> for Time {
    type Output = Time;

    #[inline]
    fn sub(self, rhs: TimeDelta) -> Time {
        self.wrapping_sub(rhs)
    }
}

/// Subtracts a time delta in place. This uses wrapping arithmetic.
impl SubAssign<TimeDelta> for Time {
    #[inline]
    fn sub_assign(&mut self, rhs: TimeDelta) {
        *self = self.sub(rhs);
    }
}

/// Computes the delta between two clock times.
///
/// This is negative when the time being subtracted is greater.
impl Sub for Time {
    type Output = TimeDelta;

    #[inline]
    fn sub(self, rhs: Time) -> TimeDelta {
        self.since(rhs)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Time {
    fn arbitrary(g: &mut quickcheck::Gen) -> Time {
        let second_of_day =
            i32::arbitrary(g).rem_euclid(SECONDS_PER_DAY as i32);
        let nanosecond = i32::arbitrary(g).rem_euclid(NANOS_PER_SECOND);
        Time { second_of_day, nanosecond }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_bounds() {
        assert!(Time::new(23, 59, 59, 999_999_999).is_ok());
        assert!(Time::new(25, 0, 0, 0).is_err());
        assert!(Time::new(-1, 0, 0, 0).is_err());
        assert!(Time::new(0, 60, 0, 0).is_err());
        assert!(Time::new(0, 0, 61, 0).is_err());
        assert!(Time::new(0, 0, 0, 1_000_000_000).is_err());
        assert!(Time::new(0, 0, 0, -1).is_err());
    }

    #[test]
    fn hour_twenty_four_folds() {
        assert_eq!(Time::new(24, 0, 0, 0).unwrap(), Time::midnight());
        assert_eq!(
            Time::new(24, 15, 30, 0).unwrap(),
            Time::new(0, 15, 30, 0).unwrap(),
        );
    }

    #[test]
    fn leap_second_input_carries() {
        let t = Time::new(12, 30, 60, 0).unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (12, 31, 0));
        // A minute of 59 carries into the next hour.
        let t = Time::new(12, 59, 60, 0).unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (13, 0, 0));
        // The end of the day wraps to midnight.
        assert_eq!(Time::new(23, 59, 60, 0).unwrap(), Time::midnight());
    }

    #[test]
    fn decimal_second() {
        let t = Time::from_decimal_second(1, 2, 3.5).unwrap();
        assert_eq!(t, Time::new(1, 2, 3, 500_000_000).unwrap());
        let t = Time::from_decimal_second(1, 2, 60.0).unwrap();
        assert_eq!(t, Time::new(1, 3, 0, 0).unwrap());
        assert!(Time::from_decimal_second(1, 2, 61.0).is_err());
        assert!(Time::from_decimal_second(1, 2, -0.5).is_err());
        assert!(Time::from_decimal_second(1, 2, f64::NAN).is_err());
        assert!(Time::from_decimal_second(1, 2, f64::INFINITY).is_err());
    }

    #[test]
    fn accessors() {
        let t = Time::new(13, 35, 59, 123_456_789).unwrap();
        assert_eq!(t.hour(), 13);
        assert_eq!(t.minute(), 35);
        assert_eq!(t.second(), 59);
        assert_eq!(t.subsec_nanosecond(), 123_456_789);
        assert_eq!(t.second_of_day(), 13 * 3600 + 35 * 60 + 59);
    }

    #[test]
    fn wrapping_arithmetic() {
        let t = Time::new(23, 0, 0, 0).unwrap();
        assert_eq!(
            t.wrapping_add(TimeDelta::from_hours(1).unwrap()),
            Time::midnight(),
        );
        assert_eq!(
            Time::midnight().wrapping_sub(TimeDelta::from_nanos(1)),
            Time::MAX,
        );
        assert_eq!(
            Time::MAX.wrapping_add(TimeDelta::from_nanos(1)),
            Time::midnight(),
        );
        // Negative deltas move backwards through the wrap.
        assert_eq!(
            Time::midnight().wrapping_add(TimeDelta::from_secs(-1)),
            Time::new(23, 59, 59, 0).unwrap(),
        );
        // Multi-day deltas reduce modulo one day.
        assert_eq!(
            t.wrapping_add(TimeDelta::from_hours(49).unwrap()),
            Time::new(0, 0, 0, 0).unwrap(),
        );
    }

    #[test]
    fn add_then_sub_is_identity() {
        let t = Time::new(6, 7, 8, 9).unwrap();
        let delta = TimeDelta::new(123_456, 789_000_111);
        assert_eq!(t.wrapping_add(delta).wrapping_sub(delta), t);
        let delta = TimeDelta::new(-98_765, -432_100_000);
        assert_eq!(t.wrapping_add(delta).wrapping_sub(delta), t);
    }

    #[test]
    fn since_midnight_roundtrip() {
        let t = Time::new(0, 1, 1, 500_000_000).unwrap();
        let delta = t.since_midnight();
        assert_eq!(delta, TimeDelta::new(61, 500_000_000));
        assert_eq!(Time::midnight().wrapping_add(delta), t);
    }

    #[test]
    fn until_signs() {
        let early = Time::new(1, 0, 0, 250_000_000).unwrap();
        let late = Time::new(2, 0, 0, 0).unwrap();
        assert_eq!(early.until(late), TimeDelta::new(3599, 750_000_000));
        assert_eq!(late.until(early), TimeDelta::new(-3599, -750_000_000));
        assert_eq!(late - early, TimeDelta::new(3599, 750_000_000));
        assert_eq!(early.since(late), TimeDelta::new(-3599, -750_000_000));
    }

    #[test]
    fn debug_format() {
        let t = Time::new(7, 5, 3, 0).unwrap();
        assert_eq!(format!("{t:?}"), "07:05:03");
        let t = Time::new(7, 5, 3, 1).unwrap();
        assert_eq!(format!("{t:?}"), "07:05:03.000000001");
    }

    quickcheck::quickcheck! {
        fn prop_wrap_add_then_sub_is_identity(
            t: Time,
            delta: TimeDelta
        ) -> bool {
            t.wrapping_add(delta).wrapping_sub(delta) == t
        }

        fn prop_since_midnight_reconstructs(t: Time) -> bool {
            Time::midnight().wrapping_add(t.since_midnight()) == t
        }
    }
}
