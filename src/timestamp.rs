use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::{
    civil::{Date, Time},
    delta::{DayDelta, MonthDelta, TimeDelta},
    error::Error,
    oracle::{BrokenDown, SystemOracle, TimeOracle},
    util::calendar::{self, NANOS_PER_SECOND, SECONDS_PER_DAY},
};

/// An instant in time, as seconds and nanoseconds since the Unix epoch.
///
/// A `Timestamp` names a single absolute instant, independent of any
/// calendar or offset. The same instant reads as different civil dates
/// and times at different UTC offsets; converting between the two views
/// is what [`Timestamp::from_civil`] and [`Timestamp::to_civil`] do.
///
/// # Representation
///
/// The nanosecond field is always in `0..1_000_000_000`, for instants
/// before the epoch too. `1969-12-31T23:59:59.5Z` is second `-1` with
/// nanosecond `500_000_000`, not second `0` with a negative fraction.
/// This keeps the ordering on timestamps the lexicographic ordering on
/// the pair.
///
/// # Supported range
///
/// The supported instants span midnight of `-9999-01-01` through the
/// last nanosecond of `9999-12-31`, both in UTC.
///
/// # Example
///
/// ```
/// use calclock::{civil::{Date, Time}, TimeDelta, Timestamp, ToDelta};
///
/// let ts = Timestamp::from_civil_utc(
///     Date::constant(1970, 1, 2),
///     Time::midnight(),
/// );
/// assert_eq!(ts.as_second(), 86_400);
/// let later = ts.checked_add(90.minutes())?;
/// assert_eq!(later.to_time(TimeDelta::ZERO)?, Time::constant(1, 30, 0, 0));
/// # Ok::<(), calclock::Error>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp {
    second: i64,
    nanosecond: i32,
}

impl Timestamp {
    /// The minimum supported instant, `-9999-01-01T00:00:00Z`.
    pub const MIN: Timestamp = Timestamp {
        second: calendar::MIN_EPOCH_DAY as i64 * SECONDS_PER_DAY,
        nanosecond: 0,
    };

    /// The maximum supported instant, the last nanosecond of
    /// `9999-12-31T23:59:59Z`.
    pub const MAX: Timestamp = Timestamp {
        second: (calendar::MAX_EPOCH_DAY as i64 + 1) * SECONDS_PER_DAY - 1,
        nanosecond: NANOS_PER_SECOND - 1,
    };

    /// The Unix epoch, `1970-01-01T00:00:00Z`.
    pub const UNIX_EPOCH: Timestamp = Timestamp { second: 0, nanosecond: 0 };

    /// Creates a new `Timestamp` from seconds and nanoseconds since the
    /// Unix epoch.
    ///
    /// The nanosecond argument may be any value in
    /// `-999_999_999..=999_999_999`; whole seconds are not carried out
    /// of it, but a negative fraction borrows one second so that the
    /// stored nanosecond is non-negative.
    ///
    /// # Errors
    ///
    /// When the nanosecond argument is a full second or more in
    /// magnitude, or the instant falls outside the supported range.
    #[inline]
    pub fn new(second: i64, nanosecond: i32) -> Result<Timestamp, Error> {
        if nanosecond.abs() >= NANOS_PER_SECOND {
            return Err(Error::range(
                "nanosecond",
                nanosecond,
                -(NANOS_PER_SECOND - 1),
                NANOS_PER_SECOND - 1,
            ));
        }
        let (second, nanosecond) = if nanosecond < 0 {
            let second = second.checked_sub(1).ok_or_else(|| {
                Error::range(
                    "second",
                    second,
                    Timestamp::MIN.second,
                    Timestamp::MAX.second,
                )
            })?;
            (second, nanosecond + NANOS_PER_SECOND)
        } else {
            (second, nanosecond)
        };
        let ts = Timestamp { second, nanosecond };
        if ts < Timestamp::MIN || ts > Timestamp::MAX {
            return Err(Error::range(
                "second",
                second,
                Timestamp::MIN.second,
                Timestamp::MAX.second,
            ));
        }
        Ok(ts)
    }

    /// Creates a new `Timestamp` from a whole number of seconds since
    /// the Unix epoch.
    ///
    /// # Errors
    ///
    /// When the instant falls outside the supported range.
    #[inline]
    pub fn from_second(second: i64) -> Result<Timestamp, Error> {
        Timestamp::new(second, 0)
    }

    /// Creates a new `Timestamp` for the current instant.
    ///
    /// # Errors
    ///
    /// When the host clock reports a time outside the supported range.
    #[inline]
    pub fn now() -> Result<Timestamp, Error> {
        Timestamp::now_with(&SystemOracle)
    }

    /// Like [`Timestamp::now`], but reads the clock of the given
    /// oracle.
    #[inline]
    pub fn now_with(oracle: &dyn TimeOracle) -> Result<Timestamp, Error> {
        let (second, nanosecond) = oracle.current_time()?;
        Timestamp::new(second, nanosecond)
    }

    /// Converts a civil date and time, interpreted in UTC, to the
    /// instant it names.
    ///
    /// Every in-range civil datetime corresponds to exactly one
    /// instant, so this is infallible.
    #[inline]
    pub fn from_civil_utc(date: Date, time: Time) -> Timestamp {
        let second = i64::from(date.to_epoch_day()) * SECONDS_PER_DAY
            + i64::from(time.second_of_day());
        Timestamp { second, nanosecond: time.subsec_nanosecond() }
    }

    /// Converts a civil date and time at the given fixed UTC offset to
    /// the instant it names.
    ///
    /// A positive offset lies east of Greenwich, so the instant is the
    /// UTC reading minus the offset.
    ///
    /// # Errors
    ///
    /// When the civil datetime sits close enough to the boundary of the
    /// supported range that removing the offset leaves it.
    #[inline]
    pub fn from_civil(
        date: Date,
        time: Time,
        offset: TimeDelta,
    ) -> Result<Timestamp, Error> {
        Timestamp::from_civil_utc(date, time).checked_sub(offset)
    }

    /// Converts a civil date and time, interpreted in this host's local
    /// time, to the instant it names.
    ///
    /// The interpretation is delegated to the host. When the datetime
    /// is skipped or repeated by a daylight saving transition, the
    /// host's disambiguation applies.
    ///
    /// # Errors
    ///
    /// When the host cannot interpret the datetime, or the result is
    /// out of range.
    #[inline]
    pub fn from_civil_local(date: Date, time: Time) -> Result<Timestamp, Error> {
        Timestamp::from_civil_local_with(date, time, &SystemOracle)
    }

    /// Like [`Timestamp::from_civil_local`], but uses the given oracle
    /// for the local-time interpretation.
    #[inline]
    pub fn from_civil_local_with(
        date: Date,
        time: Time,
        oracle: &dyn TimeOracle,
    ) -> Result<Timestamp, Error> {
        let second = oracle.epoch_from_local(&BrokenDown::from_civil(
            date, time,
        ))?;
        Timestamp::new(second, time.subsec_nanosecond())
    }

    /// Returns the number of whole seconds since the Unix epoch, negative
    /// for instants before it.
    ///
    /// Together with [`Timestamp::subsec_nanosecond`], this is the full
    /// precision of the instant; the fraction is non-negative even when
    /// the second count is negative.
    #[inline]
    pub fn as_second(self) -> i64 {
        self.second
    }

    /// Returns the fractional nanosecond of this instant, in
    /// `0..1_000_000_000`.
    #[inline]
    pub fn subsec_nanosecond(self) -> i32 {
        self.nanosecond
    }

    /// Returns the total number of nanoseconds since the Unix epoch.
    #[inline]
    pub fn as_nanosecond(self) -> i128 {
        i128::from(self.second) * i128::from(NANOS_PER_SECOND)
            + i128::from(self.nanosecond)
    }

    /// Converts this instant to the civil date and time it reads as at
    /// the given fixed UTC offset.
    ///
    /// # Errors
    ///
    /// When applying the offset pushes the reading outside the
    /// supported civil range.
    #[inline]
    pub fn to_civil(
        self,
        offset: TimeDelta,
    ) -> Result<(Date, Time), Error> {
        let shifted = self.checked_add(offset)?;
        let epoch_day = shifted.second.div_euclid(SECONDS_PER_DAY) as i32;
        let second_of_day = shifted.second.rem_euclid(SECONDS_PER_DAY) as i32;
        let date = Date::from_epoch_day(epoch_day)?;
        let time = Time::from_second_of_day(second_of_day, shifted.nanosecond)?;
        Ok((date, time))
    }

    /// Returns the civil date this instant reads as at the given fixed
    /// UTC offset.
    #[inline]
    pub fn to_date(self, offset: TimeDelta) -> Result<Date, Error> {
        Ok(self.to_civil(offset)?.0)
    }

    /// Returns the time-of-day this instant reads as at the given fixed
    /// UTC offset.
    #[inline]
    pub fn to_time(self, offset: TimeDelta) -> Result<Time, Error> {
        Ok(self.to_civil(offset)?.1)
    }

    /// Adds a duration or a span of days to this instant.
    ///
    /// A day span here is the fixed 86,400 second day; this is absolute
    /// time arithmetic. It never lands on "the same local time
    /// tomorrow" across a daylight saving transition. For calendar
    /// months in local time, see [`Timestamp::checked_add_months`].
    ///
    /// # Errors
    ///
    /// When the result falls outside the supported range.
    #[inline]
    pub fn checked_add<D: Into<TimestampDelta>>(
        self,
        delta: D,
    ) -> Result<Timestamp, Error> {
        match delta.into() {
            TimestampDelta::Time(delta) => {
                self.shift(delta.as_secs(), delta.subsec_nanos())
            }
            TimestampDelta::Days(days) => {
                let secs =
                    days.days().checked_mul(SECONDS_PER_DAY).ok_or_else(
                        || {
                            Error::range(
                                "second",
                                days.days(),
                                Timestamp::MIN.second,
                                Timestamp::MAX.second,
                            )
                        },
                    )?;
                self.shift(secs, 0)
            }
        }
    }

    /// Subtracts a duration or a span of days from this instant.
    ///
    /// # Errors
    ///
    /// When the result falls outside the supported range.
    #[inline]
    pub fn checked_sub<D: Into<TimestampDelta>>(
        self,
        delta: D,
    ) -> Result<Timestamp, Error> {
        // Negate component-wise so that extreme spans subtract without
        // a spurious negation overflow.
        match delta.into() {
            TimestampDelta::Time(delta) => self.shift_neg(
                delta.as_secs(),
                delta.subsec_nanos(),
            ),
            TimestampDelta::Days(days) => {
                let secs =
                    days.days().checked_mul(SECONDS_PER_DAY).ok_or_else(
                        || {
                            Error::range(
                                "second",
                                days.days(),
                                Timestamp::MIN.second,
                                Timestamp::MAX.second,
                            )
                        },
                    )?;
                self.shift_neg(secs, 0)
            }
        }
    }

    /// Adds a span of calendar months in this host's local time.
    ///
    /// The instant is read as a local datetime, the month span is
    /// applied to its date with day-of-month clamping, and the shifted
    /// local datetime is converted back to an instant. The fractional
    /// second is preserved.
    ///
    /// # Errors
    ///
    /// When the host cannot interpret either endpoint, or the shifted
    /// date is out of range.
    #[inline]
    pub fn checked_add_months(
        self,
        months: MonthDelta,
    ) -> Result<Timestamp, Error> {
        self.checked_add_months_with(months, &SystemOracle)
    }

    /// Like [`Timestamp::checked_add_months`], but uses the given
    /// oracle for the local-time interpretation.
    #[inline]
    pub fn checked_add_months_with(
        self,
        months: MonthDelta,
        oracle: &dyn TimeOracle,
    ) -> Result<Timestamp, Error> {
        use crate::error::ErrorContext;

        let local = oracle
            .broken_down_local(self.second)
            .context("month arithmetic requires local time")?;
        let shifted = local.to_date()?.checked_add(months)?;
        let second = oracle.epoch_from_local(&BrokenDown::from_civil(
            shifted,
            local.to_time()?,
        ))?;
        Timestamp::new(second, self.nanosecond)
    }

    /// Subtracts a span of calendar months in this host's local time.
    ///
    /// # Errors
    ///
    /// See [`Timestamp::checked_add_months`].
    #[inline]
    pub fn checked_sub_months(
        self,
        months: MonthDelta,
    ) -> Result<Timestamp, Error> {
        self.checked_sub_months_with(months, &SystemOracle)
    }

    /// Like [`Timestamp::checked_sub_months`], but uses the given
    /// oracle for the local-time interpretation.
    #[inline]
    pub fn checked_sub_months_with(
        self,
        months: MonthDelta,
        oracle: &dyn TimeOracle,
    ) -> Result<Timestamp, Error> {
        self.checked_add_months_with(
            MonthDelta::from_months(months.months().wrapping_neg()),
            oracle,
        )
    }

    /// Returns the duration from this instant to `other`. The result is
    /// positive when `other` is later than this instant.
    ///
    /// The two instants both lie in the supported range, so their
    /// difference always fits a [`TimeDelta`].
    #[inline]
    pub fn until(self, other: Timestamp) -> TimeDelta {
        TimeDelta::new(
            other.second - self.second,
            other.nanosecond - self.nanosecond,
        )
    }

    /// Returns the duration from `other` to this instant. The result is
    /// positive when this instant is later than `other`.
    #[inline]
    pub fn since(self, other: Timestamp) -> TimeDelta {
        other.until(self)
    }

    /// Returns the absolute duration between this instant and `other`.
    #[inline]
    pub fn abs_diff(self, other: Timestamp) -> TimeDelta {
        self.until(other).abs()
    }

    #[inline]
    fn shift(self, secs: i64, nanos: i32) -> Result<Timestamp, Error> {
        let mut second =
            self.second.checked_add(secs).ok_or_else(|| {
                Error::range(
                    "second",
                    secs,
                    Timestamp::MIN.second,
                    Timestamp::MAX.second,
                )
            })?;
        let mut nanosecond = self.nanosecond + nanos;
        if nanosecond >= NANOS_PER_SECOND {
            nanosecond -= NANOS_PER_SECOND;
            second = second.wrapping_add(1);
        } else if nanosecond < 0 {
            nanosecond += NANOS_PER_SECOND;
            second = second.wrapping_sub(1);
        }
        // A wrapped carry lands astronomically far outside the
        // supported range, so the check below still rejects it.
        let ts = Timestamp { second, nanosecond };
        if ts < Timestamp::MIN || ts > Timestamp::MAX {
            return Err(Error::range(
                "second",
                second,
                Timestamp::MIN.second,
                Timestamp::MAX.second,
            ));
        }
        Ok(ts)
    }

    #[inline]
    fn shift_neg(self, secs: i64, nanos: i32) -> Result<Timestamp, Error> {
        let mut second =
            self.second.checked_sub(secs).ok_or_else(|| {
                Error::range(
                    "second",
                    secs,
                    Timestamp::MIN.second,
                    Timestamp::MAX.second,
                )
            })?;
        let mut nanosecond = self.nanosecond - nanos;
        if nanosecond >= NANOS_PER_SECOND {
            nanosecond -= NANOS_PER_SECOND;
            second = second.wrapping_add(1);
        } else if nanosecond < 0 {
            nanosecond += NANOS_PER_SECOND;
            second = second.wrapping_sub(1);
        }
        let ts = Timestamp { second, nanosecond };
        if ts < Timestamp::MIN || ts > Timestamp::MAX {
            return Err(Error::range(
                "second",
                second,
                Timestamp::MIN.second,
                Timestamp::MAX.second,
            ));
        }
        Ok(ts)
    }
}

impl Default for Timestamp {
    fn default() -> Timestamp {
        Timestamp::UNIX_EPOCH
    }
}

impl core::fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        // The UTC reading of an in-range timestamp always exists.
        let epoch_day = self.second.div_euclid(SECONDS_PER_DAY) as i32;
        let second_of_day = self.second.rem_euclid(SECONDS_PER_DAY) as i32;
        let (year, month, day) = calendar::from_epoch_day(epoch_day);
        write!(
            f,
            "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}",
            second_of_day / 3_600,
            second_of_day / 60 % 60,
            second_of_day % 60,
        )?;
        if self.nanosecond != 0 {
            write!(f, ".{:09}", self.nanosecond)?;
        }
        write!(f, "Z")
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// A span that can shift a [`Timestamp`]: an exact duration or a span
/// of fixed 86,400 second days.
///
/// Month spans are deliberately absent. Shifting an instant by months
/// requires a local calendar, which is what
/// [`Timestamp::checked_add_months`] supplies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimestampDelta {
    /// An exact duration.
    Time(TimeDelta),
    /// A span of fixed-length days.
    Days(DayDelta),
}

impl From<TimeDelta> for TimestampDelta {
    fn from(delta: TimeDelta) -> TimestampDelta {
        TimestampDelta::Time(delta)
    }
}

impl From<DayDelta> for TimestampDelta {
    fn from(delta: DayDelta) -> TimestampDelta {
        TimestampDelta::Days(delta)
    }
}

/// Adds a duration or day span to a timestamp.
///
/// # Panics
///
/// When the result is out of range. For a fallible version, see
/// [`Timestamp::checked_add`].
impl<D: Into<TimestampDelta>> Add<D> for Timestamp {
    type Output = Timestamp;

    #[inline]
    fn add(self, rhs: D) -> Timestamp {
        self.checked_add(rhs).expect("timestamp addition out of range")
    }
}

impl<D: Into<TimestampDelta>> AddAssign<D> for Timestamp {
    #[inline]
    fn add_assign(&mut self, rhs: D) {
        *self = *self + rhs;
    }
}

/// Subtracts a duration or day span from a timestamp.
///
/// # Panics
///
/// When the result is out of range. For a fallible version, see
/// [`Timestamp::checked_sub`].
impl<D: Into<TimestampDelta>> Sub<D> for Timestamp {
    type Output = Timestamp;

    #[inline]
    fn sub(self, rhs: D) -> Timestamp {
        self.checked_sub(rhs).expect("timestamp subtraction out of range")
    }
}

impl<D: Into<TimestampDelta>> SubAssign<D> for Timestamp {
    #[inline]
    fn sub_assign(&mut self, rhs: D) {
        *self = *self - rhs;
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = TimeDelta;

    #[inline]
    fn sub(self, rhs: Timestamp) -> TimeDelta {
        self.since(rhs)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Timestamp {
    fn arbitrary(g: &mut quickcheck::Gen) -> Timestamp {
        let span = Timestamp::MAX.second - Timestamp::MIN.second;
        let second =
            Timestamp::MIN.second + i64::arbitrary(g).rem_euclid(span + 1);
        let nanosecond = i32::arbitrary(g).rem_euclid(NANOS_PER_SECOND);
        Timestamp { second, nanosecond }
    }
}

#[cfg(test)]
mod tests {
    use crate::ToDelta;

    use super::*;

    /// A fixed offset "local time" with no transitions, for exercising
    /// the oracle plumbing deterministically.
    struct FixedOffset {
        seconds_east: i64,
    }

    impl TimeOracle for FixedOffset {
        fn broken_down_utc(&self, second: i64) -> Result<BrokenDown, Error> {
            SystemOracle.broken_down_utc(second)
        }

        fn broken_down_local(
            &self,
            second: i64,
        ) -> Result<BrokenDown, Error> {
            SystemOracle.broken_down_utc(second + self.seconds_east)
        }

        fn epoch_from_local(&self, bd: &BrokenDown) -> Result<i64, Error> {
            let ts = Timestamp::from_civil_utc(bd.to_date()?, bd.to_time()?);
            Ok(ts.as_second() - self.seconds_east)
        }

        fn current_time(&self) -> Result<(i64, i32), Error> {
            Ok((0, 0))
        }
    }

    #[test]
    fn epoch_fixed_points() {
        let epoch = Timestamp::from_civil_utc(
            Date::constant(1970, 1, 1),
            Time::midnight(),
        );
        assert_eq!(epoch, Timestamp::UNIX_EPOCH);
        let before = Timestamp::from_civil_utc(
            Date::constant(1969, 12, 31),
            Time::midnight(),
        );
        assert_eq!(before.as_second(), -86_400);
        assert_eq!(Timestamp::MIN.as_second(), -377_705_116_800);
        assert_eq!(Timestamp::MAX.as_second(), 253_402_300_799);
        assert_eq!(Timestamp::MAX.subsec_nanosecond(), 999_999_999);
    }

    #[test]
    fn fraction_is_always_non_negative() {
        // Half a second before the epoch.
        let ts = Timestamp::new(0, -500_000_000).unwrap();
        assert_eq!(ts.as_second(), -1);
        assert_eq!(ts.subsec_nanosecond(), 500_000_000);
        assert_eq!(ts.as_nanosecond(), -500_000_000);
        // And ordering agrees with the instant, not with the fields'
        // naive reading.
        assert!(ts < Timestamp::UNIX_EPOCH);
        assert!(ts > Timestamp::new(-1, 0).unwrap());
        assert!(Timestamp::new(0, 1_000_000_000).is_err());
        assert!(Timestamp::new(0, -1_000_000_000).is_err());
    }

    #[test]
    fn range_validation() {
        assert!(Timestamp::from_second(Timestamp::MAX.as_second()).is_ok());
        assert!(
            Timestamp::from_second(Timestamp::MAX.as_second() + 1).is_err()
        );
        assert!(Timestamp::from_second(Timestamp::MIN.as_second()).is_ok());
        assert!(
            Timestamp::from_second(Timestamp::MIN.as_second() - 1).is_err()
        );
        // The borrow may be what pushes it out of range.
        assert!(Timestamp::new(Timestamp::MIN.as_second(), -1).is_err());
    }

    #[test]
    fn civil_roundtrip_at_offsets() {
        let date = Date::constant(2024, 3, 9);
        let time = Time::constant(18, 30, 15, 123_456_789);
        for hours in [-11, -5, 0, 3, 11] {
            let offset = TimeDelta::from_hours(hours).unwrap();
            let ts = Timestamp::from_civil(date, time, offset).unwrap();
            assert_eq!(ts.to_civil(offset).unwrap(), (date, time));
        }
        // Positive offsets lie east: the instant is earlier in UTC.
        let utc = Timestamp::from_civil(date, time, TimeDelta::ZERO).unwrap();
        let east = Timestamp::from_civil(
            date,
            time,
            TimeDelta::from_hours(2).unwrap(),
        )
        .unwrap();
        assert_eq!(utc.since(east), TimeDelta::from_secs(7_200));
    }

    #[test]
    fn offset_can_leave_the_supported_range() {
        let one_hour = TimeDelta::from_hours(1).unwrap();
        assert!(Timestamp::MAX.to_civil(one_hour).is_err());
        assert!(Timestamp::MIN.to_civil(-one_hour).is_err());
        assert!(
            Timestamp::from_civil(Date::MAX, Time::MAX, -one_hour).is_err()
        );
        assert!(
            Timestamp::from_civil(Date::MIN, Time::midnight(), one_hour)
                .is_err()
        );
    }

    #[test]
    fn duration_arithmetic() {
        let ts = Timestamp::UNIX_EPOCH;
        let shifted = ts.checked_add(90.minutes()).unwrap();
        assert_eq!(shifted.as_second(), 5_400);
        assert_eq!(shifted - 90.minutes(), ts);
        // Nanosecond borrow across the second boundary.
        let ts = Timestamp::new(10, 250_000_000).unwrap();
        let back = ts.checked_sub(500.milliseconds()).unwrap();
        assert_eq!(back.as_second(), 9);
        assert_eq!(back.subsec_nanosecond(), 750_000_000);
        // Day spans are exact 86,400 second shifts.
        let day = ts.checked_add(DayDelta::from_days(1)).unwrap();
        assert_eq!(day.as_second(), 86_410);
        assert!(Timestamp::MAX.checked_add(1.nanoseconds()).is_err());
        assert!(Timestamp::MIN.checked_sub(1.nanoseconds()).is_err());
        assert!(
            Timestamp::UNIX_EPOCH
                .checked_add(DayDelta::from_days(i64::MAX))
                .is_err()
        );
    }

    #[test]
    fn differences() {
        let a = Timestamp::new(5, 800_000_000).unwrap();
        let b = Timestamp::new(8, 100_000_000).unwrap();
        assert_eq!(a.until(b), TimeDelta::new(2, 300_000_000));
        assert_eq!(a.since(b), TimeDelta::new(-2, -300_000_000));
        assert_eq!(b - a, TimeDelta::new(2, 300_000_000));
        assert_eq!(a.abs_diff(b), b.abs_diff(a));
        // The extremes still fit a TimeDelta.
        let full = Timestamp::MIN.until(Timestamp::MAX);
        assert_eq!(
            full.as_nanos(),
            Timestamp::MAX.as_nanosecond() - Timestamp::MIN.as_nanosecond(),
        );
    }

    #[test]
    fn month_shifts_in_local_time() {
        let tz = FixedOffset { seconds_east: 7_200 };
        // 2000-01-31T23:30 at UTC+2.
        let ts = Timestamp::from_civil_local_with(
            Date::constant(2000, 1, 31),
            Time::constant(23, 30, 0, 250_000_000),
            &tz,
        )
        .unwrap();
        let shifted =
            ts.checked_add_months_with(1.months(), &tz).unwrap();
        let local = tz.broken_down_local(shifted.as_second()).unwrap();
        // Clamped to the leap-February 29th, local wall time preserved.
        assert_eq!(local.to_date().unwrap(), Date::constant(2000, 2, 29));
        assert_eq!(local.to_time().unwrap(), Time::constant(23, 30, 0, 0));
        assert_eq!(shifted.subsec_nanosecond(), 250_000_000);
        let back =
            shifted.checked_sub_months_with(1.months(), &tz).unwrap();
        let local = tz.broken_down_local(back.as_second()).unwrap();
        assert_eq!(local.to_date().unwrap(), Date::constant(2000, 1, 29));
    }

    #[test]
    fn debug_format() {
        assert_eq!(
            format!("{:?}", Timestamp::UNIX_EPOCH),
            "1970-01-01T00:00:00Z",
        );
        assert_eq!(
            format!("{}", Timestamp::new(-1, 500_000_000).unwrap()),
            "1969-12-31T23:59:59.500000000Z",
        );
    }

    quickcheck::quickcheck! {
        fn prop_civil_utc_roundtrip(ts: Timestamp) -> bool {
            let (date, time) = ts.to_civil(TimeDelta::ZERO).unwrap();
            Timestamp::from_civil_utc(date, time) == ts
        }

        fn prop_until_agrees_with_add(a: Timestamp, b: Timestamp) -> bool {
            a.checked_add(a.until(b)).unwrap() == b
        }

        fn prop_add_then_sub_is_identity(ts: Timestamp, secs: i32) -> bool {
            let delta = TimeDelta::from_secs(i64::from(secs));
            match ts.checked_add(delta) {
                Ok(shifted) => shifted.checked_sub(delta).unwrap() == ts,
                Err(_) => true,
            }
        }
    }
}
