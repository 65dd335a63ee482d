use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::{
    civil::{ISOWeekDate, Time, Weekday},
    delta::{DayDelta, MonthDelta},
    error::Error,
    timestamp::Timestamp,
    util::calendar,
};

/// A representation of a civil date in the Gregorian calendar.
///
/// A `Date` is a triple of year, month and day, with no time-of-day and
/// no time zone attached. The calendar is proleptic Gregorian: its leap
/// year rule extends backward indefinitely, with no Julian transition.
/// Combine a date with a [`Time`] via [`Timestamp::from_civil`] to name
/// an instant.
///
/// # Supported range
///
/// Years run from `-9999` through `9999` inclusive, with year `0`
/// present (astronomical numbering, so year `0` is 1 BCE). Every
/// constructor rejects values outside this range.
///
/// # Example
///
/// ```
/// use calclock::{civil::Date, ToDelta};
///
/// let date = Date::new(2000, 2, 29)?;
/// assert_eq!(date.day_of_year(), 60);
/// // Adding a month clamps the day to the shorter month.
/// let jan31 = Date::new(2000, 1, 31)?;
/// assert_eq!(jan31.checked_add(1.months())?, Date::new(2000, 2, 29)?);
/// # Ok::<(), calclock::Error>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date {
    year: i16,
    month: i8,
    day: i8,
}

impl Date {
    /// The minimum supported date, `-9999-01-01`.
    pub const MIN: Date = Date { year: -9999, month: 1, day: 1 };

    /// The maximum supported date, `9999-12-31`.
    pub const MAX: Date = Date { year: 9999, month: 12, day: 31 };

    /// The first day of year zero, `0000-01-01`.
    pub const ZERO: Date = Date { year: 0, month: 1, day: 1 };

    /// Creates a new `Date` from its component values.
    ///
    /// # Errors
    ///
    /// When the year is outside `-9999..=9999`, the month outside
    /// `1..=12` or the day outside `1..=N` where `N` is the length of
    /// the given month. The first out-of-range component, in that
    /// order, is the one reported.
    #[inline]
    pub fn new(year: i16, month: i8, day: i8) -> Result<Date, Error> {
        if !(calendar::MIN_YEAR..=calendar::MAX_YEAR).contains(&year) {
            return Err(Error::range(
                "year",
                year,
                calendar::MIN_YEAR,
                calendar::MAX_YEAR,
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::range("month", month, 1, 12));
        }
        let max_day = calendar::days_in_month(year, month);
        if !(1..=max_day).contains(&day) {
            return Err(Error::range("day", day, 1, max_day));
        }
        Ok(Date { year, month, day })
    }

    /// Creates a new `Date` in a const context.
    ///
    /// # Panics
    ///
    /// When the components do not form a valid date. Prefer
    /// [`Date::new`] with runtime values.
    #[inline]
    pub const fn constant(year: i16, month: i8, day: i8) -> Date {
        if year < calendar::MIN_YEAR || year > calendar::MAX_YEAR {
            panic!("invalid year");
        }
        if month < 1 || month > 12 {
            panic!("invalid month");
        }
        if day < 1 || day > calendar::days_in_month(year, month) {
            panic!("invalid day");
        }
        Date { year, month, day }
    }

    /// Creates the first day of the given year.
    #[inline]
    pub fn from_year(year: i16) -> Result<Date, Error> {
        Date::new(year, 1, 1)
    }

    /// Creates the first day of the given month in the given year.
    #[inline]
    pub fn from_year_month(year: i16, month: i8) -> Result<Date, Error> {
        Date::new(year, month, 1)
    }

    /// Creates a new `Date` from a year and an ordinal day of that
    /// year.
    ///
    /// # Errors
    ///
    /// When the year is out of range or the ordinal is not in
    /// `1..=365` (or `1..=366` in a leap year).
    #[inline]
    pub fn from_day_of_year(
        year: i16,
        day_of_year: i16,
    ) -> Result<Date, Error> {
        if !(calendar::MIN_YEAR..=calendar::MAX_YEAR).contains(&year) {
            return Err(Error::range(
                "year",
                year,
                calendar::MIN_YEAR,
                calendar::MAX_YEAR,
            ));
        }
        let (month, day) = calendar::from_day_of_year(year, day_of_year)
            .ok_or_else(|| {
                Error::range(
                    "day of year",
                    day_of_year,
                    1,
                    calendar::days_in_year(year),
                )
            })?;
        Ok(Date { year, month, day })
    }

    /// Creates a new `Date` from an ISO 8601 week date.
    ///
    /// # Errors
    ///
    /// When the corresponding calendar date falls outside the supported
    /// year range, which can only happen in the first week of `-9999`
    /// or the last week of `9999`.
    #[inline]
    pub fn from_iso_week_date(wd: ISOWeekDate) -> Result<Date, Error> {
        wd.to_date()
    }

    /// Creates a new `Date` from a count of days since the Unix epoch,
    /// where day `0` is `1970-01-01`.
    ///
    /// # Errors
    ///
    /// When the day count falls outside the supported date range.
    #[inline]
    pub fn from_epoch_day(epoch_day: i32) -> Result<Date, Error> {
        if !(calendar::MIN_EPOCH_DAY..=calendar::MAX_EPOCH_DAY)
            .contains(&epoch_day)
        {
            return Err(Error::range(
                "day",
                epoch_day,
                calendar::MIN_EPOCH_DAY,
                calendar::MAX_EPOCH_DAY,
            ));
        }
        let (year, month, day) = calendar::from_epoch_day(epoch_day);
        Ok(Date { year, month, day })
    }

    /// Returns the year, in `-9999..=9999`.
    #[inline]
    pub fn year(self) -> i16 {
        self.year
    }

    /// Returns the month, in `1..=12`.
    #[inline]
    pub fn month(self) -> i8 {
        self.month
    }

    /// Returns the day of the month, in `1..=31`.
    #[inline]
    pub fn day(self) -> i8 {
        self.day
    }

    /// Returns the ordinal day of the year, in `1..=365/366`.
    #[inline]
    pub fn day_of_year(self) -> i16 {
        calendar::day_of_year(self.year, self.month, self.day)
    }

    /// Returns the weekday of this date.
    #[inline]
    pub fn weekday(self) -> Weekday {
        Weekday::from_iso_unchecked(calendar::weekday_from_epoch_day(
            self.to_epoch_day(),
        ))
    }

    /// Returns this date in the ISO 8601 week calendar.
    ///
    /// The week-based year can differ from [`Date::year`] by one near
    /// the calendar year boundary.
    ///
    /// # Example
    ///
    /// ```
    /// use calclock::civil::{Date, Weekday};
    ///
    /// // 2006-01-01 belongs to week 52 of ISO year 2005.
    /// let wd = Date::constant(2006, 1, 1).iso_week_date();
    /// assert_eq!((wd.year(), wd.week()), (2005, 52));
    /// assert_eq!(wd.weekday(), Weekday::Sunday);
    /// ```
    #[inline]
    pub fn iso_week_date(self) -> ISOWeekDate {
        let weekday = self.weekday();
        let (week, year) = calendar::iso_week_of_year(
            self.year,
            self.day_of_year(),
            weekday.to_iso(),
        );
        ISOWeekDate::new_unchecked(year, week, weekday)
    }

    /// Returns true when this date's year is a leap year.
    #[inline]
    pub fn in_leap_year(self) -> bool {
        calendar::is_leap_year(self.year)
    }

    /// Returns the number of days in this date's month.
    #[inline]
    pub fn days_in_month(self) -> i8 {
        calendar::days_in_month(self.year, self.month)
    }

    /// Returns the number of days in this date's year: 365 or 366.
    #[inline]
    pub fn days_in_year(self) -> i16 {
        calendar::days_in_year(self.year)
    }

    /// Returns the first day of this date's month.
    #[inline]
    pub fn first_of_month(self) -> Date {
        Date { day: 1, ..self }
    }

    /// Returns the last day of this date's month.
    #[inline]
    pub fn last_of_month(self) -> Date {
        Date { day: self.days_in_month(), ..self }
    }

    /// Returns the date immediately after this one.
    ///
    /// # Errors
    ///
    /// When this date is [`Date::MAX`].
    #[inline]
    pub fn tomorrow(self) -> Result<Date, Error> {
        self.checked_add(DayDelta::from_days(1))
    }

    /// Returns the date immediately before this one.
    ///
    /// # Errors
    ///
    /// When this date is [`Date::MIN`].
    #[inline]
    pub fn yesterday(self) -> Result<Date, Error> {
        self.checked_sub(DayDelta::from_days(1))
    }

    /// Returns the number of days since the Unix epoch. Dates before
    /// `1970-01-01` yield negative counts.
    #[inline]
    pub fn to_epoch_day(self) -> i32 {
        calendar::to_epoch_day(self.year, self.month, self.day)
    }

    /// Combines this date with a time-of-day into a UTC [`Timestamp`].
    #[inline]
    pub fn at(self, time: Time) -> Timestamp {
        Timestamp::from_civil_utc(self, time)
    }

    /// Adds a span of days or months to this date.
    ///
    /// Day spans move through the day count directly. Month spans keep
    /// the day-of-month where possible and clamp it to the last day of
    /// the target month otherwise, so the operation is total on any
    /// in-range target: `2000-01-31` plus one month is `2000-02-29`.
    ///
    /// That clamp makes month addition non-invertible. Adding a month
    /// and subtracting a month lands back on the clamped day, not
    /// necessarily the original one.
    ///
    /// # Errors
    ///
    /// When the resulting date falls outside the supported range.
    #[inline]
    pub fn checked_add<D: Into<DateDelta>>(
        self,
        delta: D,
    ) -> Result<Date, Error> {
        match delta.into() {
            DateDelta::Days(days) => self.shift_days(days.days()),
            DateDelta::Months(months) => self.shift_months(months.months()),
        }
    }

    /// Subtracts a span of days or months from this date.
    ///
    /// This is [`Date::checked_add`] with the span negated. See there
    /// for the clamping rule on month spans.
    ///
    /// # Errors
    ///
    /// When the resulting date falls outside the supported range.
    #[inline]
    pub fn checked_sub<D: Into<DateDelta>>(
        self,
        delta: D,
    ) -> Result<Date, Error> {
        // Negate the raw counts rather than the span values, so that
        // i64::MIN spans subtract without a spurious overflow. (The
        // wrapped negation lands so far out of range that the shift
        // itself reports the error.)
        match delta.into() {
            DateDelta::Days(days) => {
                self.shift_days(days.days().wrapping_neg())
            }
            DateDelta::Months(months) => {
                self.shift_months(months.months().wrapping_neg())
            }
        }
    }

    /// Like [`Date::checked_add`], but clamps to [`Date::MIN`] or
    /// [`Date::MAX`] instead of reporting an out-of-range result.
    #[inline]
    pub fn saturating_add<D: Into<DateDelta>>(self, delta: D) -> Date {
        let delta = delta.into();
        self.checked_add(delta).unwrap_or_else(|_| {
            if delta.is_negative() {
                Date::MIN
            } else {
                Date::MAX
            }
        })
    }

    /// Like [`Date::checked_sub`], but clamps to [`Date::MIN`] or
    /// [`Date::MAX`] instead of reporting an out-of-range result.
    #[inline]
    pub fn saturating_sub<D: Into<DateDelta>>(self, delta: D) -> Date {
        let delta = delta.into();
        self.checked_sub(delta).unwrap_or_else(|_| {
            if delta.is_negative() {
                Date::MAX
            } else {
                Date::MIN
            }
        })
    }

    /// Returns the span of days from this date to `other`. The result
    /// is positive when `other` is later than this date.
    #[inline]
    pub fn until(self, other: Date) -> DayDelta {
        // Anchor both dates at noon so the difference stays a whole
        // number of days even if this is ever fed offset-shifted
        // endpoints near a transition.
        const NOON: Time = Time::constant(12, 0, 0, 0);
        let span = self.at(NOON).until(other.at(NOON));
        span.to_days(crate::delta::DayRounding::Trunc)
    }

    /// Returns the span of days from `other` to this date. The result
    /// is positive when this date is later than `other`.
    #[inline]
    pub fn since(self, other: Date) -> DayDelta {
        other.until(self)
    }

    #[inline]
    fn shift_days(self, days: i64) -> Result<Date, Error> {
        let epoch_day = i64::from(self.to_epoch_day())
            .checked_add(days)
            .and_then(|sum| i32::try_from(sum).ok())
            .ok_or_else(|| {
                Error::range(
                    "day",
                    days,
                    calendar::MIN_EPOCH_DAY,
                    calendar::MAX_EPOCH_DAY,
                )
            })?;
        Date::from_epoch_day(epoch_day)
    }

    #[inline]
    fn shift_months(self, months: i64) -> Result<Date, Error> {
        let month = i64::from(self.month)
            .checked_add(months)
            .ok_or_else(|| Error::range("month", months, -120_000, 120_000))?;
        let (year, month) =
            calendar::normalize_month_overflow(i64::from(self.year), month);
        if !(i64::from(calendar::MIN_YEAR)..=i64::from(calendar::MAX_YEAR))
            .contains(&year)
        {
            return Err(Error::range(
                "year",
                year,
                calendar::MIN_YEAR,
                calendar::MAX_YEAR,
            ));
        }
        let (year, month) = (year as i16, month as i8);
        let day = calendar::saturate_day_in_month(year, month, self.day);
        Ok(Date { year, month, day })
    }
}

impl Default for Date {
    fn default() -> Date {
        Date::ZERO
    }
}

impl core::fmt::Debug for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year, self.month, self.day
        )
    }
}

impl core::fmt::Display for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// A span that can shift a [`Date`]: whole days or whole months.
///
/// This exists so that [`Date::checked_add`] and friends accept either
/// a [`DayDelta`] or a [`MonthDelta`] through `impl Into<DateDelta>`,
/// without pretending the two units are interchangeable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DateDelta {
    /// A span of whole days.
    Days(DayDelta),
    /// A span of whole months.
    Months(MonthDelta),
}

impl DateDelta {
    fn is_negative(self) -> bool {
        match self {
            DateDelta::Days(d) => d.days() < 0,
            DateDelta::Months(m) => m.months() < 0,
        }
    }
}

impl From<DayDelta> for DateDelta {
    fn from(delta: DayDelta) -> DateDelta {
        DateDelta::Days(delta)
    }
}

impl From<MonthDelta> for DateDelta {
    fn from(delta: MonthDelta) -> DateDelta {
        DateDelta::Months(delta)
    }
}

/// Adds a span of days or months to a date.
///
/// # Panics
///
/// When the result is out of range. For a fallible version, see
/// [`Date::checked_add`].
impl<D: Into<DateDelta>> Add<D> for Date {
    type Output = Date;

    #[inline]
    fn add(self, rhs: D) -> Date {
        self.checked_add(rhs).expect("date addition out of range")
    }
}

impl<D: Into<DateDelta>> AddAssign<D> for Date {
    #[inline]
    fn add_assign(&mut self, rhs: D) {
        *self = *self + rhs;
    }
}

/// Subtracts a span of days or months from a date.
///
/// # Panics
///
/// When the result is out of range. For a fallible version, see
/// [`Date::checked_sub`].
impl<D: Into<DateDelta>> Sub<D> for Date {
    type Output = Date;

    #[inline]
    fn sub(self, rhs: D) -> Date {
        self.checked_sub(rhs).expect("date subtraction out of range")
    }
}

impl<D: Into<DateDelta>> SubAssign<D> for Date {
    #[inline]
    fn sub_assign(&mut self, rhs: D) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Date {
    fn arbitrary(g: &mut quickcheck::Gen) -> Date {
        let span = (calendar::MAX_EPOCH_DAY - calendar::MIN_EPOCH_DAY) as i64;
        let offset = i64::arbitrary(g).rem_euclid(span + 1) as i32;
        let epoch_day = calendar::MIN_EPOCH_DAY + offset;
        Date::from_epoch_day(epoch_day).unwrap()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Date>> {
        let epoch_day = self.to_epoch_day();
        Box::new(
            epoch_day
                .shrink()
                .filter_map(|day| Date::from_epoch_day(day).ok()),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::ToDelta;

    use super::*;

    #[test]
    fn component_validation() {
        assert!(Date::new(2024, 2, 29).is_ok());
        let err = Date::new(2023, 2, 29).unwrap_err();
        assert!(err.is_range());
        assert_eq!(err.to_string(), "parameter 'day' with value 29 is not in the required range of 1..=28");
        assert!(Date::new(2023, 13, 1).is_err());
        assert!(Date::new(2023, 0, 1).is_err());
        assert!(Date::new(10_000, 1, 1).is_err());
        assert!(Date::new(-10_000, 1, 1).is_err());
        // Year 0 exists.
        assert!(Date::new(0, 2, 29).is_ok());
    }

    #[test]
    fn epoch_day_conversions() {
        assert_eq!(Date::constant(1970, 1, 1).to_epoch_day(), 0);
        assert_eq!(Date::constant(1969, 12, 31).to_epoch_day(), -1);
        assert_eq!(Date::from_epoch_day(0).unwrap(), Date::constant(1970, 1, 1));
        assert_eq!(Date::MIN.to_epoch_day(), calendar::MIN_EPOCH_DAY);
        assert_eq!(Date::MAX.to_epoch_day(), calendar::MAX_EPOCH_DAY);
        assert!(Date::from_epoch_day(calendar::MAX_EPOCH_DAY + 1).is_err());
        assert!(Date::from_epoch_day(calendar::MIN_EPOCH_DAY - 1).is_err());
    }

    #[test]
    fn ordinal_days() {
        assert_eq!(Date::constant(2024, 3, 1).day_of_year(), 61);
        assert_eq!(Date::constant(2023, 3, 1).day_of_year(), 60);
        assert_eq!(
            Date::from_day_of_year(2024, 366).unwrap(),
            Date::constant(2024, 12, 31),
        );
        assert!(Date::from_day_of_year(2023, 366).is_err());
        assert!(Date::from_day_of_year(2024, 0).is_err());
    }

    #[test]
    fn weekdays() {
        assert_eq!(Date::constant(1970, 1, 1).weekday(), Weekday::Thursday);
        assert_eq!(Date::constant(2024, 3, 9).weekday(), Weekday::Saturday);
        assert_eq!(Date::constant(1969, 12, 31).weekday(), Weekday::Wednesday);
    }

    #[test]
    fn month_arithmetic_clamps() {
        let jan31 = Date::constant(2000, 1, 31);
        assert_eq!(
            jan31.checked_add(1.months()).unwrap(),
            Date::constant(2000, 2, 29),
        );
        assert_eq!(
            Date::constant(1999, 1, 31).checked_add(1.months()).unwrap(),
            Date::constant(1999, 2, 28),
        );
        // The clamp is sticky under inversion.
        let back = jan31
            .checked_add(1.months())
            .unwrap()
            .checked_sub(1.months())
            .unwrap();
        assert_eq!(back, Date::constant(2000, 1, 29));
        // Month arithmetic crosses year boundaries in either direction.
        assert_eq!(
            Date::constant(2020, 11, 15).checked_add(3.months()).unwrap(),
            Date::constant(2021, 2, 15),
        );
        assert_eq!(
            Date::constant(2020, 2, 15).checked_sub(26.months()).unwrap(),
            Date::constant(2017, 12, 15),
        );
    }

    #[test]
    fn day_arithmetic() {
        let d = Date::constant(2024, 2, 28);
        assert_eq!(
            d.checked_add(2.days()).unwrap(),
            Date::constant(2024, 3, 1),
        );
        assert_eq!(d + 1.days(), Date::constant(2024, 2, 29));
        assert_eq!(d - 59.days(), Date::constant(2023, 12, 31));
        assert!(Date::MAX.checked_add(1.days()).is_err());
        assert!(Date::MIN.checked_sub(1.days()).is_err());
        assert!(Date::MAX.checked_add(DayDelta::from_days(i64::MAX)).is_err());
        assert!(Date::MIN.checked_sub(DayDelta::from_days(i64::MIN)).is_err());
    }

    #[test]
    fn saturating_arithmetic() {
        assert_eq!(Date::MAX.saturating_add(1.days()), Date::MAX);
        assert_eq!(Date::MIN.saturating_sub(1.days()), Date::MIN);
        assert_eq!(Date::MIN.saturating_add(-1.days()), Date::MIN);
        assert_eq!(Date::MAX.saturating_add(9_999.years()), Date::MAX);
        assert_eq!(
            Date::constant(2024, 6, 1).saturating_add(1.days()),
            Date::constant(2024, 6, 2),
        );
    }

    #[test]
    fn spans_between_dates() {
        let a = Date::constant(2024, 1, 1);
        let b = Date::constant(2024, 3, 1);
        assert_eq!(a.until(b), DayDelta::from_days(60));
        assert_eq!(a.since(b), DayDelta::from_days(-60));
        assert_eq!(a.until(a), DayDelta::ZERO);
        assert_eq!(
            Date::MIN.until(Date::MAX),
            DayDelta::from_days(i64::from(
                calendar::MAX_EPOCH_DAY - calendar::MIN_EPOCH_DAY
            )),
        );
    }

    #[test]
    fn month_navigation() {
        let d = Date::constant(2024, 2, 15);
        assert_eq!(d.first_of_month(), Date::constant(2024, 2, 1));
        assert_eq!(d.last_of_month(), Date::constant(2024, 2, 29));
        assert_eq!(d.days_in_month(), 29);
        assert_eq!(d.days_in_year(), 366);
        assert!(d.in_leap_year());
        assert_eq!(
            Date::constant(2023, 12, 31).tomorrow().unwrap(),
            Date::constant(2024, 1, 1),
        );
        assert_eq!(
            Date::constant(2024, 1, 1).yesterday().unwrap(),
            Date::constant(2023, 12, 31),
        );
        assert!(Date::MAX.tomorrow().is_err());
        assert!(Date::MIN.yesterday().is_err());
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Date::constant(2024, 3, 9)), "2024-03-09");
        assert_eq!(format!("{}", Date::constant(-544, 1, 1)), "-544-01-01");
        assert_eq!(format!("{:?}", Date::constant(1, 1, 1)), "0001-01-01");
    }

    quickcheck::quickcheck! {
        fn prop_epoch_day_roundtrip(d: Date) -> bool {
            Date::from_epoch_day(d.to_epoch_day()).unwrap() == d
        }

        fn prop_iso_week_date_roundtrip(d: Date) -> bool {
            d.iso_week_date().to_date().unwrap() == d
        }

        fn prop_ordinal_roundtrip(d: Date) -> bool {
            Date::from_day_of_year(d.year(), d.day_of_year()).unwrap() == d
        }

        fn prop_add_days_then_sub_is_identity(d: Date, days: i16) -> bool {
            let days = DayDelta::from_days(i64::from(days));
            match d.checked_add(days) {
                Ok(shifted) => shifted.checked_sub(days).unwrap() == d,
                Err(_) => true,
            }
        }

        fn prop_until_agrees_with_add(d: Date, e: Date) -> bool {
            d.checked_add(d.until(e)).unwrap() == e
        }
    }
}
