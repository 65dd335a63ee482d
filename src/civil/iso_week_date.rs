use crate::{
    civil::{Date, Weekday},
    error::Error,
    util::calendar,
};

/// A representation of a civil date in the ISO 8601 week calendar.
///
/// An ISO week date is a triple of a week-based year, a week number and
/// a weekday. Week 1 of a year is the week containing the year's first
/// Thursday, so the week-based year can differ from the calendar year
/// by one in the first and last few days of January and December. A
/// year has either 52 or 53 weeks.
///
/// # Example
///
/// ```
/// use calclock::civil::{Date, ISOWeekDate, Weekday};
///
/// let wd = ISOWeekDate::new(2009, 53, Weekday::Sunday)?;
/// assert_eq!(wd.to_date()?, Date::new(2010, 1, 3)?);
/// # Ok::<(), calclock::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct ISOWeekDate {
    year: i16,
    week: i8,
    weekday: Weekday,
}

impl ISOWeekDate {
    /// Creates a new ISO week date from its component values.
    ///
    /// # Errors
    ///
    /// This returns an error when the year is outside `-9999..=9999` or
    /// the week is not in `1..=52` (or `1..=53` in a long year).
    #[inline]
    pub fn new(
        year: i16,
        week: i8,
        weekday: Weekday,
    ) -> Result<ISOWeekDate, Error> {
        if !(calendar::MIN_YEAR..=calendar::MAX_YEAR).contains(&year) {
            return Err(Error::range(
                "year",
                year,
                calendar::MIN_YEAR,
                calendar::MAX_YEAR,
            ));
        }
        let last = calendar::last_iso_week_of_year(year);
        if !(1..=last).contains(&week) {
            return Err(Error::range("week", week, 1, last));
        }
        Ok(ISOWeekDate { year, week, weekday })
    }

    /// Like [`ISOWeekDate::new`], but accepts the weekday as its ISO
    /// number, with `0` as an alias for Sunday.
    #[inline]
    pub fn from_numbers(
        year: i16,
        week: i8,
        weekday: i8,
    ) -> Result<ISOWeekDate, Error> {
        ISOWeekDate::new(year, week, Weekday::from_iso(weekday)?)
    }

    /// For components already known to be valid, from week-number
    /// computations on an in-range date.
    #[inline]
    pub(crate) const fn new_unchecked(
        year: i16,
        week: i8,
        weekday: Weekday,
    ) -> ISOWeekDate {
        ISOWeekDate { year, week, weekday }
    }

    /// Returns the ISO week-based year, in `-9999..=9999`.
    #[inline]
    pub fn year(self) -> i16 {
        self.year
    }

    /// Returns the week number, in `1..=52` or `1..=53`.
    #[inline]
    pub fn week(self) -> i8 {
        self.week
    }

    /// Returns the weekday.
    #[inline]
    pub fn weekday(self) -> Weekday {
        self.weekday
    }

    /// Converts this week date to a Gregorian calendar [`Date`].
    ///
    /// # Errors
    ///
    /// The very first days of year `-9999` and the very last days of
    /// year `9999` belong to ISO weeks of the adjacent, unsupported
    /// calendar year; converting those returns a range error.
    #[inline]
    pub fn to_date(self) -> Result<Date, Error> {
        let (year, month, day) = calendar::from_iso_week_date(
            self.year,
            self.week,
            self.weekday.to_iso(),
        );
        if !((calendar::MIN_YEAR as i32)..=(calendar::MAX_YEAR as i32))
            .contains(&year)
        {
            return Err(Error::range(
                "year",
                year,
                calendar::MIN_YEAR,
                calendar::MAX_YEAR,
            ));
        }
        Date::new(year as i16, month, day)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for ISOWeekDate {
    fn arbitrary(g: &mut quickcheck::Gen) -> ISOWeekDate {
        let date = Date::arbitrary(g);
        date.iso_week_date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_validation_tracks_long_years() {
        // 2004 has 53 ISO weeks, 2005 has 52.
        assert!(ISOWeekDate::new(2004, 53, Weekday::Monday).is_ok());
        let err = ISOWeekDate::new(2005, 53, Weekday::Monday).unwrap_err();
        assert!(err.is_range());
        assert!(ISOWeekDate::new(2005, 0, Weekday::Monday).is_err());
    }

    #[test]
    fn weekday_alias() {
        let wd = ISOWeekDate::from_numbers(1994, 52, 0).unwrap();
        assert_eq!(wd.weekday(), Weekday::Sunday);
        assert_eq!(wd.to_date().unwrap(), Date::constant(1995, 1, 1));
        assert!(ISOWeekDate::from_numbers(1994, 52, 8).is_err());
    }

    #[test]
    fn conversion_spills_years() {
        let wd = ISOWeekDate::new(1997, 1, Weekday::Tuesday).unwrap();
        assert_eq!(wd.to_date().unwrap(), Date::constant(1996, 12, 31));
        let wd = ISOWeekDate::new(2020, 1, Weekday::Monday).unwrap();
        assert_eq!(wd.to_date().unwrap(), Date::constant(2019, 12, 30));
    }

    #[test]
    fn out_of_range_at_extremes() {
        // 9999-12-31 is a Friday, so the Saturday and Sunday of its ISO
        // week land in the year 10000.
        let wd = ISOWeekDate::new(9999, 52, Weekday::Saturday).unwrap();
        assert!(wd.to_date().unwrap_err().is_range());
        assert_eq!(
            ISOWeekDate::new(9999, 52, Weekday::Friday)
                .unwrap()
                .to_date()
                .unwrap(),
            Date::constant(9999, 12, 31),
        );
    }
}
