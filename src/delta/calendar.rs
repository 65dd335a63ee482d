use core::ops::Neg;

use crate::{
    delta::TimeDelta,
    error::{err, Error},
    util::calendar::SECONDS_PER_DAY,
};

/// A signed span of whole calendar days.
///
/// Unlike a [`TimeDelta`], a `DayDelta` is a calendar quantity: adding
/// one day to a civil date always advances the date by one, regardless
/// of how many seconds that day would contain in any particular time
/// zone. When a fixed 86,400 second day is the right model,
/// [`DayDelta::to_time_delta`] converts explicitly.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DayDelta {
    days: i64,
}

impl DayDelta {
    /// The zero span of days.
    pub const ZERO: DayDelta = DayDelta { days: 0 };

    /// Creates a new span from a number of days.
    #[inline]
    pub const fn from_days(days: i64) -> DayDelta {
        DayDelta { days }
    }

    /// Creates a new span from a number of weeks, where a week is
    /// exactly 7 days.
    ///
    /// # Errors
    ///
    /// When the day count overflows.
    #[inline]
    pub fn from_weeks(weeks: i64) -> Result<DayDelta, Error> {
        let days = weeks
            .checked_mul(7)
            .ok_or_else(|| err!("{weeks} weeks overflows a day delta"))?;
        Ok(DayDelta { days })
    }

    /// Returns the number of days in this span.
    #[inline]
    pub const fn days(self) -> i64 {
        self.days
    }

    /// Adds two day spans together.
    ///
    /// # Errors
    ///
    /// When the sum overflows.
    #[inline]
    pub fn checked_add(self, rhs: DayDelta) -> Result<DayDelta, Error> {
        let days = self
            .days
            .checked_add(rhs.days)
            .ok_or_else(|| err!("adding day deltas overflows"))?;
        Ok(DayDelta { days })
    }

    /// Returns the negation of this span.
    ///
    /// # Errors
    ///
    /// When the day count is `i64::MIN`.
    #[inline]
    pub fn checked_neg(self) -> Result<DayDelta, Error> {
        let days = self
            .days
            .checked_neg()
            .ok_or_else(|| err!("negating minimal day delta overflows"))?;
        Ok(DayDelta { days })
    }

    /// Converts this span to an exact duration at 86,400 seconds per
    /// day.
    ///
    /// # Errors
    ///
    /// When the second count overflows.
    #[inline]
    pub fn to_time_delta(self) -> Result<TimeDelta, Error> {
        let secs = self.days.checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
            err!("{days} days overflows a time delta", days = self.days)
        })?;
        Ok(TimeDelta::from_secs(secs))
    }
}

/// Negates this span.
///
/// # Panics
///
/// When the day count is `i64::MIN`.
impl Neg for DayDelta {
    type Output = DayDelta;

    #[inline]
    fn neg(self) -> DayDelta {
        self.checked_neg().expect("negating minimal day delta overflows")
    }
}

/// A signed span of whole calendar months.
///
/// Months have no fixed length, so a `MonthDelta` never converts to a
/// [`TimeDelta`]. It only acquires a concrete meaning when applied to a
/// calendar value, where a day-of-month past the end of the target
/// month clamps to that month's last day.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MonthDelta {
    months: i64,
}

impl MonthDelta {
    /// The zero span of months.
    pub const ZERO: MonthDelta = MonthDelta { months: 0 };

    /// Creates a new span from a number of months.
    #[inline]
    pub const fn from_months(months: i64) -> MonthDelta {
        MonthDelta { months }
    }

    /// Creates a new span from a number of years, where a year is
    /// exactly 12 months.
    ///
    /// # Errors
    ///
    /// When the month count overflows.
    #[inline]
    pub fn from_years(years: i64) -> Result<MonthDelta, Error> {
        let months = years
            .checked_mul(12)
            .ok_or_else(|| err!("{years} years overflows a month delta"))?;
        Ok(MonthDelta { months })
    }

    /// Returns the number of months in this span.
    #[inline]
    pub const fn months(self) -> i64 {
        self.months
    }

    /// Adds two month spans together.
    ///
    /// # Errors
    ///
    /// When the sum overflows.
    #[inline]
    pub fn checked_add(self, rhs: MonthDelta) -> Result<MonthDelta, Error> {
        let months = self
            .months
            .checked_add(rhs.months)
            .ok_or_else(|| err!("adding month deltas overflows"))?;
        Ok(MonthDelta { months })
    }

    /// Returns the negation of this span.
    ///
    /// # Errors
    ///
    /// When the month count is `i64::MIN`.
    #[inline]
    pub fn checked_neg(self) -> Result<MonthDelta, Error> {
        let months = self
            .months
            .checked_neg()
            .ok_or_else(|| err!("negating minimal month delta overflows"))?;
        Ok(MonthDelta { months })
    }
}

/// Negates this span.
///
/// # Panics
///
/// When the month count is `i64::MIN`.
impl Neg for MonthDelta {
    type Output = MonthDelta;

    #[inline]
    fn neg(self) -> MonthDelta {
        self.checked_neg().expect("negating minimal month delta overflows")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_and_year_expansion() {
        assert_eq!(DayDelta::from_weeks(3).unwrap().days(), 21);
        assert_eq!(DayDelta::from_weeks(-2).unwrap().days(), -14);
        assert!(DayDelta::from_weeks(i64::MAX).is_err());
        assert_eq!(MonthDelta::from_years(2).unwrap().months(), 24);
        assert_eq!(MonthDelta::from_years(-1).unwrap().months(), -12);
        assert!(MonthDelta::from_years(i64::MIN).is_err());
    }

    #[test]
    fn day_span_to_duration() {
        assert_eq!(
            DayDelta::from_days(2).to_time_delta().unwrap(),
            TimeDelta::from_secs(172_800),
        );
        assert_eq!(
            DayDelta::from_days(-1).to_time_delta().unwrap(),
            TimeDelta::from_secs(-86_400),
        );
        assert!(DayDelta::from_days(i64::MAX).to_time_delta().is_err());
    }

    #[test]
    fn arithmetic() {
        let a = DayDelta::from_days(10);
        let b = DayDelta::from_days(-4);
        assert_eq!(a.checked_add(b).unwrap(), DayDelta::from_days(6));
        assert_eq!(-a, DayDelta::from_days(-10));
        assert!(DayDelta::from_days(i64::MIN).checked_neg().is_err());

        let m = MonthDelta::from_months(5);
        assert_eq!(
            m.checked_add(MonthDelta::from_months(-7)).unwrap(),
            MonthDelta::from_months(-2),
        );
        assert_eq!(-m, MonthDelta::from_months(-5));
        assert!(
            MonthDelta::from_months(i64::MAX)
                .checked_add(MonthDelta::from_months(1))
                .is_err()
        );
    }
}
