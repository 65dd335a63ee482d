/*!
Signed spans of time and of the calendar.

Two families of span live here and they do not mix implicitly:

* [`TimeDelta`] is an exact duration, seconds plus a fractional
nanosecond part in normalized form.
* [`DayDelta`] and [`MonthDelta`] are calendar spans. Days and months
are calendar units whose physical length depends on where they land,
so converting between the families is always an explicit, named step
([`DayDelta::to_time_delta`], [`TimeDelta::to_days`]).

The [`ToDelta`] trait offers short constructors on small integer types
for building spans inline:

```
use calclock::ToDelta;

let span = 90.minutes();
assert_eq!(span.as_secs(), 5_400);
assert_eq!(3.weeks().days(), 21);
```
*/

pub use self::{
    calendar::{DayDelta, MonthDelta},
    time::{DayRounding, TimeDelta},
};

mod calendar;
mod time;

/// A convenience trait for building spans from integer literals.
///
/// This is implemented for `i8`, `i16` and `i32`. Those widths are
/// chosen so that every constructor is infallible: the largest
/// magnitude any of them can produce fits the target span type with
/// room to spare.
pub trait ToDelta {
    /// Creates a calendar span of this many days.
    fn days(self) -> DayDelta;
    /// Creates a calendar span of this many weeks.
    fn weeks(self) -> DayDelta;
    /// Creates a calendar span of this many months.
    fn months(self) -> MonthDelta;
    /// Creates a calendar span of this many years.
    fn years(self) -> MonthDelta;
    /// Creates a duration of this many hours.
    fn hours(self) -> TimeDelta;
    /// Creates a duration of this many minutes.
    fn minutes(self) -> TimeDelta;
    /// Creates a duration of this many seconds.
    fn seconds(self) -> TimeDelta;
    /// Creates a duration of this many milliseconds.
    fn milliseconds(self) -> TimeDelta;
    /// Creates a duration of this many microseconds.
    fn microseconds(self) -> TimeDelta;
    /// Creates a duration of this many nanoseconds.
    fn nanoseconds(self) -> TimeDelta;
}

macro_rules! impl_to_delta {
    ($($ty:ty),*) => {
        $(
            impl ToDelta for $ty {
                #[inline]
                fn days(self) -> DayDelta {
                    DayDelta::from_days(i64::from(self))
                }
                #[inline]
                fn weeks(self) -> DayDelta {
                    DayDelta::from_days(i64::from(self) * 7)
                }
                #[inline]
                fn months(self) -> MonthDelta {
                    MonthDelta::from_months(i64::from(self))
                }
                #[inline]
                fn years(self) -> MonthDelta {
                    MonthDelta::from_months(i64::from(self) * 12)
                }
                #[inline]
                fn hours(self) -> TimeDelta {
                    TimeDelta::from_secs(i64::from(self) * 3_600)
                }
                #[inline]
                fn minutes(self) -> TimeDelta {
                    TimeDelta::from_secs(i64::from(self) * 60)
                }
                #[inline]
                fn seconds(self) -> TimeDelta {
                    TimeDelta::from_secs(i64::from(self))
                }
                #[inline]
                fn milliseconds(self) -> TimeDelta {
                    TimeDelta::from_millis(i64::from(self))
                }
                #[inline]
                fn microseconds(self) -> TimeDelta {
                    TimeDelta::from_micros(i64::from(self))
                }
                #[inline]
                fn nanoseconds(self) -> TimeDelta {
                    TimeDelta::from_nanos(i64::from(self))
                }
            }
        )*
    };
}

impl_to_delta!(i8, i16, i32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_spans() {
        assert_eq!(2i8.hours(), TimeDelta::from_secs(7_200));
        assert_eq!(90.minutes(), TimeDelta::from_secs(5_400));
        assert_eq!((-30i16).seconds(), TimeDelta::from_secs(-30));
        assert_eq!(250.milliseconds(), TimeDelta::new(0, 250_000_000));
        assert_eq!(1.microseconds(), TimeDelta::new(0, 1_000));
        assert_eq!((-1).nanoseconds(), TimeDelta::new(0, -1));
        assert_eq!(3.weeks(), DayDelta::from_days(21));
        assert_eq!((-2).days(), DayDelta::from_days(-2));
        assert_eq!(2.years(), MonthDelta::from_months(24));
        assert_eq!(18.months(), MonthDelta::from_months(18));
    }

    #[test]
    fn widest_width_cannot_overflow() {
        // i32::MAX hours in seconds is well inside i64.
        assert_eq!(i32::MAX.hours().as_secs(), i64::from(i32::MAX) * 3_600);
        assert_eq!(i32::MIN.weeks().days(), i64::from(i32::MIN) * 7);
    }
}
