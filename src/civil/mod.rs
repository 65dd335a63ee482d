/*!
Civil (calendar and clock) value types.

A civil value behaves without regard to time zones or daylight saving
time: a [`Date`] is a day on the proleptic Gregorian calendar, a
[`Time`] is a nanosecond-precision clock reading, a [`Weekday`] is a day
of the week with ISO 8601 numbering and an [`ISOWeekDate`] is the
ISO 8601 week-date form of a calendar date.
*/

pub use self::{
    date::{Date, DateDelta},
    iso_week_date::ISOWeekDate,
    time::Time,
    weekday::Weekday,
};

mod date;
mod iso_week_date;
mod time;
mod weekday;
