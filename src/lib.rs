/*!
A calendar-and-clock arithmetic engine.

This crate represents civil dates, times of day, absolute instants and
signed calendar/time deltas, and converts between them with exact and
deterministic arithmetic. It knows nothing about timezone databases. The
only place host timezone policy enters is the [`oracle`] module, which
wraps the platform's broken-down local time conversion behind a small,
serialized boundary.

# Value types

* [`civil::Date`] is a day on the proleptic Gregorian calendar, for any
  year in `-9999..=9999`.
* [`civil::Time`] is a clock time with nanosecond precision and no date
  or zone attached.
* [`Timestamp`] is an absolute instant, counted in seconds (plus a
  non-negative nanosecond fraction) since `1970-01-01T00:00:00Z`.
* [`TimeDelta`] is a signed duration of seconds and nanoseconds.
* [`DayDelta`] and [`MonthDelta`] are signed counts of whole days and
  whole months. Days convert losslessly to a [`TimeDelta`]; months
  deliberately do not, since months vary in length.

All of them are immutable `Copy` values. Arithmetic never mutates in
place; it produces a new normalized value or reports an error.

# Example

```
use calclock::{civil::{Date, Time}, TimeDelta, Timestamp, ToDelta};

let date = Date::new(2024, 2, 29)?;
let time = Time::new(13, 30, 0, 0)?;
let ts = Timestamp::from_civil(date, time, TimeDelta::from_hours(2)?)?;
assert_eq!(ts.as_second(), 1709206200);

let next = date.checked_add(1.months())?;
assert_eq!(next, Date::new(2024, 3, 29)?);
# Ok::<(), calclock::Error>(())
```

# Errors

Construction is total: every fallible constructor returns a
`Result<T, calclock::Error>` instead of panicking or producing a tagged
invalid value. The `const` constructors (`Date::constant` and friends)
and the operator sugar (`+`, `-`) are the documented exceptions; they
panic where their checked counterparts would return an error.

# Crate features

* **logging** - emits trace/warn records through the `log` crate at the
  host local-time boundary.
* **serde** - `Serialize`/`Deserialize` for all value types over their
  normalized integer fields.
*/

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub use crate::{
    delta::{DayDelta, DayRounding, MonthDelta, TimeDelta, ToDelta},
    error::Error,
    oracle::{BrokenDown, SystemOracle, TimeOracle},
    timestamp::{Timestamp, TimestampDelta},
};

#[macro_use]
mod logging;

pub mod civil;
pub mod delta;
mod error;
pub mod oracle;
#[cfg(feature = "serde")]
mod serde;
mod timestamp;
mod util;
