/*!
The boundary between this crate's deterministic calendar arithmetic and
the host's notion of time.

Everything else in this crate is a pure function. The two places where
the outside world leaks in, reading the current clock and interpreting
a civil datetime in the host's local time zone, are funneled through
the [`TimeOracle`] trait so that they can be swapped out in tests. The
default implementation, [`SystemOracle`], asks the platform.

Local time is treated as an opaque oracle on purpose: time zone rules
are political data that changes under a running program, and this crate
does not ship or parse a copy of them. What the host says, goes.
*/

use std::sync::Mutex;

use crate::{
    civil::{Date, Time, Weekday},
    error::Error,
    util::calendar::{self, SECONDS_PER_DAY},
};

/// A civil datetime broken into its components, at second resolution.
///
/// This is the currency of the [`TimeOracle`] trait: what a host
/// exchanges with the calendar core when interpreting local time. The
/// `weekday` and `day_of_year` fields are derived values filled in by
/// whoever produces the `BrokenDown`; consumers interpreting it as an
/// input, like [`TimeOracle::epoch_from_local`], ignore them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BrokenDown {
    /// The year, in `-9999..=9999`.
    pub year: i16,
    /// The month, in `1..=12`.
    pub month: i8,
    /// The day of the month, in `1..=31`.
    pub day: i8,
    /// The hour, in `0..=23`.
    pub hour: i8,
    /// The minute, in `0..=59`.
    pub minute: i8,
    /// The second, in `0..=59`.
    pub second: i8,
    /// The weekday of `year-month-day`.
    pub weekday: Weekday,
    /// The ordinal day of the year, in `1..=365/366`.
    pub day_of_year: i16,
}

impl BrokenDown {
    /// Breaks a civil date and time into components, discarding the
    /// time's fractional second.
    pub fn from_civil(date: Date, time: Time) -> BrokenDown {
        BrokenDown {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
            weekday: date.weekday(),
            day_of_year: date.day_of_year(),
        }
    }

    /// Returns the date components as a [`Date`].
    ///
    /// # Errors
    ///
    /// When the components do not form a valid in-range date. A
    /// malformed value can only come from a hand-built `BrokenDown` or
    /// a host reply outside this crate's supported years.
    pub fn to_date(&self) -> Result<Date, Error> {
        Date::new(self.year, self.month, self.day)
    }

    /// Returns the time components as a [`Time`], with a zero
    /// fractional second.
    ///
    /// # Errors
    ///
    /// When the components do not form a valid clock time.
    pub fn to_time(&self) -> Result<Time, Error> {
        Time::new(self.hour, self.minute, self.second, 0)
    }
}

/// A source of host time: the current clock and the local time zone.
///
/// Implement this to make time hermetic in tests, or to interpret
/// "local" against something other than the process environment. The
/// implementation must be consistent with itself:
/// [`TimeOracle::epoch_from_local`] must invert
/// [`TimeOracle::broken_down_local`] wherever the local calendar is
/// unambiguous.
pub trait TimeOracle: Send + Sync {
    /// Returns the UTC civil reading of the given second since the
    /// Unix epoch.
    fn broken_down_utc(&self, second: i64) -> Result<BrokenDown, Error>;

    /// Returns the local civil reading of the given second since the
    /// Unix epoch.
    fn broken_down_local(&self, second: i64) -> Result<BrokenDown, Error>;

    /// Interprets a local civil datetime and returns the second since
    /// the Unix epoch it names.
    ///
    /// When a daylight saving transition makes the input skipped or
    /// repeated, the oracle chooses; this crate does not constrain the
    /// disambiguation.
    fn epoch_from_local(&self, bd: &BrokenDown) -> Result<i64, Error>;

    /// Returns the current time as seconds and nanoseconds since the
    /// Unix epoch, with the nanosecond part in `0..1_000_000_000`.
    fn current_time(&self) -> Result<(i64, i32), Error>;
}

/// The default [`TimeOracle`]: the platform clock and the platform's
/// local time zone.
///
/// On Unix, local time conversions go through `localtime_r` and
/// `mktime`. Those libc routines consult process-global timezone
/// state, so all calls are serialized behind one lock.
///
/// On other platforms, local time falls back to UTC.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemOracle;

impl TimeOracle for SystemOracle {
    fn broken_down_utc(&self, second: i64) -> Result<BrokenDown, Error> {
        let epoch_day = second.div_euclid(SECONDS_PER_DAY);
        let second_of_day = second.rem_euclid(SECONDS_PER_DAY) as i32;
        if !(i64::from(calendar::MIN_EPOCH_DAY)
            ..=i64::from(calendar::MAX_EPOCH_DAY))
            .contains(&epoch_day)
        {
            return Err(Error::range(
                "day",
                epoch_day,
                calendar::MIN_EPOCH_DAY,
                calendar::MAX_EPOCH_DAY,
            ));
        }
        let epoch_day = epoch_day as i32;
        let (year, month, day) = calendar::from_epoch_day(epoch_day);
        Ok(BrokenDown {
            year,
            month,
            day,
            hour: (second_of_day / 3_600) as i8,
            minute: (second_of_day / 60 % 60) as i8,
            second: (second_of_day % 60) as i8,
            weekday: Weekday::from_iso_unchecked(
                calendar::weekday_from_epoch_day(epoch_day),
            ),
            day_of_year: calendar::day_of_year(year, month, day),
        })
    }

    #[cfg(unix)]
    fn broken_down_local(&self, second: i64) -> Result<BrokenDown, Error> {
        use crate::error::{err, ErrorContext};

        let t = libc::time_t::try_from(second).map_err(|_| {
            err!("second {second} does not fit the host time_t")
        })?;
        let mut tm: libc::tm = unsafe { core::mem::zeroed() };
        {
            let _guard = host_lock();
            let ret = unsafe { libc::localtime_r(&t, &mut tm) };
            if ret.is_null() {
                return Err(Error::oracle("localtime_r"));
            }
        }
        trace!(
            "localtime_r({second}) -> {}-{}-{} {}:{}:{}",
            tm.tm_year + 1900,
            tm.tm_mon + 1,
            tm.tm_mday,
            tm.tm_hour,
            tm.tm_min,
            tm.tm_sec,
        );
        let year = i16::try_from(tm.tm_year + 1900)
            .map_err(|_| Error::oracle("localtime_r"))
            .with_context(|| {
                err!("local reading of second {second} has an unusable year")
            })?;
        Ok(BrokenDown {
            year,
            month: (tm.tm_mon + 1) as i8,
            day: tm.tm_mday as i8,
            hour: tm.tm_hour as i8,
            minute: tm.tm_min as i8,
            second: tm.tm_sec as i8,
            // tm_wday counts from Sunday as 0, which from_iso accepts
            // as an alias.
            weekday: Weekday::from_iso(tm.tm_wday as i8)?,
            day_of_year: (tm.tm_yday + 1) as i16,
        })
    }

    #[cfg(not(unix))]
    fn broken_down_local(&self, second: i64) -> Result<BrokenDown, Error> {
        warn!("no local-time oracle on this platform, reading UTC instead");
        self.broken_down_utc(second)
    }

    #[cfg(unix)]
    fn epoch_from_local(&self, bd: &BrokenDown) -> Result<i64, Error> {
        let mut tm: libc::tm = unsafe { core::mem::zeroed() };
        tm.tm_year = libc::c_int::from(bd.year) - 1900;
        tm.tm_mon = libc::c_int::from(bd.month) - 1;
        tm.tm_mday = libc::c_int::from(bd.day);
        tm.tm_hour = libc::c_int::from(bd.hour);
        tm.tm_min = libc::c_int::from(bd.minute);
        tm.tm_sec = libc::c_int::from(bd.second);
        // Let the host decide whether daylight saving is in effect.
        tm.tm_isdst = -1;
        let t = {
            let _guard = host_lock();
            // POSIX mktime behaves as if tzset had run, so a changed
            // TZ environment is picked up here.
            unsafe { libc::mktime(&mut tm) }
        };
        // -1 is also the legitimate encoding of one second before the
        // epoch, but mktime gives us no way to tell the two apart.
        if t == -1 {
            return Err(Error::oracle("mktime"));
        }
        Ok(i64::from(t))
    }

    #[cfg(not(unix))]
    fn epoch_from_local(&self, bd: &BrokenDown) -> Result<i64, Error> {
        warn!("no local-time oracle on this platform, interpreting as UTC");
        let date = bd.to_date()?;
        let time = bd.to_time()?;
        Ok(i64::from(date.to_epoch_day()) * SECONDS_PER_DAY
            + i64::from(time.second_of_day()))
    }

    fn current_time(&self) -> Result<(i64, i32), Error> {
        use std::time::{SystemTime, UNIX_EPOCH};

        if let Some((second, nanosecond)) =
            *lock_ignore_poison(&NOW_OVERRIDE)
        {
            trace!("read fixed clock: {second}.{nanosecond:09}");
            return Ok((second, nanosecond));
        }
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => {
                let second =
                    i64::try_from(elapsed.as_secs()).map_err(|_| {
                        Error::oracle("SystemTime::now")
                    })?;
                Ok((second, elapsed.subsec_nanos() as i32))
            }
            // A clock before the epoch reads as a negative second with
            // a non-negative fraction.
            Err(before) => {
                let elapsed = before.duration();
                let mut second = -i64::try_from(elapsed.as_secs())
                    .map_err(|_| Error::oracle("SystemTime::now"))?;
                let mut nanosecond = elapsed.subsec_nanos() as i32;
                if nanosecond > 0 {
                    second -= 1;
                    nanosecond = 1_000_000_000 - nanosecond;
                }
                Ok((second, nanosecond))
            }
        }
    }
}

/// Pins [`SystemOracle`]'s clock to a fixed instant, for tests of code
/// that reads "now".
///
/// The pin is process-wide and stays until [`clear_fixed_now`]. It only
/// affects the clock; local time conversions still ask the host.
pub fn install_fixed_now(second: i64, nanosecond: i32) {
    *lock_ignore_poison(&NOW_OVERRIDE) = Some((second, nanosecond));
}

/// Removes the pin installed by [`install_fixed_now`], returning
/// [`SystemOracle`]'s clock to the real one.
pub fn clear_fixed_now() {
    *lock_ignore_poison(&NOW_OVERRIDE) = None;
}

static NOW_OVERRIDE: Mutex<Option<(i64, i32)>> = Mutex::new(None);

/// Serializes access to libc's process-global timezone state, which
/// `localtime_r` and `mktime` both consult and may reload.
#[cfg(unix)]
static HOST_LOCK: Mutex<()> = Mutex::new(());

#[cfg(unix)]
fn host_lock() -> std::sync::MutexGuard<'static, ()> {
    lock_ignore_poison(&HOST_LOCK)
}

/// These locks guard no data invariants of our own, so a panic while
/// holding one leaves nothing to recover.
fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_breakdown() {
        let bd = SystemOracle.broken_down_utc(0).unwrap();
        assert_eq!(bd.to_date().unwrap(), Date::constant(1970, 1, 1));
        assert_eq!(bd.to_time().unwrap(), Time::midnight());
        assert_eq!(bd.weekday, Weekday::Thursday);
        assert_eq!(bd.day_of_year, 1);

        let bd = SystemOracle.broken_down_utc(-1).unwrap();
        assert_eq!(bd.to_date().unwrap(), Date::constant(1969, 12, 31));
        assert_eq!(bd.to_time().unwrap(), Time::constant(23, 59, 59, 0));

        let out = (calendar::MAX_EPOCH_DAY as i64 + 1) * SECONDS_PER_DAY;
        assert!(SystemOracle.broken_down_utc(out).is_err());
    }

    #[test]
    fn broken_down_civil_roundtrip() {
        let date = Date::constant(2024, 2, 29);
        let time = Time::constant(12, 34, 56, 789_000_000);
        let bd = BrokenDown::from_civil(date, time);
        assert_eq!(bd.to_date().unwrap(), date);
        // The fractional second does not survive the breakdown.
        assert_eq!(bd.to_time().unwrap(), Time::constant(12, 34, 56, 0));
        assert_eq!(bd.weekday, Weekday::Thursday);
        assert_eq!(bd.day_of_year, 60);
    }

    #[test]
    fn malformed_broken_down_is_rejected() {
        let mut bd = BrokenDown::from_civil(
            Date::constant(2023, 2, 28),
            Time::midnight(),
        );
        bd.day = 29;
        assert!(bd.to_date().is_err());
        bd.day = 28;
        bd.minute = 61;
        assert!(bd.to_time().is_err());
    }

    #[test]
    fn fixed_clock() {
        install_fixed_now(946_684_800, 123);
        let now = SystemOracle.current_time().unwrap();
        assert_eq!(now, (946_684_800, 123));
        clear_fixed_now();
        // Not asserting on the real clock beyond its invariant.
        let (_, nanosecond) = SystemOracle.current_time().unwrap();
        assert!((0..1_000_000_000).contains(&nanosecond));
    }

    #[cfg(unix)]
    #[test]
    fn host_local_roundtrip() {
        // Whatever the host's zone, interpreting its own reading of an
        // unambiguous instant must give that instant back. The sample
        // covers both halves of the year, so at least one point lands
        // outside any DST window.
        for second in [0, 946_684_800, 1_700_000_000, 1_718_000_000] {
            let bd = SystemOracle.broken_down_local(second).unwrap();
            assert_eq!(
                SystemOracle.epoch_from_local(&bd).unwrap(),
                second,
                "local roundtrip of epoch second {second}",
            );
        }
    }
}
