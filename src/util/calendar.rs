/*!
The pure integer core of the civil calendar converter.

Everything here is a `const` function over primitive integers: the
proleptic Gregorian leap-year and month-length rules, the bidirectional
mapping between `(year, month, day)` and a linear epoch day count, the
day-of-week and day-of-year derivations, and the ISO 8601 week-date
mapping. The public types in `civil` are validated wrappers around these
routines, so the functions here assume their inputs are in range
unless a doc comment says otherwise.

The epoch day count is days since the Unix epoch: day `0` is
`1970-01-01`. The forward direction accumulates start-of-month offsets
and leap corrections against base year `0`, which is divisible by `400`
so that the century and quadricentennial corrections are exact integer
divisions over the whole supported range, negative years included. The
inverse walks the standard 400-year cycle decomposition.
*/

/// The minimum supported civil year.
pub(crate) const MIN_YEAR: i16 = -9999;
/// The maximum supported civil year.
pub(crate) const MAX_YEAR: i16 = 9999;

/// The epoch day of `-9999-01-01`, the smallest representable date.
pub(crate) const MIN_EPOCH_DAY: i32 = to_epoch_day(MIN_YEAR, 1, 1);
/// The epoch day of `9999-12-31`, the largest representable date.
pub(crate) const MAX_EPOCH_DAY: i32 = to_epoch_day(MAX_YEAR, 12, 31);

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;
pub(crate) const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// Cumulative day counts at the start of each month in a common year,
/// indexed by month number (index 0 is unused).
const DAYS_BEFORE_MONTH: [i16; 13] =
    [0, 0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// The raw day count of `1970-01-01` against base year `0`.
const EPOCH_DAY_COUNT: i32 = day_count_from_base(1970, 1, 1);

/// Returns true if and only if the given year is a leap year.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
#[inline]
pub(crate) const fn is_leap_year(year: i16) -> bool {
    let d = if year % 25 != 0 { 4 } else { 16 };
    (year % d) == 0
}

/// Return the number of days in the given month.
///
/// The given month must be in `1..=12`.
#[inline]
pub(crate) const fn days_in_month(year: i16, month: i8) -> i8 {
    if month == 2 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else {
        30 | (month ^ month >> 3)
    }
}

/// Return the number of days in the given year.
#[inline]
pub(crate) const fn days_in_year(year: i16) -> i16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Clamps the given day to the number of days in the given month.
#[inline]
pub(crate) const fn saturate_day_in_month(
    year: i16,
    month: i8,
    day: i8,
) -> i8 {
    let max = days_in_month(year, month);
    if day > max {
        max
    } else {
        day
    }
}

/// Carries whole years out of a possibly overflowed month number.
///
/// The month may be any integer; the returned month is always in
/// `1..=12`, with the year adjusted accordingly. The returned year is
/// *not* constrained to the supported range, since this runs before
/// validation. (Month-delta application feeds raw sums through here.)
#[inline]
pub(crate) const fn normalize_month_overflow(
    year: i64,
    month: i64,
) -> (i64, i64) {
    let month0 = month - 1;
    (year + month0.div_euclid(12), month0.rem_euclid(12) + 1)
}

/// The day count of the given date against base year `0`.
///
/// Only differences of this count are meaningful; `to_epoch_day`
/// re-bases it so that day `0` is the Unix epoch.
#[inline]
const fn day_count_from_base(year: i32, month: i8, day: i8) -> i32 {
    let mut days = 365 * year + year.div_euclid(4) - year.div_euclid(100)
        + year.div_euclid(400);
    days += DAYS_BEFORE_MONTH[month as usize] as i32 + (day as i32 - 1);
    // The quadrennial term above counts this year's own leap day, which
    // hasn't happened yet in January or February.
    if month <= 2 && is_leap_year(year as i16) {
        days -= 1;
    }
    days
}

/// Converts a Gregorian date to days since the Unix epoch.
///
/// The given date must be valid, but may be anywhere in the supported
/// year range, negative years included.
#[inline]
pub(crate) const fn to_epoch_day(year: i16, month: i8, day: i8) -> i32 {
    day_count_from_base(year as i32, month, day) - EPOCH_DAY_COUNT
}

/// Converts days since the Unix epoch to a Gregorian date.
///
/// This is the 400-year cycle decomposition, shifted to a March-first
/// era so that the leap day lands at the end of a cycle.
#[inline]
pub(crate) const fn from_epoch_day(epoch_day: i32) -> (i16, i8, i8) {
    // Days since 0000-03-01.
    let days = epoch_day + 719_468;
    let era = days.div_euclid(146_097);
    let day_of_era = days.rem_euclid(146_097);
    let year_of_era = (day_of_era - day_of_era / 1_460 + day_of_era / 36_524
        - day_of_era / 146_096)
        / 365;
    let day_of_year =
        day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * mp + 2) / 5 + 1) as i8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as i8;
    let mut year = year_of_era + era * 400;
    if month <= 2 {
        year += 1;
    }
    (year as i16, month, day)
}

/// Returns the ISO weekday number of the given epoch day.
///
/// The result is in `1..=7` with Monday as `1`. The fixed point is that
/// epoch day `0`, `1970-01-01`, is a Thursday.
#[inline]
pub(crate) const fn weekday_from_epoch_day(epoch_day: i32) -> i8 {
    ((epoch_day + 3).rem_euclid(7) + 1) as i8
}

/// Returns the ordinal day of the year, in `1..=365/366`.
#[inline]
pub(crate) const fn day_of_year(year: i16, month: i8, day: i8) -> i16 {
    let mut doy = DAYS_BEFORE_MONTH[month as usize] + day as i16;
    if month > 2 && is_leap_year(year) {
        doy += 1;
    }
    doy
}

/// Converts an ordinal day of the year back to a month and day.
///
/// Returns `None` when the ordinal is out of range for the given year.
#[inline]
pub(crate) const fn from_day_of_year(
    year: i16,
    day_of_year: i16,
) -> Option<(i8, i8)> {
    if day_of_year < 1 || day_of_year > days_in_year(year) {
        return None;
    }
    let mut month: i8 = 1;
    let mut remaining = day_of_year;
    while remaining > days_in_month(year, month) as i16 {
        remaining -= days_in_month(year, month) as i16;
        month += 1;
    }
    Some((month, remaining as i8))
}

/// Returns the number of ISO weeks in the given year: either 52 or 53.
///
/// A year has 53 weeks when January 1 falls on a Thursday, or when the
/// year is a leap year and January 1 falls on a Wednesday.
#[inline]
pub(crate) const fn last_iso_week_of_year(year: i16) -> i8 {
    let jan1 = weekday_from_epoch_day(to_epoch_day(year, 1, 1));
    if jan1 == 4 || (is_leap_year(year) && jan1 == 3) {
        53
    } else {
        52
    }
}

/// Computes the ISO week number and week-based year for a date.
///
/// Takes the date's calendar year, its ordinal day and its ISO weekday.
/// The returned year is one less or one more than the calendar year when
/// the date falls in the last week of the previous ISO year or the first
/// week of the next one.
#[inline]
pub(crate) const fn iso_week_of_year(
    year: i16,
    day_of_year: i16,
    weekday: i8,
) -> (i8, i16) {
    let week = (day_of_year as i32 - weekday as i32 + 10) / 7;
    if week == 0 {
        (last_iso_week_of_year(year - 1), year - 1)
    } else if week > last_iso_week_of_year(year) as i32 {
        (1, year + 1)
    } else {
        (week as i8, year)
    }
}

/// Converts an ISO week date to a calendar date.
///
/// The week must be valid for the given ISO year and the weekday must
/// be in `1..=7`. The returned calendar year may sit one outside the
/// supported range at the extremes, so callers must re-validate it.
#[inline]
pub(crate) const fn from_iso_week_date(
    year: i16,
    week: i8,
    weekday: i8,
) -> (i32, i8, i8) {
    let jan4 = weekday_from_epoch_day(to_epoch_day(year, 1, 4));
    let mut ordinal =
        week as i32 * 7 + weekday as i32 - (jan4 as i32 + 3);
    let mut year = year as i32;
    if ordinal < 1 {
        year -= 1;
        ordinal += days_in_year(year as i16) as i32;
    } else if ordinal > days_in_year(year as i16) as i32 {
        ordinal -= days_in_year(year as i16) as i32;
        year += 1;
    }
    // `ordinal` is now in range for `year` by construction.
    match from_day_of_year(year as i16, ordinal as i16) {
        Some((month, day)) => (year, month, day),
        // Unreachable after the rollover above, but `const fn` forbids
        // unwrap. January 1 is a harmless fixed point.
        None => (year, 1, 1),
    }
}
