use crate::error::Error;

/// A day of the week.
///
/// The week is the ISO 8601 week: it begins on Monday, and the numeric
/// form of a weekday is `1` for Monday through `7` for Sunday. For
/// compatibility with conventions that number Sunday as `0`, the
/// constructor additionally accepts `0` as an alias for Sunday on
/// input. The alias is never produced on output.
///
/// # Example
///
/// ```
/// use calclock::civil::Weekday;
///
/// assert_eq!(Weekday::from_iso(1)?, Weekday::Monday);
/// assert_eq!(Weekday::from_iso(0)?, Weekday::Sunday);
/// assert_eq!(Weekday::Sunday.to_iso(), 7);
/// # Ok::<(), calclock::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(i8)]
pub enum Weekday {
    #[allow(missing_docs)]
    Monday = 1,
    #[allow(missing_docs)]
    Tuesday = 2,
    #[allow(missing_docs)]
    Wednesday = 3,
    #[allow(missing_docs)]
    Thursday = 4,
    #[allow(missing_docs)]
    Friday = 5,
    #[allow(missing_docs)]
    Saturday = 6,
    #[allow(missing_docs)]
    Sunday = 7,
}

impl Weekday {
    /// Creates a weekday from its ISO 8601 number.
    ///
    /// # Errors
    ///
    /// This returns an error unless the number is in `0..=7`, where `0`
    /// is accepted as an alias for Sunday.
    #[inline]
    pub fn from_iso(number: i8) -> Result<Weekday, Error> {
        match number {
            0 | 7 => Ok(Weekday::Sunday),
            1..=6 => Ok(Weekday::from_iso_unchecked(number)),
            _ => Err(Error::range("weekday", number, 0, 7)),
        }
    }

    /// Returns the ISO 8601 number of this weekday, in `1..=7`.
    #[inline]
    pub fn to_iso(self) -> i8 {
        self as i8
    }

    /// Like `from_iso`, but requires `number` to be in `1..=7`.
    #[inline]
    pub(crate) const fn from_iso_unchecked(number: i8) -> Weekday {
        match number {
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            6 => Weekday::Saturday,
            _ => Weekday::Sunday,
        }
    }

    /// Returns the weekday after this one, wrapping from Sunday back to
    /// Monday.
    #[inline]
    pub fn next(self) -> Weekday {
        Weekday::from_iso_unchecked(self.to_iso() % 7 + 1)
    }

    /// Returns the weekday before this one, wrapping from Monday back
    /// to Sunday.
    #[inline]
    pub fn previous(self) -> Weekday {
        Weekday::from_iso_unchecked((self.to_iso() + 5) % 7 + 1)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Weekday {
    fn arbitrary(g: &mut quickcheck::Gen) -> Weekday {
        Weekday::from_iso_unchecked(i8::arbitrary(g).rem_euclid(7) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_numbering() {
        for n in 1..=7 {
            assert_eq!(Weekday::from_iso(n).unwrap().to_iso(), n);
        }
        // The Sunday compatibility alias.
        assert_eq!(Weekday::from_iso(0).unwrap(), Weekday::Sunday);
        assert!(Weekday::from_iso(8).is_err());
        assert!(Weekday::from_iso(-1).is_err());
    }

    #[test]
    fn cycling() {
        assert_eq!(Weekday::Sunday.next(), Weekday::Monday);
        assert_eq!(Weekday::Monday.previous(), Weekday::Sunday);
        assert_eq!(Weekday::Wednesday.next(), Weekday::Thursday);
        let mut day = Weekday::Friday;
        for _ in 0..7 {
            day = day.next();
        }
        assert_eq!(day, Weekday::Friday);
    }
}
