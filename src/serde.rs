/*!
Serde integration for the value types, enabled by the `serde` cargo
feature.

Every type serializes as its normalized integer fields: a tuple for the
composite types and a bare integer for the single-field spans. There is
no string format here; wire-text concerns live outside this crate.
Deserialization funnels through the same validating constructors as
ordinary construction, so no malformed value can enter through a
deserializer.
*/

use ::serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    civil::{Date, Time},
    delta::{DayDelta, MonthDelta, TimeDelta},
    timestamp::Timestamp,
};

// (year, month, day)
impl Serialize for Date {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        (self.year(), self.month(), self.day()).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let (year, month, day) = <(i16, i8, i8)>::deserialize(d)?;
        Date::new(year, month, day).map_err(de::Error::custom)
    }
}

// (second of day, nanosecond)
impl Serialize for Time {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        (self.second_of_day(), self.subsec_nanosecond()).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Time, D::Error> {
        let (second_of_day, nanosecond) = <(i32, i32)>::deserialize(d)?;
        Time::from_second_of_day(second_of_day, nanosecond)
            .map_err(de::Error::custom)
    }
}

// (second, nanosecond), the nanosecond non-negative
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        (self.as_second(), self.subsec_nanosecond()).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(
        d: D,
    ) -> Result<Timestamp, D::Error> {
        let (second, nanosecond) = <(i64, i32)>::deserialize(d)?;
        if nanosecond < 0 {
            return Err(de::Error::custom(
                "timestamp nanosecond must be non-negative",
            ));
        }
        Timestamp::new(second, nanosecond).map_err(de::Error::custom)
    }
}

// (seconds, nanoseconds); mixed signs renormalize on the way in
impl Serialize for TimeDelta {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        (self.as_secs(), self.subsec_nanos()).serialize(s)
    }
}

impl<'de> Deserialize<'de> for TimeDelta {
    fn deserialize<D: Deserializer<'de>>(
        d: D,
    ) -> Result<TimeDelta, D::Error> {
        let (secs, nanos) = <(i64, i32)>::deserialize(d)?;
        // `new` panics only when the nanosecond carry overflows the
        // seconds, so reject that sliver of inputs up front.
        let carry = i64::from(nanos / 1_000_000_000);
        if secs.checked_add(carry).is_none() {
            return Err(de::Error::custom(
                "time delta overflows its seconds component",
            ));
        }
        Ok(TimeDelta::new(secs, nanos))
    }
}

impl Serialize for DayDelta {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.days().serialize(s)
    }
}

impl<'de> Deserialize<'de> for DayDelta {
    fn deserialize<D: Deserializer<'de>>(
        d: D,
    ) -> Result<DayDelta, D::Error> {
        Ok(DayDelta::from_days(i64::deserialize(d)?))
    }
}

impl Serialize for MonthDelta {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.months().serialize(s)
    }
}

impl<'de> Deserialize<'de> for MonthDelta {
    fn deserialize<D: Deserializer<'de>>(
        d: D,
    ) -> Result<MonthDelta, D::Error> {
        Ok(MonthDelta::from_months(i64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        civil::{Date, Time},
        delta::{DayDelta, MonthDelta, TimeDelta},
        timestamp::Timestamp,
    };

    fn roundtrip<T>(value: T) -> T
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        serde_json::from_str(&serde_json::to_string(&value).unwrap()).unwrap()
    }

    #[test]
    fn value_roundtrips() {
        let date = Date::constant(2024, 2, 29);
        assert_eq!(roundtrip(date), date);
        let time = Time::constant(23, 59, 59, 999_999_999);
        assert_eq!(roundtrip(time), time);
        let ts = Timestamp::new(-1, 500_000_000).unwrap();
        assert_eq!(roundtrip(ts), ts);
        let delta = TimeDelta::new(-5, -250_000_000);
        assert_eq!(roundtrip(delta), delta);
        assert_eq!(roundtrip(DayDelta::from_days(-40)).days(), -40);
        assert_eq!(roundtrip(MonthDelta::from_months(18)).months(), 18);
    }

    #[test]
    fn wire_shape_is_normalized_fields() {
        let date = Date::constant(1999, 12, 31);
        assert_eq!(serde_json::to_string(&date).unwrap(), "[1999,12,31]");
        let time = Time::constant(1, 2, 3, 0);
        assert_eq!(serde_json::to_string(&time).unwrap(), "[3723,0]");
        let days = DayDelta::from_days(7);
        assert_eq!(serde_json::to_string(&days).unwrap(), "7");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(serde_json::from_str::<Date>("[2023,2,29]").is_err());
        assert!(serde_json::from_str::<Date>("[10000,1,1]").is_err());
        assert!(serde_json::from_str::<Time>("[86400,0]").is_err());
        assert!(
            serde_json::from_str::<Timestamp>("[0,-1]").is_err(),
        );
        assert!(
            serde_json::from_str::<Timestamp>("[999999999999,0]").is_err(),
        );
    }

    #[test]
    fn mixed_sign_delta_normalizes_on_the_way_in() {
        let delta: TimeDelta =
            serde_json::from_str("[1,-400000000]").unwrap();
        assert_eq!(delta, TimeDelta::new(0, 600_000_000));
    }
}
