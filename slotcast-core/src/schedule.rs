use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::datetime_ext::DAY_MS;
use crate::datetime_ext::MINUTE_MS;
use crate::error::Error;

pub const FLEX_SHOW_ID: &str = "flex.";
/// Upper bound of `maxDays`, also bounding `period` in days.
pub const MAX_DAYS: i64 = 36_500;
/// Upper bound of the absolute value of `timeZoneOffset`, in minutes.
pub const MAX_TIME_ZONE_OFFSET: i64 = 24 * 60;
pub const REDIRECT_SHOW_ID_PREFIX: &str = "redirect.";

/// Time-slot schedule as sent by the channel programming API.
///
/// Every field is optional here.  Missing or malformed fields are reported by
/// `validate()` as user errors.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchedule {
    #[serde(default)]
    pub period: Option<i64>,
    #[serde(default)]
    pub slots: Option<Vec<RawSlot>>,
    #[serde(default)]
    pub pad: Option<i64>,
    #[serde(default)]
    pub lateness: Option<i64>,
    #[serde(default)]
    pub max_days: Option<i64>,
    #[serde(default)]
    pub flex_preference: Option<String>,
    #[serde(default)]
    pub time_zone_offset: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSlot {
    // Non-integer values are rejected in `validate()`.
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub show_id: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Schedule {
    pub period: i64,
    /// Sorted by `time` in ascending order, never empty.
    pub slots: Vec<Slot>,
    pub pad: i64,
    pub lateness: i64,
    pub max_days: i64,
    pub flex_preference: FlexPreference,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    /// Offset from the beginning of the period, in milliseconds.
    pub time: i64,
    pub target: SlotTarget,
    pub order: SlotOrder,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SlotTarget {
    Flex,
    Redirect(String),
    Show(String),
}

impl SlotTarget {
    pub fn from_show_id(show_id: &str) -> Self {
        if show_id == FLEX_SHOW_ID {
            Self::Flex
        } else if show_id.starts_with(REDIRECT_SHOW_ID_PREFIX) {
            Self::Redirect(show_id.to_string())
        } else {
            Self::Show(show_id.to_string())
        }
    }

    pub fn show_id(&self) -> &str {
        match self {
            Self::Flex => FLEX_SHOW_ID,
            Self::Redirect(id) => id,
            Self::Show(id) => id,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotOrder {
    #[default]
    Next,
    Shuffle,
}

impl fmt::Display for SlotOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SlotOrder::Next => write!(f, "next"),
            SlotOrder::Shuffle => write!(f, "shuffle"),
        }
    }
}

impl std::str::FromStr for SlotOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(SlotOrder::Next),
            "shuffle" => Ok(SlotOrder::Shuffle),
            _ => Err(Error::user(format!("Invalid slot order value: \"{s}\""))),
        }
    }
}

/// Where the time left in a slot goes after packing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FlexPreference {
    #[default]
    Distribute,
    End,
}

impl std::str::FromStr for FlexPreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distribute" => Ok(FlexPreference::Distribute),
            "end" => Ok(FlexPreference::End),
            _ => Err(Error::user(format!(
                "Invalid schedule.flexPreference value: \"{s}\""
            ))),
        }
    }
}

impl RawSchedule {
    /// Validates the schedule and normalizes slot times into the UTC frame.
    ///
    /// No generation may start unless this succeeds.
    pub fn validate(&self) -> Result<Schedule, Error> {
        let time_zone_offset = self
            .time_zone_offset
            .ok_or_else(|| Error::user("Expected a time zone offset"))?;
        if !(-MAX_TIME_ZONE_OFFSET..=MAX_TIME_ZONE_OFFSET).contains(&time_zone_offset) {
            return Err(Error::user(format!(
                "schedule.timeZoneOffset must be between -{MAX_TIME_ZONE_OFFSET} and \
                 {MAX_TIME_ZONE_OFFSET}."
            )));
        }
        let raw_slots = self
            .slots
            .as_ref()
            .ok_or_else(|| Error::user("Expected a \"slots\" array in schedule"))?;
        let period = self.period.unwrap_or(DAY_MS);
        if period <= 0 {
            return Err(Error::user("schedule.period must be a positive integer."));
        }
        if period > MAX_DAYS * DAY_MS {
            return Err(Error::user(format!(
                "schedule.period must not exceed {MAX_DAYS} days."
            )));
        }

        let mut slots = Vec::with_capacity(raw_slots.len());
        for raw in raw_slots.iter() {
            let time = raw
                .time
                .ok_or_else(|| Error::user("Each slot should have a time"))?;
            let show_id = raw
                .show_id
                .as_deref()
                .ok_or_else(|| Error::user("Each slot should have a showId"))?;
            if time < 0.0 || time >= period as f64 || time.fract() != 0.0 {
                return Err(Error::user(
                    "Slot times should be a integer number of milliseconds \
                     between 0 and period-1, inclusive",
                ));
            }
            let order = match raw.order.as_deref() {
                Some(order) => order.parse()?,
                None => SlotOrder::default(),
            };
            let time =
                (time as i64 + 10 * period + time_zone_offset * MINUTE_MS).rem_euclid(period);
            slots.push(Slot {
                time,
                target: SlotTarget::from_show_id(show_id),
                order,
            });
        }
        slots.sort_by_key(|slot| slot.time);
        if slots.windows(2).any(|pair| pair[0].time == pair[1].time) {
            return Err(Error::user("Slot times should be unique."));
        }
        if slots.is_empty() {
            return Err(Error::user("Expected at least one slot"));
        }

        let pad = self.pad.ok_or_else(|| Error::user("Expected schedule.pad"))?;
        if pad <= 0 {
            return Err(Error::user("schedule.pad must be a positive integer."));
        }
        // A slot is never late by a full period.
        let lateness = self
            .lateness
            .ok_or_else(|| Error::user("schedule.lateness must be defined."))?
            .min(period);
        let max_days = self
            .max_days
            .ok_or_else(|| Error::user("schedule.maxDays must be defined."))?;
        if max_days < 0 {
            return Err(Error::user("schedule.maxDays must not be negative."));
        }
        if max_days > MAX_DAYS {
            return Err(Error::user(format!(
                "schedule.maxDays must not exceed {MAX_DAYS}."
            )));
        }
        let flex_preference = match self.flex_preference.as_deref() {
            Some(value) => value.parse()?,
            None => FlexPreference::default(),
        };

        Ok(Schedule {
            period,
            slots,
            pad,
            lateness,
            max_days,
            flex_preference,
        })
    }
}
