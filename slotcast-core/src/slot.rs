use crate::error::Error;
use crate::schedule::Schedule;
use crate::schedule::Slot;

/// The slot which is active at a particular time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedSlot<'a> {
    pub slot: &'a Slot,
    /// Time until the next slot starts.
    pub remaining: i64,
    /// Time elapsed since the slot started.
    pub late: i64,
}

pub fn resolve_slot(schedule: &Schedule, time: i64) -> Result<ResolvedSlot<'_>, Error> {
    let period = schedule.period;
    let slots = &schedule.slots;
    let day_time = time.rem_euclid(period);

    for (i, slot) in slots.iter().enumerate() {
        let end_time = match slots.get(i + 1) {
            Some(next) => next.time,
            None => slots[0].time + period,
        };

        if slot.time <= day_time && day_time < end_time {
            return Ok(ResolvedSlot {
                slot,
                remaining: end_time - day_time,
                late: day_time - slot.time,
            });
        }

        // The last slot spans the beginning of the next period.
        let wrapped = day_time + period;
        if slot.time <= wrapped && wrapped < end_time {
            return Ok(ResolvedSlot {
                slot,
                remaining: end_time - wrapped,
                late: wrapped - slot.time,
            });
        }
    }

    Err(Error::SlotNotFound { time, day_time })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::SlotOrder;
    use crate::schedule::SlotTarget;
    use assert_matches::assert_matches;

    const HOUR: i64 = crate::datetime_ext::HOUR_MS;
    const DAY: i64 = crate::datetime_ext::DAY_MS;

    fn slot(time: i64, show_id: &str) -> Slot {
        Slot {
            time,
            target: SlotTarget::from_show_id(show_id),
            order: SlotOrder::Next,
        }
    }

    fn schedule(slots: Vec<Slot>) -> Schedule {
        Schedule {
            period: DAY,
            slots,
            pad: 1,
            lateness: 0,
            max_days: 1,
            flex_preference: Default::default(),
        }
    }

    #[test]
    fn test_resolve_slot() {
        let schedule = schedule(vec![slot(0, "a"), slot(6 * HOUR, "b"), slot(18 * HOUR, "c")]);
        let base = 100 * DAY;

        assert_matches!(resolve_slot(&schedule, base), Ok(resolved) => {
            assert_eq!(resolved.slot.target.show_id(), "a");
            assert_eq!(resolved.remaining, 6 * HOUR);
            assert_eq!(resolved.late, 0);
        });

        assert_matches!(resolve_slot(&schedule, base + 7 * HOUR), Ok(resolved) => {
            assert_eq!(resolved.slot.target.show_id(), "b");
            assert_eq!(resolved.remaining, 11 * HOUR);
            assert_eq!(resolved.late, HOUR);
        });

        assert_matches!(resolve_slot(&schedule, base + DAY - 1), Ok(resolved) => {
            assert_eq!(resolved.slot.target.show_id(), "c");
            assert_eq!(resolved.remaining, 1);
            assert_eq!(resolved.late, 6 * HOUR - 1);
        });
    }

    #[test]
    fn test_resolve_slot_wrapped() {
        // The last slot covers [20:00, 02:00) of the next day.
        let schedule = schedule(vec![slot(2 * HOUR, "a"), slot(20 * HOUR, "b")]);
        let base = 100 * DAY;

        assert_matches!(resolve_slot(&schedule, base + HOUR), Ok(resolved) => {
            assert_eq!(resolved.slot.target.show_id(), "b");
            assert_eq!(resolved.remaining, HOUR);
            assert_eq!(resolved.late, 5 * HOUR);
        });

        assert_matches!(resolve_slot(&schedule, base + 21 * HOUR), Ok(resolved) => {
            assert_eq!(resolved.slot.target.show_id(), "b");
            assert_eq!(resolved.remaining, 5 * HOUR);
            assert_eq!(resolved.late, HOUR);
        });

        assert_matches!(resolve_slot(&schedule, base + 2 * HOUR), Ok(resolved) => {
            assert_eq!(resolved.slot.target.show_id(), "a");
            assert_eq!(resolved.late, 0);
        });
    }

    #[test]
    fn test_resolve_slot_negative_time() {
        let schedule = schedule(vec![slot(0, "a"), slot(12 * HOUR, "b")]);
        assert_matches!(resolve_slot(&schedule, -HOUR), Ok(resolved) => {
            assert_eq!(resolved.slot.target.show_id(), "b");
            assert_eq!(resolved.remaining, HOUR);
        });
    }

    #[test]
    fn test_resolve_slot_not_found() {
        let schedule = schedule(vec![]);
        assert_matches!(
            resolve_slot(&schedule, 5),
            Err(Error::SlotNotFound { time: 5, day_time: 5 })
        );
    }
}
