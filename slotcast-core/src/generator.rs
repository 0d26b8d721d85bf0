use chrono::DateTime;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;

use crate::datetime_ext::DAY_MS;
use crate::datetime_ext::datetime_from_millis;
use crate::error::Error;
use crate::models::Lineup;
use crate::models::Program;
use crate::packing::SLACK;
use crate::packing::Timeline;
use crate::packing::distribute_flex;
use crate::packing::make_padded;
use crate::packing::padding_for;
use crate::rotation::Rotation;
use crate::rotation::Rotations;
use crate::schedule::REDIRECT_SHOW_ID_PREFIX;
use crate::schedule::RawSchedule;
use crate::schedule::Schedule;
use crate::schedule::SlotTarget;
use crate::show::DefaultShowIdentity;
use crate::show::ShowCatalog;
use crate::show::ShowIdentity;
use crate::slot::resolve_slot;
use crate::throttle::Throttle;
use crate::throttle::YieldNow;

/// The maximum number of items in a lineup.
pub const LINEUP_LIMIT: usize = 40_000;

/// Generates a lineup starting from the current time.
pub async fn generate_lineup(
    programs: &[Program],
    schedule: &RawSchedule,
) -> Result<Lineup, Error> {
    LineupGenerator::new().generate(programs, schedule).await
}

pub struct LineupGenerator<S = DefaultShowIdentity, T = YieldNow> {
    identity: S,
    throttle: T,
    seed: Option<u64>,
    cancel_token: Option<CancellationToken>,
}

impl LineupGenerator {
    pub fn new() -> Self {
        LineupGenerator {
            identity: DefaultShowIdentity,
            throttle: YieldNow,
            seed: None,
            cancel_token: None,
        }
    }
}

impl Default for LineupGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T> LineupGenerator<S, T>
where
    S: ShowIdentity,
    T: Throttle,
{
    pub fn with_identity<S2: ShowIdentity>(self, identity: S2) -> LineupGenerator<S2, T> {
        LineupGenerator {
            identity,
            throttle: self.throttle,
            seed: self.seed,
            cancel_token: self.cancel_token,
        }
    }

    pub fn with_throttle<T2: Throttle>(self, throttle: T2) -> LineupGenerator<S, T2> {
        LineupGenerator {
            identity: self.identity,
            throttle,
            seed: self.seed,
            cancel_token: self.cancel_token,
        }
    }

    /// Makes shuffles reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The token is checked after every throttle point.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub async fn generate(
        &self,
        programs: &[Program],
        schedule: &RawSchedule,
    ) -> Result<Lineup, Error> {
        self.generate_at(programs, schedule, Utc::now()).await
    }

    pub async fn generate_at(
        &self,
        programs: &[Program],
        schedule: &RawSchedule,
        now: DateTime<Utc>,
    ) -> Result<Lineup, Error> {
        let schedule = schedule.validate()?;
        let catalog = ShowCatalog::group(programs, &self.identity);
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        tracing::info!(
            programs = programs.len(),
            shows = catalog.len(),
            slots = schedule.slots.len(),
            max_days = schedule.max_days,
            "Generating lineup..."
        );

        let mut run = Run {
            schedule: &schedule,
            catalog: &catalog,
            rotations: Rotations::new(rng),
        };

        let period = schedule.period;
        let now = now.timestamp_millis();
        let t0 = now - now.rem_euclid(period) + schedule.slots[0].time;
        let hard_limit = t0 + schedule.max_days * DAY_MS;

        let mut timeline = Timeline::new(t0);
        if now > t0 {
            timeline.push_flex(now - t0);
        }

        while timeline.time() < hard_limit && timeline.len() < LINEUP_LIMIT {
            self.throttle.throttle().await;
            if self
                .cancel_token
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                tracing::warn!(items = timeline.len(), "Cancelled");
                return Err(Error::Cancelled);
            }
            run.step(&mut timeline)?;
        }

        while timeline.time() > hard_limit || timeline.len() >= LINEUP_LIMIT {
            if timeline.pop().is_none() {
                break;
            }
        }

        let m = (timeline.time() - t0).rem_euclid(period);
        if m > 0 {
            timeline.push_flex(period - m);
        }

        let start_time = datetime_from_millis(t0);
        tracing::info!(items = timeline.len(), %start_time, "Generated lineup");

        Ok(Lineup {
            programs: timeline.into_items(),
            start_time,
        })
    }
}

// State of a single generation run.
struct Run<'a> {
    schedule: &'a Schedule,
    catalog: &'a ShowCatalog,
    rotations: Rotations,
}

impl Run<'_> {
    fn step(&mut self, timeline: &mut Timeline) -> Result<(), Error> {
        let schedule = self.schedule;
        let pad = schedule.pad;

        let padding = padding_for(timeline.time(), pad);
        if padding > 0 {
            timeline.push_flex(padding);
            return Ok(());
        }

        let resolved = resolve_slot(schedule, timeline.time())?;
        let slot = resolved.slot;
        let remaining = resolved.remaining;

        if resolved.late >= schedule.lateness + SLACK {
            tracing::debug!(
                time = timeline.time(),
                show.id = slot.target.show_id(),
                late = resolved.late,
                "Too late, fill the slot with flex"
            );
            timeline.push_flex(remaining);
            return Ok(());
        }

        let show_id = match &slot.target {
            SlotTarget::Flex => {
                timeline.push_flex(remaining);
                return Ok(());
            }
            SlotTarget::Redirect(show_id) => {
                let channel = self.redirect_channel(show_id)?;
                timeline.push_redirect(channel, remaining);
                return Ok(());
            }
            SlotTarget::Show(show_id) => show_id,
        };

        let rotation = self.rotations.get_mut(self.catalog, show_id, slot.order)?;
        let program = rotation.current().clone();

        if program.is_offline {
            rotation.advance();
            timeline.push_program(Program {
                duration: remaining,
                ..program
            });
            return Ok(());
        }

        if program.duration > remaining {
            tracing::debug!(
                time = timeline.time(),
                show.id = %show_id,
                program.id = %program.program_id(),
                overrun = program.duration - remaining,
                "Slide"
            );
            rotation.advance();
            timeline.push_program(program);
            return Ok(());
        }

        let first = make_padded(program, pad);
        let mut total = first.total_duration();
        let mut packed = vec![first];
        rotation.advance();
        loop {
            let next = make_padded(rotation.current().clone(), pad);
            let duration = next.total_duration();
            if duration <= 0 || total + duration > remaining {
                break;
            }
            total += duration;
            packed.push(next);
            rotation.advance();
        }

        distribute_flex(&mut packed, remaining, pad, schedule.flex_preference);
        timeline.push_padded(packed);
        Ok(())
    }

    fn redirect_channel(&self, show_id: &str) -> Result<u32, Error> {
        self.catalog
            .get(show_id)
            .and_then(|show| show.channel)
            .or_else(|| show_id.strip_prefix(REDIRECT_SHOW_ID_PREFIX)?.parse().ok())
            .ok_or_else(|| Error::RedirectChannelUnknown(show_id.to_string()))
    }
}
