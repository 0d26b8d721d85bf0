use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::Error;
use crate::models::Program;
use crate::schedule::SlotOrder;
use crate::show::Show;
use crate::show::ShowCatalog;

/// A cursor over the programs of a show.
pub trait Rotation {
    fn current(&self) -> &Program;
    fn advance(&mut self);
}

/// Visits programs in the canonical order of the show, starting from the
/// founder.
#[derive(Clone, Debug)]
pub struct SequentialCursor {
    programs: Vec<Program>,
    position: usize,
}

impl SequentialCursor {
    pub fn new(show: &Show) -> Result<Self, Error> {
        if show.members().is_empty() {
            return Err(Error::ShowHasNoPrograms(show.id.clone()));
        }

        let mut members = show.members().to_vec();
        members.sort_by_key(|member| member.order);

        // Falls back to the last member if no member has the founder's order.
        let mut position = 0;
        while position + 1 < members.len() && members[position].order != show.founder.order {
            position += 1;
        }

        Ok(SequentialCursor {
            programs: members.into_iter().map(|member| member.program).collect(),
            position,
        })
    }
}

impl Rotation for SequentialCursor {
    fn current(&self) -> &Program {
        &self.programs[self.position]
    }

    fn advance(&mut self) {
        self.position = (self.position + 1) % self.programs.len();
    }
}

/// Visits programs in a random order.
///
/// When a cycle completes, the first and the second halves are shuffled
/// independently so that the program played last cannot be played again
/// right away.
#[derive(Clone, Debug)]
pub struct ShuffleCursor {
    programs: Vec<Program>,
    position: usize,
    rng: StdRng,
}

impl ShuffleCursor {
    pub fn new(show: &Show, mut rng: StdRng) -> Result<Self, Error> {
        if show.members().is_empty() {
            return Err(Error::ShowHasNoPrograms(show.id.clone()));
        }

        let mut programs: Vec<Program> = show
            .members()
            .iter()
            .map(|member| member.program.clone())
            .collect();
        programs.shuffle(&mut rng);

        Ok(ShuffleCursor {
            programs,
            position: 0,
            rng,
        })
    }

    fn reshuffle(&mut self) {
        let half = self.programs.len() / 2;
        let (first, second) = self.programs.split_at_mut(half);
        first.shuffle(&mut self.rng);
        second.shuffle(&mut self.rng);
    }
}

impl Rotation for ShuffleCursor {
    fn current(&self) -> &Program {
        &self.programs[self.position]
    }

    fn advance(&mut self) {
        self.position += 1;
        if self.position == self.programs.len() {
            self.reshuffle();
            self.position = 0;
        }
    }
}

#[derive(Clone, Debug)]
pub enum RotationState {
    Sequential(SequentialCursor),
    Shuffle(ShuffleCursor),
}

impl RotationState {
    pub fn new(show: &Show, order: SlotOrder, rng: &mut StdRng) -> Result<Self, Error> {
        match order {
            SlotOrder::Next => Ok(Self::Sequential(SequentialCursor::new(show)?)),
            SlotOrder::Shuffle => Ok(Self::Shuffle(ShuffleCursor::new(
                show,
                StdRng::from_rng(rng),
            )?)),
        }
    }
}

impl Rotation for RotationState {
    fn current(&self) -> &Program {
        match self {
            Self::Sequential(cursor) => cursor.current(),
            Self::Shuffle(cursor) => cursor.current(),
        }
    }

    fn advance(&mut self) {
        match self {
            Self::Sequential(cursor) => cursor.advance(),
            Self::Shuffle(cursor) => cursor.advance(),
        }
    }
}

/// Rotation states of a single generation run.
///
/// A cursor is created when a show is first used with an order and lives until
/// the run ends.
pub struct Rotations {
    states: HashMap<(String, SlotOrder), RotationState>,
    rng: StdRng,
}

impl Rotations {
    pub fn new(rng: StdRng) -> Self {
        Rotations {
            states: HashMap::new(),
            rng,
        }
    }

    pub fn get_mut(
        &mut self,
        catalog: &ShowCatalog,
        show_id: &str,
        order: SlotOrder,
    ) -> Result<&mut RotationState, Error> {
        match self.states.entry((show_id.to_string(), order)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let show = catalog
                    .get(show_id)
                    .ok_or_else(|| Error::ShowHasNoPrograms(show_id.to_string()))?;
                let state = RotationState::new(show, order, &mut self.rng)?;
                tracing::debug!(show.id = show_id, %order, "Created rotation");
                Ok(entry.insert(state))
            }
        }
    }
}
