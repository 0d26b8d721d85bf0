use crate::models::LineupItem;
use crate::models::Program;
use crate::schedule::FlexPreference;

/// Tolerance absorbing rounding noise in lateness and padding comparisons.
pub const SLACK: i64 = 9_999;

/// Returns the flex needed to move `time` to the next multiple of `pad`.
///
/// Zero is returned when `time` is already aligned within `SLACK`.
pub fn padding_for(time: i64, pad: i64) -> i64 {
    let m = time.rem_euclid(pad);
    if m > SLACK && pad - m > SLACK {
        pad - m
    } else {
        0
    }
}

/// A program followed by flex.
#[derive(Clone, Debug, PartialEq)]
pub struct PaddedProgram {
    pub program: Program,
    pub pad: i64,
}

impl PaddedProgram {
    pub fn total_duration(&self) -> i64 {
        self.program.duration + self.pad
    }
}

pub fn make_padded(program: Program, pad: i64) -> PaddedProgram {
    let pad = padding_for(program.duration, pad);
    PaddedProgram { program, pad }
}

/// Distributes time left in a slot over packed programs.
///
/// With `FlexPreference::Distribute`, whole `pad` units are spread so that
/// programs having less flex get more, and the remainder goes to the last
/// program.  With `FlexPreference::End`, the last program gets everything.
pub fn distribute_flex(
    padded: &mut [PaddedProgram],
    remaining: i64,
    pad: i64,
    preference: FlexPreference,
) {
    let n = padded.len();
    if n == 0 {
        return;
    }

    let used: i64 = padded.iter().map(PaddedProgram::total_duration).sum();
    let rem = (remaining - used).max(0);

    match preference {
        FlexPreference::End => {
            padded[n - 1].pad += rem;
        }
        FlexPreference::Distribute => {
            let div = rem / pad;
            padded[n - 1].pad += rem % pad;

            // A stable sort keeps the packing order for ties.
            let mut ranks: Vec<usize> = (0..n).collect();
            ranks.sort_by_key(|&i| padded[i].pad);

            let count = n as i64;
            for (rank, &i) in ranks.iter().enumerate() {
                let mut units = div / count;
                if (rank as i64) < div % count {
                    units += 1;
                }
                padded[i].pad += units * pad;
            }
        }
    }
}

/// The lineup under construction together with its virtual clock.
#[derive(Debug)]
pub struct Timeline {
    items: Vec<LineupItem>,
    time: i64,
}

impl Timeline {
    pub fn new(time: i64) -> Self {
        Timeline {
            items: Vec::new(),
            time,
        }
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[LineupItem] {
        &self.items
    }

    /// Appends flex, merging it into the last item if that is flex too.
    pub fn push_flex(&mut self, duration: i64) {
        if duration <= 0 {
            return;
        }
        self.time += duration;
        match self.items.last_mut() {
            Some(LineupItem::Flex { duration: last }) => *last += duration,
            _ => self.items.push(LineupItem::Flex { duration }),
        }
    }

    pub fn push_redirect(&mut self, channel: u32, duration: i64) {
        self.time += duration;
        self.items.push(LineupItem::Redirect { channel, duration });
    }

    /// Appends a program as is.
    ///
    /// Offline programs are converted into flex or redirect placeholders.
    pub fn push_program(&mut self, program: Program) {
        if program.is_offline {
            match (program.is_redirect(), program.channel) {
                (true, Some(channel)) => self.push_redirect(channel, program.duration),
                _ => self.push_flex(program.duration),
            }
        } else {
            self.time += program.duration;
            self.items.push(LineupItem::Program(program));
        }
    }

    pub fn push_padded(&mut self, padded: Vec<PaddedProgram>) {
        for PaddedProgram { program, pad } in padded.into_iter() {
            self.push_program(program);
            self.push_flex(pad);
        }
    }

    /// Removes the last item and rewinds the clock by its duration.
    pub fn pop(&mut self) -> Option<LineupItem> {
        let item = self.items.pop()?;
        self.time -= item.duration();
        Some(item)
    }

    pub fn into_items(self) -> Vec<LineupItem> {
        self.items
    }
}
