use std::collections::HashSet;

use indexmap::IndexMap;

use crate::models::Program;
use crate::models::ProgramId;
use crate::models::ProgramType;
use crate::schedule::FLEX_SHOW_ID;
use crate::schedule::REDIRECT_SHOW_ID_PREFIX;

/// Describes the show which a program belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct ShowInfo {
    pub show_id: String,
    pub display_name: String,
    /// Canonical position of the program within its show.
    pub order: i64,
    /// Target channel of a redirect show.
    pub channel: Option<u32>,
}

pub trait ShowIdentity {
    /// Returns `None` if the program doesn't belong to any show.
    fn describe(&self, program: &Program) -> Option<ShowInfo>;
}

impl<F> ShowIdentity for F
where
    F: Fn(&Program) -> Option<ShowInfo>,
{
    fn describe(&self, program: &Program) -> Option<ShowInfo> {
        self(program)
    }
}

/// Groups programs the same way as the media catalog does.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultShowIdentity;

impl ShowIdentity for DefaultShowIdentity {
    fn describe(&self, program: &Program) -> Option<ShowInfo> {
        if let Some(id) = program.custom_show_id.as_ref() {
            return Some(ShowInfo {
                show_id: format!("custom.{id}"),
                display_name: program.custom_show_name.clone().unwrap_or_else(|| id.clone()),
                order: program.custom_order.unwrap_or_default(),
                channel: None,
            });
        }

        if program.is_offline {
            if program.is_redirect() {
                let channel = program.channel?;
                return Some(ShowInfo {
                    show_id: format!("{REDIRECT_SHOW_ID_PREFIX}{channel}"),
                    display_name: format!("Redirect to channel {channel}"),
                    order: program.duration,
                    channel: Some(channel),
                });
            }
            return Some(ShowInfo {
                show_id: FLEX_SHOW_ID.to_string(),
                display_name: "Flex".to_string(),
                order: program.duration,
                channel: None,
            });
        }

        match program.program_type {
            ProgramType::Movie => Some(ShowInfo {
                show_id: "movie.".to_string(),
                display_name: "Movies".to_string(),
                order: program.year.unwrap_or_default(),
                channel: None,
            }),
            ProgramType::Episode => {
                let title = program.show_title.as_ref()?;
                let season = program.season.unwrap_or(1);
                let episode = program.episode.unwrap_or(1);
                Some(ShowInfo {
                    show_id: format!("tv.{title}"),
                    display_name: title.clone(),
                    order: season * 1_000_000 + episode,
                    channel: None,
                })
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ShowMember {
    pub program: Program,
    pub order: i64,
}

/// A group of interchangeable programs, the unit of rotation.
#[derive(Clone, Debug)]
pub struct Show {
    pub id: String,
    pub display_name: String,
    pub founder: ShowMember,
    pub channel: Option<u32>,
    // Keeps the order in which programs were first seen.
    members: Vec<ShowMember>,
    member_ids: HashSet<ProgramId>,
}

impl Show {
    fn new(info: ShowInfo, founder: &Program) -> Self {
        Show {
            id: info.show_id,
            display_name: info.display_name,
            founder: ShowMember {
                program: founder.clone(),
                order: info.order,
            },
            channel: info.channel,
            members: Vec::new(),
            member_ids: HashSet::new(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == FLEX_SHOW_ID || self.id.starts_with(REDIRECT_SHOW_ID_PREFIX)
    }

    pub fn members(&self) -> &[ShowMember] {
        &self.members
    }

    fn add(&mut self, program: &Program, order: i64) {
        if self.is_sentinel() {
            return;
        }
        if self.member_ids.insert(program.program_id()) {
            self.members.push(ShowMember {
                program: program.clone(),
                order,
            });
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShowCatalog {
    shows: IndexMap<String, Show>, // keeps insertion order
}

impl ShowCatalog {
    pub fn group<I>(programs: &[Program], identity: &I) -> Self
    where
        I: ShowIdentity + ?Sized,
    {
        let mut shows: IndexMap<String, Show> = IndexMap::new();
        for program in programs.iter() {
            let info = match identity.describe(program) {
                Some(info) => info,
                None => {
                    tracing::trace!(program.id = %program.program_id(), "No show, ignored");
                    continue;
                }
            };
            let order = info.order;
            shows
                .entry(info.show_id.clone())
                .or_insert_with(|| Show::new(info, program))
                .add(program, order);
        }
        ShowCatalog { shows }
    }

    pub fn get(&self, show_id: &str) -> Option<&Show> {
        self.shows.get(show_id)
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Show> {
        self.shows.values()
    }
}
