use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde::ser::SerializeMap;

use crate::datetime_ext::serde_iso8601;
use crate::error::Error;

const UNKNOWN: &str = "unknown";

#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramType {
    Movie,
    Episode,
    Track,
    Redirect,
    Custom,
    Flex,
    /// Any other value, kept verbatim.  Empty when `type` is absent.
    #[serde(untagged)]
    Other(String),
}

impl ProgramType {
    fn is_absent(&self) -> bool {
        matches!(self, Self::Other(s) if s.is_empty())
    }
}

impl Default for ProgramType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

/// A media item supplied by the media catalog.
///
/// Fields which the lineup generator doesn't look at are kept in `extra` so
/// that the item reaches downstream consumers unchanged.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "ProgramType::is_absent")]
    pub program_type: ProgramType,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_offline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_show_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_show_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_order: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Program {
    /// Composite identity used for deduplicating show members.
    pub fn program_id(&self) -> ProgramId {
        ProgramId(format!(
            "{}|{}",
            self.server_key.as_deref().unwrap_or(UNKNOWN),
            self.key.as_deref().unwrap_or(UNKNOWN)
        ))
    }

    pub fn is_redirect(&self) -> bool {
        self.program_type == ProgramType::Redirect
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProgramId(String);

impl ProgramId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry of a generated lineup.
#[derive(Clone, Debug, PartialEq)]
pub enum LineupItem {
    Program(Program),
    Flex { duration: i64 },
    Redirect { channel: u32, duration: i64 },
}

impl LineupItem {
    pub fn duration(&self) -> i64 {
        match self {
            Self::Program(program) => program.duration,
            Self::Flex { duration } => *duration,
            Self::Redirect { duration, .. } => *duration,
        }
    }

    pub fn is_offline(&self) -> bool {
        !matches!(self, Self::Program(_))
    }

    pub fn is_flex(&self) -> bool {
        matches!(self, Self::Flex { .. })
    }
}

impl Serialize for LineupItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Program(program) => program.serialize(serializer),
            Self::Flex { duration } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("duration", duration)?;
                map.serialize_entry("isOffline", &true)?;
                map.end()
            }
            Self::Redirect { channel, duration } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("duration", duration)?;
                map.serialize_entry("isOffline", &true)?;
                map.serialize_entry("type", &ProgramType::Redirect)?;
                map.serialize_entry("channel", channel)?;
                map.end()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lineup {
    pub programs: Vec<LineupItem>,
    #[serde(with = "serde_iso8601")]
    pub start_time: DateTime<Utc>,
}

impl Lineup {
    pub fn total_duration(&self) -> i64 {
        self.programs.iter().map(LineupItem::duration).sum()
    }
}

/// The JSON shape returned to the channel programming API.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Lineup(Lineup),
    #[serde(rename_all = "camelCase")]
    UserError {
        user_error: String,
    },
}

impl GenerateResponse {
    /// Folds a schedule validation failure into the response.
    ///
    /// Any other error is returned as is.
    pub fn from_result(result: Result<Lineup, Error>) -> Result<Self, Error> {
        match result {
            Ok(lineup) => Ok(Self::Lineup(lineup)),
            Err(Error::UserError(user_error)) => Ok(Self::UserError { user_error }),
            Err(err) => Err(err),
        }
    }

    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::UserError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_program_id() {
        let mut program = Program::default();
        assert_eq!(program.program_id().as_str(), "unknown|unknown");

        program.server_key = Some("plex".to_string());
        assert_eq!(program.program_id().as_str(), "plex|unknown");

        program.key = Some("/library/metadata/1".to_string());
        assert_eq!(program.program_id().as_str(), "plex|/library/metadata/1");
    }

    #[test]
    fn test_program_deserialize() {
        let program: Program = serde_json::from_value(json!({
            "serverKey": "plex",
            "key": "/library/metadata/1",
            "title": "Pilot",
            "type": "episode",
            "duration": 1_320_000,
            "showTitle": "Show",
            "season": 1,
            "episode": 1,
            "icon": "http://localhost/icon.png",
        }))
        .unwrap();
        assert_eq!(program.program_type, ProgramType::Episode);
        assert_eq!(program.duration, 1_320_000);
        assert_eq!(program.show_title.as_deref(), Some("Show"));
        assert!(!program.is_offline);
        assert_eq!(program.extra["icon"], json!("http://localhost/icon.png"));

        let program: Program = serde_json::from_value(json!({
            "type": "podcast",
            "duration": 1,
        }))
        .unwrap();
        assert_eq!(program.program_type, ProgramType::Other("podcast".to_string()));
    }

    #[test]
    fn test_program_passes_through_unknown_fields() {
        let value = json!({
            "key": "k",
            "type": "movie",
            "duration": 10,
            "rating": "PG",
        });
        let program: Program = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&program).unwrap(), value);

        let value = json!({
            "key": "k",
            "type": "podcast",
            "duration": 10,
        });
        let program: Program = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&program).unwrap(), value);

        let value = json!({
            "duration": 10,
            "isOffline": true,
        });
        let program: Program = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(program.program_type, ProgramType::default());
        assert_eq!(serde_json::to_value(&program).unwrap(), value);
    }

    #[test]
    fn test_lineup_item_serialize() {
        assert_eq!(
            serde_json::to_value(LineupItem::Flex { duration: 100 }).unwrap(),
            json!({"duration": 100, "isOffline": true})
        );
        assert_eq!(
            serde_json::to_value(LineupItem::Redirect {
                channel: 2,
                duration: 100
            })
            .unwrap(),
            json!({"duration": 100, "isOffline": true, "type": "redirect", "channel": 2})
        );
    }

    #[test]
    fn test_generate_response() {
        let result = GenerateResponse::from_result(Err(Error::user("oops")));
        assert_matches!(result, Ok(response) => {
            assert!(response.is_user_error());
            assert_eq!(
                serde_json::to_value(&response).unwrap(),
                json!({"userError": "oops"})
            );
        });

        let result = GenerateResponse::from_result(Err(Error::Cancelled));
        assert_matches!(result, Err(Error::Cancelled));

        let lineup = Lineup {
            programs: vec![LineupItem::Flex { duration: 1 }],
            start_time: crate::datetime_ext::datetime_from_millis(0),
        };
        assert_eq!(lineup.total_duration(), 1);
        let result = GenerateResponse::from_result(Ok(lineup));
        assert_matches!(result, Ok(response) => {
            assert_eq!(
                serde_json::to_value(&response).unwrap(),
                json!({
                    "programs": [{"duration": 1, "isOffline": true}],
                    "startTime": "1970-01-01T00:00:00.000Z",
                })
            );
        });
    }
}
