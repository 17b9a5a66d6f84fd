// src/model.rs
//
// Typed records produced by the extractors and their projection into the
// string rows the record store writes.

use std::fmt;
use std::str::FromStr;

/// The six ranked divisions, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Division {
    Makuuchi,
    Juryo,
    Makushita,
    Sandanme,
    Jonidan,
    Jonokuchi,
}

impl Division {
    pub const ALL: [Division; 6] = [
        Division::Makuuchi,
        Division::Juryo,
        Division::Makushita,
        Division::Sandanme,
        Division::Jonidan,
        Division::Jonokuchi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Division::Makuuchi => "Makuuchi",
            Division::Juryo => "Juryo",
            Division::Makushita => "Makushita",
            Division::Sandanme => "Sandanme",
            Division::Jonidan => "Jonidan",
            Division::Jonokuchi => "Jonokuchi",
        }
    }

    /// First division whose name occurs in `text`.
    pub fn find_in(text: &str) -> Option<Division> {
        Self::ALL.into_iter().find(|d| text.contains(d.as_str()))
    }
}

impl FromStr for Division {
    type Err = String;

    /// Exact name, as written in the tables.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown division {s:?}"))
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    East,
    West,
}

impl Side {
    /// Winner column value.
    pub fn winner_code(self) -> &'static str {
        match self { Side::East => "E", Side::West => "W" }
    }

    /// Inverse of `winner_code`.
    pub fn from_code(code: &str) -> Option<Side> {
        match code { "E" => Some(Side::East), "W" => Some(Side::West), _ => None }
    }

    /// Suffix appended to a banzuke rank.
    pub fn rank_suffix(self) -> &'static str {
        match self { Side::East => "e", Side::West => "w" }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultType {
    Normal,
    Fusen,
    Kyujo,
    Playoff,
    Unknown,
}

impl ResultType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultType::Normal => "normal",
            ResultType::Fusen => "fusen",
            ResultType::Kyujo => "kyujo",
            ResultType::Playoff => "playoff",
            ResultType::Unknown => "unknown",
        }
    }

    /// Outcomes counted as exceptions in the per-page summary.
    pub fn is_exception(self) -> bool {
        matches!(self, ResultType::Fusen | ResultType::Kyujo | ResultType::Unknown)
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(ResultType::Normal),
            "fusen" => Ok(ResultType::Fusen),
            "kyujo" => Ok(ResultType::Kyujo),
            "playoff" => Ok(ResultType::Playoff),
            "unknown" => Ok(ResultType::Unknown),
            other => Err(format!("unknown result type {other:?}")),
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Regular,
    Playoff,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Regular => "honbasho_regular",
            EventType::Playoff => "honbasho_playoff",
        }
    }

    /// `is_regular` column value.
    pub fn regular_flag(self) -> &'static str {
        match self { EventType::Regular => "T", EventType::Playoff => "F" }
    }
}

/// Everything about a results page that does not come from its HTML.
#[derive(Clone, Debug)]
pub struct BoutMeta {
    pub event_id: String,
    pub event_type: EventType,
    pub basho: String,
    pub day: u32,
    pub source_url: String,
    pub fetched_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoutRecord {
    pub event_id: String,
    pub event_type: EventType,
    pub basho: String,
    pub day: u32,
    pub division: Division,
    pub bout_no: u32,
    pub east_rid: u32,
    pub west_rid: u32,
    pub winner_side: Option<Side>,
    pub kimarite: String,
    pub east_rank: String,
    pub west_rank: String,
    pub result_type: ResultType,
    pub note: String,
    pub source_url: String,
    pub source_row_index: u32,
    pub fetched_at: String,
}

impl BoutRecord {
    /// Row in `store::BOUTS` column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.event_id.clone(),
            s!(self.event_type.as_str()),
            s!(self.event_type.regular_flag()),
            self.basho.clone(),
            self.day.to_string(),
            s!(self.division.as_str()),
            self.bout_no.to_string(),
            self.east_rid.to_string(),
            self.west_rid.to_string(),
            s!(self.winner_side.map(Side::winner_code).unwrap_or("")),
            self.kimarite.clone(),
            self.east_rank.clone(),
            self.west_rank.clone(),
            s!(self.result_type.as_str()),
            self.note.clone(),
            self.source_url.clone(),
            self.source_row_index.to_string(),
            self.fetched_at.clone(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShikonaRecord {
    pub basho: String,
    pub rid: u32,
    pub shikona_at_basho: String,
    pub source_url: String,
    pub division: Division,
    pub rank: String,
}

impl ShikonaRecord {
    /// Row in `store::SHIKONA` column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.basho.clone(),
            self.rid.to_string(),
            self.shikona_at_basho.clone(),
            self.source_url.clone(),
            s!(self.division.as_str()),
            self.rank.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_tables() {
        for d in Division::ALL {
            assert_eq!(d.as_str().parse::<Division>(), Ok(d));
        }
        assert!("makuuchi".parse::<Division>().is_err());
        assert_eq!("kyujo".parse::<ResultType>(), Ok(ResultType::Kyujo));
        assert_eq!(Side::from_code("W"), Some(Side::West));
        assert_eq!(Side::from_code(""), None);
    }

    #[test]
    fn division_found_inside_header_text() {
        assert_eq!(Division::find_in("Juryo (East)"), Some(Division::Juryo));
        assert_eq!(Division::find_in("Mae-zumo"), None);
    }
}
