use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Calendar month an edition is titled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditionMonth {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not a month name")]
pub struct ParseMonthError(pub String);

impl EditionMonth {
    pub const ALL: [EditionMonth; 12] = [
        EditionMonth::January,
        EditionMonth::February,
        EditionMonth::March,
        EditionMonth::April,
        EditionMonth::May,
        EditionMonth::June,
        EditionMonth::July,
        EditionMonth::August,
        EditionMonth::September,
        EditionMonth::October,
        EditionMonth::November,
        EditionMonth::December,
    ];

    /// Month for a 1-based month number.
    pub fn from_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    pub fn current() -> Self {
        // chrono guarantees 1..=12
        Self::from_number(Local::now().month()).unwrap_or(EditionMonth::January)
    }

    pub fn name(self) -> &'static str {
        match self {
            EditionMonth::January => "January",
            EditionMonth::February => "February",
            EditionMonth::March => "March",
            EditionMonth::April => "April",
            EditionMonth::May => "May",
            EditionMonth::June => "June",
            EditionMonth::July => "July",
            EditionMonth::August => "August",
            EditionMonth::September => "September",
            EditionMonth::October => "October",
            EditionMonth::November => "November",
            EditionMonth::December => "December",
        }
    }
}

impl fmt::Display for EditionMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts full names and three-letter abbreviations, any case.
impl FromStr for EditionMonth {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted.len() < 3 {
            return Err(ParseMonthError(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|month| {
                let name = month.name().to_lowercase();
                name == wanted || (wanted.len() == 3 && name.starts_with(&wanted))
            })
            .ok_or_else(|| ParseMonthError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_abbreviations() {
        assert_eq!("April".parse(), Ok(EditionMonth::April));
        assert_eq!(" december ".parse(), Ok(EditionMonth::December));
        assert_eq!("SEP".parse(), Ok(EditionMonth::September));
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("Smarch".parse::<EditionMonth>().is_err());
        assert!("ju".parse::<EditionMonth>().is_err());
        assert!("janu".parse::<EditionMonth>().is_err());
    }

    #[test]
    fn numbers_map_onto_calendar_order() {
        assert_eq!(EditionMonth::from_number(1), Some(EditionMonth::January));
        assert_eq!(EditionMonth::from_number(12), Some(EditionMonth::December));
        assert_eq!(EditionMonth::from_number(0), None);
        assert_eq!(EditionMonth::from_number(13), None);
    }

    #[test]
    fn serializes_as_plain_name() {
        let json = serde_json::to_string(&EditionMonth::April).unwrap();
        assert_eq!(json, "\"April\"");
    }
}
