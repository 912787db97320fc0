use serde::{Deserialize, Serialize};

/// Calendar month with the fixed day counts used throughout the model.
///
/// The model works on a 365-day year; February is always 28 days and no
/// leap-year adjustment is applied anywhere downstream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// All twelve months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Three-letter uppercase key as used by the NASA POWER climatology API.
    pub fn key(&self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }

    /// Days in this month (fixed 365-day calendar).
    pub fn days(&self) -> u32 {
        match self {
            Month::Jan => 31,
            Month::Feb => 28,
            Month::Mar => 31,
            Month::Apr => 30,
            Month::May => 31,
            Month::Jun => 30,
            Month::Jul => 31,
            Month::Aug => 31,
            Month::Sep => 30,
            Month::Oct => 31,
            Month::Nov => 30,
            Month::Dec => 31,
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
            Self::Aug => "Aug",
            Self::Sep => "Sep",
            Self::Oct => "Oct",
            Self::Nov => "Nov",
            Self::Dec => "Dec",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Month {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "JAN" => Ok(Self::Jan),
            "FEB" => Ok(Self::Feb),
            "MAR" => Ok(Self::Mar),
            "APR" => Ok(Self::Apr),
            "MAY" => Ok(Self::May),
            "JUN" => Ok(Self::Jun),
            "JUL" => Ok(Self::Jul),
            "AUG" => Ok(Self::Aug),
            "SEP" => Ok(Self::Sep),
            "OCT" => Ok(Self::Oct),
            "NOV" => Ok(Self::Nov),
            "DEC" => Ok(Self::Dec),
            _ => Err("invalid month; expected JAN..DEC"),
        }
    }
}
