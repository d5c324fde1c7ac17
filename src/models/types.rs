//! Small enumerations shared by the model types, parsed from the labels the
//! match centre uses.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TeamStatisticType {
    WinningSpikes,
    KillBlocks,
    Aces,
    OpponentErrors,
    Points,
    #[default]
    Unknown,
}

impl TeamStatisticType {
    pub fn parse(value: &str) -> Self {
        match value {
            "Winning Spikes" => Self::WinningSpikes,
            "Kill Blocks" => Self::KillBlocks,
            "Aces" => Self::Aces,
            "Opponent Errors" => Self::OpponentErrors,
            "Points" => Self::Points,
            _ => Self::Unknown,
        }
    }
}

/// "Top player" award categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TopPlayerType {
    Scorer,
    Attacker,
    Blocker,
    Server,
    Receiver,
    #[default]
    Unknown,
}

impl TopPlayerType {
    pub fn parse(value: &str) -> Self {
        match value {
            "Scorer" => Self::Scorer,
            "Attacker" => Self::Attacker,
            "Blocker" => Self::Blocker,
            "Server" => Self::Server,
            "Receiver" => Self::Receiver,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CompetitionGender {
    Women,
    Men,
    #[default]
    Unknown,
}

impl CompetitionGender {
    pub fn parse(value: &str) -> Self {
        match value {
            "Women" | "W" => Self::Women,
            "Men" | "M" => Self::Men,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Women => "Women",
            Self::Men => "Men",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    Setter,
    MiddleBlocker,
    OutsideSpiker,
    Opposite,
    Libero,
    HeadCoach,
    #[default]
    Unknown,
}

impl Position {
    pub fn parse(value: &str) -> Self {
        match value {
            "Setter" => Self::Setter,
            "Middle blocker" => Self::MiddleBlocker,
            "Outside spiker" => Self::OutsideSpiker,
            "Opposite" => Self::Opposite,
            "Libero" => Self::Libero,
            "Head Coach" => Self::HeadCoach,
            _ => Self::Unknown,
        }
    }
}

/// Court zone of a player. Serialized as its number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Sub,
    Featured,
    #[default]
    Unknown,
}

impl Zone {
    pub fn parse(value: i64) -> Self {
        match value {
            1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            4 => Self::Four,
            5 => Self::Five,
            6 => Self::Six,
            7 | 8 => Self::Featured,
            0 => Self::Sub,
            _ => Self::Unknown,
        }
    }

    pub fn number(&self) -> i8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Sub => 0,
            Self::Featured => 7,
            Self::Unknown => -1,
        }
    }
}

impl Serialize for Zone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.number())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayType {
    Spike,
    Serve,
    Block,
    FirstServe,
    #[default]
    Unknown,
}

impl PlayType {
    pub fn parse(value: &str) -> Self {
        match value {
            "Spike" => Self::Spike,
            "Serve" => Self::Serve,
            "Block" => Self::Block,
            "First Serve" => Self::FirstServe,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_parse_and_serialize() {
        assert_eq!(Zone::parse(8), Zone::Featured);
        assert_eq!(Zone::parse(0), Zone::Sub);
        assert_eq!(Zone::parse(42), Zone::Unknown);
        assert_eq!(serde_json::to_string(&Zone::Four).unwrap(), "4");
        assert_eq!(serde_json::to_string(&Zone::Unknown).unwrap(), "-1");
    }

    #[test]
    fn test_labels() {
        assert_eq!(Position::parse("Middle blocker"), Position::MiddleBlocker);
        assert_eq!(
            serde_json::to_string(&Position::MiddleBlocker).unwrap(),
            "\"middleBlocker\""
        );
        assert_eq!(CompetitionGender::parse("W"), CompetitionGender::Women);
        assert_eq!(PlayType::parse("First Serve"), PlayType::FirstServe);
        assert_eq!(TopPlayerType::parse("Libero"), TopPlayerType::Unknown);
    }
}
