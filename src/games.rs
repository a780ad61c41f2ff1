use serde::{Deserialize, Serialize};
use std::fmt;

/// How a game's number pool is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    /// Single pool, numbers drawn without replacement.
    Lotto,
    /// Two independent pools: zone 1 plus a single zone-2 number.
    Power,
    /// Each position is a digit 0-9, repeats allowed.
    Digit,
}

/// The games the live fetcher knows about. Variants are declared in display
/// order, so the derived `Ord` sorts maps the way the dashboard lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Game {
    #[serde(rename = "大樂透")]
    Lotto649,
    #[serde(rename = "威力彩")]
    SuperLotto638,
    #[serde(rename = "今彩539")]
    Daily539,
    #[serde(rename = "3星彩")]
    ThreeD,
    #[serde(rename = "4星彩")]
    FourD,
}

impl Game {
    pub const ALL: [Game; 5] = [
        Game::Lotto649,
        Game::SuperLotto638,
        Game::Daily539,
        Game::ThreeD,
        Game::FourD,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Game::Lotto649 => "大樂透",
            Game::SuperLotto638 => "威力彩",
            Game::Daily539 => "今彩539",
            Game::ThreeD => "3星彩",
            Game::FourD => "4星彩",
        }
    }

    /// Stable ASCII identifier, used as the storage key.
    pub fn code(&self) -> &'static str {
        match self {
            Game::Lotto649 => "Lotto649",
            Game::SuperLotto638 => "SuperLotto638",
            Game::Daily539 => "Daily539",
            Game::ThreeD => "3D",
            Game::FourD => "4D",
        }
    }

    /// Path segment under the results API base.
    pub fn api_route(&self) -> String {
        format!("{}Result", self.code())
    }

    /// Keys under `content` holding the record array, tried in order.
    pub fn response_keys(&self) -> &'static [&'static str] {
        match self {
            Game::Lotto649 => &["lotto649Res"],
            Game::SuperLotto638 => &["superLotto638Res"],
            Game::Daily539 => &["daily539Res"],
            Game::ThreeD => &["lotto3DRes", "l3DRes"],
            Game::FourD => &["lotto4DRes", "l4DRes"],
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Game::SuperLotto638 => GameKind::Power,
            Game::ThreeD | Game::FourD => GameKind::Digit,
            Game::Lotto649 | Game::Daily539 => GameKind::Lotto,
        }
    }

    /// Highest number in the primary pool.
    pub fn range(&self) -> u32 {
        match self {
            Game::Lotto649 => 49,
            Game::SuperLotto638 => 38,
            Game::Daily539 => 39,
            Game::ThreeD | Game::FourD => 9,
        }
    }

    /// How many numbers a player picks from the primary pool.
    pub fn pick_count(&self) -> usize {
        match self {
            Game::Lotto649 | Game::SuperLotto638 => 6,
            Game::Daily539 => 5,
            Game::ThreeD => 3,
            Game::FourD => 4,
        }
    }

    pub fn zone2_range(&self) -> Option<u32> {
        match self {
            Game::SuperLotto638 => Some(8),
            _ => None,
        }
    }

    /// Whether `n` can appear in an official draw of this game. The zone-2
    /// pool of the power game is a subset of zone 1, so one bound covers both.
    pub fn accepts(&self, n: u32) -> bool {
        match self.kind() {
            GameKind::Digit => n <= self.range(),
            GameKind::Lotto | GameKind::Power => (1..=self.range()).contains(&n),
        }
    }

    pub fn from_name(name: &str) -> Option<Game> {
        let name = name.trim();
        Game::ALL
            .into_iter()
            .find(|g| g.display_name() == name || g.code().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
