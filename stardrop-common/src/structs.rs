use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Band {
    #[serde(rename = "Poppin' Party")]
    PoppinParty,
    Afterglow,
    #[serde(rename = "Hello, Happy World!")]
    HelloHappyWorld,
    #[serde(rename = "Pastel*Palettes")]
    PastelPalettes,
    Roselia,
    Morfonica,
    #[serde(rename = "RAISE A SUILEN")]
    RaiseASuilen,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::PoppinParty => "Poppin' Party",
            Band::Afterglow => "Afterglow",
            Band::HelloHappyWorld => "Hello, Happy World!",
            Band::PastelPalettes => "Pastel*Palettes",
            Band::Roselia => "Roselia",
            Band::Morfonica => "Morfonica",
            Band::RaiseASuilen => "RAISE A SUILEN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Attribute {
    Cool,
    Happy,
    Pure,
    Power,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Cool,
        Attribute::Happy,
        Attribute::Pure,
        Attribute::Power,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Cool => "Cool",
            Attribute::Happy => "Happy",
            Attribute::Pure => "Pure",
            Attribute::Power => "Power",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum SchoolYear {
    First,
    Second,
    Third,
}

impl SchoolYear {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolYear::First => "First",
            SchoolYear::Second => "Second",
            SchoolYear::Third => "Third",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Instrument {
    #[serde(rename = "DJ")]
    Dj,
    Drums,
    Guitar,
    #[serde(rename = "Guitar/Vocals")]
    GuitarVocals,
    Keytar,
    Bass,
    #[serde(rename = "Bass/Vocals")]
    BassVocals,
    Keyboard,
    Vocals,
    Violin,
}

impl Instrument {
    pub fn as_str(&self) -> &'static str {
        match self {
            Instrument::Dj => "DJ",
            Instrument::Drums => "Drums",
            Instrument::Guitar => "Guitar",
            Instrument::GuitarVocals => "Guitar/Vocals",
            Instrument::Keytar => "Keytar",
            Instrument::Bass => "Bass",
            Instrument::BassVocals => "Bass/Vocals",
            Instrument::Keyboard => "Keyboard",
            Instrument::Vocals => "Vocals",
            Instrument::Violin => "Violin",
        }
    }
}

///
/// Card rarity tier, stored as the plain integer 1 to 4.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rarity {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Rarity {
    /// Ascending tier order.
    pub const ALL: [Rarity; 4] = [Rarity::One, Rarity::Two, Rarity::Three, Rarity::Four];

    pub fn tier(&self) -> u8 {
        *self as u8
    }

    /// Zero-based position in a rate table.
    pub fn index(&self) -> usize {
        self.tier() as usize - 1
    }
}

impl TryFrom<u8> for Rarity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rarity::One),
            2 => Ok(Rarity::Two),
            3 => Ok(Rarity::Three),
            4 => Ok(Rarity::Four),
            other => Err(format!("Rarity must be between 1 and 4, got {}", other)),
        }
    }
}

impl From<Rarity> for u8 {
    fn from(rarity: Rarity) -> u8 {
        rarity.tier()
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Band, Attribute, SchoolYear, Instrument);

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}★", self.tier())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CardEntry {
    #[serde(rename = "_id")]
    pub id: u32,
    pub member_name: String,
    pub band: Band,
    pub rarity: Rarity,
    pub attribute: Attribute,
    pub school_year: SchoolYear,
    pub instrument: Instrument,
    pub release_date: Option<NaiveDate>,
    pub art: Option<String>,
    pub art_trained: Option<String>,
}

impl CardEntry {
    ///
    /// Art to show for this card, preferring the trained art when asked
    /// and available.
    ///
    pub fn art_url(&self, trained: bool) -> Option<&str> {
        if trained {
            if let Some(ref url) = self.art_trained {
                return Some(url);
            }
        }
        self.art.as_deref()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OwnedCard {
    pub card: CardEntry,
    pub count: u32,
    pub acquired_at: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: u32,
    pub name: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn card(id: u32, member_name: &str, rarity: Rarity) -> CardEntry {
        CardEntry {
            id,
            member_name: member_name.to_string(),
            band: Band::PoppinParty,
            rarity,
            attribute: Attribute::Cool,
            school_year: SchoolYear::First,
            instrument: Instrument::Guitar,
            release_date: None,
            art: Some(format!("https://cards.example/{}.png", id)),
            art_trained: None,
        }
    }

    pub fn owned(card: CardEntry) -> OwnedCard {
        OwnedCard {
            card,
            count: 1,
            acquired_at: 0,
        }
    }
}
