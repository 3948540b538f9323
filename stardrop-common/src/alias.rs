use crate::facet::FacetValue;
use crate::structs::{Attribute, Band, Instrument, Rarity, SchoolYear};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::trace;

static NAME_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("misaki", "Michelle"),
        ("rimirin", "Rimi Ushigome"),
        ("choco", "Rimi Ushigome"),
        ("cornet", "Rimi Ushigome"),
        ("o-tae", "Tae Hanazono"),
        ("tsugu", "Tsugumi Hazawa"),
        ("tsugurific", "Tsugumi Hazawa"),
        ("rinrin", "Rinko Shirokane"),
        ("bushido", "Eve Wakamiya"),
        ("fleeting", "Kaoru Seta"),
        ("boppin", "Hina Hikawa"),
        ("boppin'", "Hina Hikawa"),
        ("combo", "Hina Hikawa"),
        ("fc", "Hina Hikawa"),
        ("fuee", "Kanon Matsubara"),
        ("bread", "Saaya Yamabuki"),
        ("saya", "Saaya Yamabuki"),
        ("koko", "Kokoro Tsurumaki"),
        ("fortnite", "Kokoro Tsurumaki"),
        ("hoh", "Himari Uehara"),
        ("gamer", "Ako Udagawa"),
        ("tatoe", "Yukina Minato"),
        ("sans", "Moca Aoba"),
        ("undertale", "Moca Aoba"),
        ("toko", "Kirigaya Touko"),
    ])
});

static BAND_ALIASES: Lazy<HashMap<&'static str, Band>> = Lazy::new(|| {
    HashMap::from([
        ("poppin", Band::PoppinParty),
        ("poppin'", Band::PoppinParty),
        ("popping'", Band::PoppinParty),
        ("party", Band::PoppinParty),
        ("afterglow", Band::Afterglow),
        ("hello", Band::HelloHappyWorld),
        ("world", Band::HelloHappyWorld),
        ("hhw", Band::HelloHappyWorld),
        ("pastel", Band::PastelPalettes),
        ("palettes", Band::PastelPalettes),
        ("pastel*palettes", Band::PastelPalettes),
        ("roselia", Band::Roselia),
        ("morfonica", Band::Morfonica),
        ("monica", Band::Morfonica),
        ("ras", Band::RaiseASuilen),
        ("raise", Band::RaiseASuilen),
    ])
});

static RARITY_ALIASES: Lazy<HashMap<&'static str, Rarity>> = Lazy::new(|| {
    HashMap::from([
        ("1star", Rarity::One),
        ("2star", Rarity::Two),
        ("3star", Rarity::Three),
        ("4star", Rarity::Four),
    ])
});

static INSTRUMENT_ALIASES: Lazy<HashMap<&'static str, Instrument>> = Lazy::new(|| {
    HashMap::from([
        ("vocals", Instrument::GuitarVocals),
        ("vocalist", Instrument::GuitarVocals),
        ("guitarist", Instrument::Guitar),
        ("drummer", Instrument::Drums),
        ("keytarist", Instrument::Keytar),
        ("keyboardist", Instrument::Keyboard),
        ("bassist", Instrument::Bass),
        ("violinist", Instrument::Violin),
    ])
});

fn school_year_word(word: &str) -> Option<SchoolYear> {
    match word {
        "first" => Some(SchoolYear::First),
        "second" => Some(SchoolYear::Second),
        "third" => Some(SchoolYear::Third),
        _ => None,
    }
}

fn attribute_word(word: &str) -> Option<Attribute> {
    match word {
        "cool" => Some(Attribute::Cool),
        "happy" => Some(Attribute::Happy),
        "pure" => Some(Attribute::Pure),
        "power" | "powerful" => Some(Attribute::Power),
        _ => None,
    }
}

fn instrument_word(word: &str) -> Option<Instrument> {
    match word {
        "dj" => Some(Instrument::Dj),
        "drums" => Some(Instrument::Drums),
        "guitar" => Some(Instrument::Guitar),
        "guitar/vocals" => Some(Instrument::GuitarVocals),
        "keytar" => Some(Instrument::Keytar),
        "bass" => Some(Instrument::Bass),
        "keyboard" => Some(Instrument::Keyboard),
        _ => None,
    }
}

/// Compound roles a catalog entry may be tagged with instead of the plain one.
fn expand_instrument(instrument: Instrument) -> Option<Instrument> {
    match instrument {
        Instrument::GuitarVocals => Some(Instrument::Vocals),
        Instrument::Guitar => Some(Instrument::GuitarVocals),
        _ => None,
    }
}

///
/// Upper-case the first letter of every run of letters and lower-case the
/// rest, so `o'BRIEN` becomes `O'Brien`.
///
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut in_word = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

///
/// Turns a free-text command token into facet values.
///
/// Every source that recognises the token contributes, so one token can
/// constrain several facets at once. Unknown tokens resolve to nothing.
///
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    roster: Vec<String>,
}

impl AliasResolver {
    pub fn new(roster: Vec<String>) -> AliasResolver {
        AliasResolver { roster }
    }

    pub fn resolve(&self, token: &str) -> Vec<FacetValue> {
        let word = token.to_lowercase();
        let mut found: Vec<FacetValue> = Vec::new();

        if let Some(name) = NAME_ALIASES.get(word.as_str()) {
            found.push(FacetValue::Name(name.to_string()));
        }
        if let Some(band) = BAND_ALIASES.get(word.as_str()) {
            found.push(FacetValue::Band(*band));
        }
        if let Some(rarity) = RARITY_ALIASES.get(word.as_str()) {
            found.push(FacetValue::Rarity(*rarity));
        }
        if let Some(instrument) = INSTRUMENT_ALIASES.get(word.as_str()) {
            found.push(FacetValue::Instrument(*instrument));
        }

        let titled = title_case(&word);
        for full_name in &self.roster {
            if full_name.split(' ').any(|part| part == titled) {
                found.push(FacetValue::Name(full_name.clone()));
            }
        }

        if let Some(year) = school_year_word(&word) {
            found.push(FacetValue::SchoolYear(year));
        }
        if let Some(attribute) = attribute_word(&word) {
            found.push(FacetValue::Attribute(attribute));
        }
        if let Some(instrument) = instrument_word(&word) {
            found.push(FacetValue::Instrument(instrument));
        }

        let expanded: Vec<FacetValue> = found
            .iter()
            .filter_map(|value| match value {
                FacetValue::Instrument(instrument) => {
                    expand_instrument(*instrument).map(FacetValue::Instrument)
                }
                _ => None,
            })
            .collect();
        found.extend(expanded);

        trace!("Resolved token {:?} to {:?}", token, found);
        found
    }
}
