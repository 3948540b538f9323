use crate::structs::{Attribute, Band, CardEntry, Instrument, Rarity, SchoolYear};
use mongodb::bson::{doc, Document};
use std::collections::BTreeSet;

///
/// A single typed constraint value produced by the alias resolver.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacetValue {
    Name(String),
    Band(Band),
    SchoolYear(SchoolYear),
    Attribute(Attribute),
    Rarity(Rarity),
    Instrument(Instrument),
}

///
/// Active constraints per facet. An empty set leaves that facet
/// unconstrained; a card must satisfy every non-empty facet and may match
/// any value within one.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetFilterSet {
    pub names: BTreeSet<String>,
    pub bands: BTreeSet<Band>,
    pub school_years: BTreeSet<SchoolYear>,
    pub attributes: BTreeSet<Attribute>,
    pub rarities: BTreeSet<Rarity>,
    pub instruments: BTreeSet<Instrument>,
}

fn allows<T: Ord>(set: &BTreeSet<T>, value: &T) -> bool {
    set.is_empty() || set.contains(value)
}

impl FacetFilterSet {
    pub fn new() -> FacetFilterSet {
        FacetFilterSet::default()
    }

    pub fn insert(&mut self, value: FacetValue) {
        match value {
            FacetValue::Name(name) => {
                self.names.insert(name);
            }
            FacetValue::Band(band) => {
                self.bands.insert(band);
            }
            FacetValue::SchoolYear(year) => {
                self.school_years.insert(year);
            }
            FacetValue::Attribute(attribute) => {
                self.attributes.insert(attribute);
            }
            FacetValue::Rarity(rarity) => {
                self.rarities.insert(rarity);
            }
            FacetValue::Instrument(instrument) => {
                self.instruments.insert(instrument);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
            && self.bands.is_empty()
            && self.school_years.is_empty()
            && self.attributes.is_empty()
            && self.rarities.is_empty()
            && self.instruments.is_empty()
    }

    pub fn clear(&mut self) {
        *self = FacetFilterSet::default();
    }

    pub fn matches(&self, card: &CardEntry) -> bool {
        allows(&self.names, &card.member_name)
            && allows(&self.bands, &card.band)
            && allows(&self.school_years, &card.school_year)
            && allows(&self.attributes, &card.attribute)
            && allows(&self.rarities, &card.rarity)
            && allows(&self.instruments, &card.instrument)
    }

    ///
    /// Build the `$match` document for sampling catalog cards of one tier.
    ///
    /// The rarity facet is not part of the query: the draw decides the tier.
    ///
    pub fn catalog_query(&self, rarity: Rarity) -> Document {
        let mut query = doc! { "rarity": rarity.tier() as i32 };
        if !self.names.is_empty() {
            let names: Vec<String> = self.names.iter().cloned().collect();
            query.insert("member_name", doc! { "$in": names });
        }
        if !self.bands.is_empty() {
            let bands: Vec<&str> = self.bands.iter().map(|v| v.as_str()).collect();
            query.insert("band", doc! { "$in": bands });
        }
        if !self.school_years.is_empty() {
            let years: Vec<&str> = self.school_years.iter().map(|v| v.as_str()).collect();
            query.insert("school_year", doc! { "$in": years });
        }
        if !self.attributes.is_empty() {
            let attributes: Vec<&str> = self.attributes.iter().map(|v| v.as_str()).collect();
            query.insert("attribute", doc! { "$in": attributes });
        }
        if !self.instruments.is_empty() {
            let instruments: Vec<&str> = self.instruments.iter().map(|v| v.as_str()).collect();
            query.insert("instrument", doc! { "$in": instruments });
        }
        query
    }

    /// Human readable summary, e.g. `band: Roselia · attribute: Cool`.
    pub fn describe(&self) -> String {
        fn part<T, F: Fn(&T) -> String>(label: &str, set: &BTreeSet<T>, f: F) -> Option<String> {
            if set.is_empty() {
                return None;
            }
            let values: Vec<String> = set.iter().map(f).collect();
            Some(format!("{}: {}", label, values.join(", ")))
        }
        let parts: Vec<String> = [
            part("name", &self.names, |v| v.clone()),
            part("band", &self.bands, |v| v.to_string()),
            part("year", &self.school_years, |v| v.to_string()),
            part("attribute", &self.attributes, |v| v.to_string()),
            part("rarity", &self.rarities, |v| v.to_string()),
            part("instrument", &self.instruments, |v| v.to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" · ")
        }
    }
}

impl Extend<FacetValue> for FacetFilterSet {
    fn extend<I: IntoIterator<Item = FacetValue>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl FromIterator<FacetValue> for FacetFilterSet {
    fn from_iter<I: IntoIterator<Item = FacetValue>>(iter: I) -> Self {
        let mut filters = FacetFilterSet::new();
        filters.extend(iter);
        filters
    }
}
