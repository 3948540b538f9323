use crate::alias::AliasResolver;
use crate::facet::FacetFilterSet;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    Name,
    Attribute,
    Rarity,
    SchoolYear,
    Date,
    Band,
    Newest,
    Instrument,
}

impl SortKey {
    pub fn parse(token: &str) -> Option<SortKey> {
        match token.to_lowercase().as_str() {
            "id" => Some(SortKey::Id),
            "name" => Some(SortKey::Name),
            "attribute" => Some(SortKey::Attribute),
            "rarity" => Some(SortKey::Rarity),
            "school_year" | "year" => Some(SortKey::SchoolYear),
            "date" => Some(SortKey::Date),
            "band" => Some(SortKey::Band),
            "newest" => Some(SortKey::Newest),
            "instrument" => Some(SortKey::Instrument),
            _ => None,
        }
    }

    /// Whether this key lists its largest value first.
    pub fn is_descending(&self) -> bool {
        matches!(
            self,
            SortKey::Rarity | SortKey::Attribute | SortKey::Date | SortKey::Newest | SortKey::Band
        )
    }
}

///
/// What a user last asked to see in their album.
///
/// `page` is zero-based and may be out of range until the next render
/// clamps it against the filtered result.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQueryState {
    pub page: i64,
    pub filters: FacetFilterSet,
    pub sort: Option<SortKey>,
}

impl UserQueryState {
    pub fn new() -> UserQueryState {
        UserQueryState::default()
    }

    ///
    /// Fold one command's tokens into the remembered state.
    ///
    /// Filters are replaced only when the tokens name at least one facet
    /// value; `all` clears them first. Sort keys reset the page, and an
    /// explicit page number in the same command is applied after that.
    ///
    pub fn apply_tokens<S: AsRef<str>>(&mut self, resolver: &AliasResolver, tokens: &[S]) {
        let parsed: FacetFilterSet = tokens
            .iter()
            .flat_map(|token| resolver.resolve(token.as_ref()))
            .collect();

        if tokens
            .iter()
            .any(|token| token.as_ref().eq_ignore_ascii_case("all"))
        {
            self.filters.clear();
        }
        if !parsed.is_empty() {
            self.filters = parsed;
        }

        for token in tokens {
            if let Some(sort) = SortKey::parse(token.as_ref()) {
                self.sort = Some(sort);
                self.page = 0;
            }
        }
        for token in tokens {
            if let Ok(number) = token.as_ref().parse::<i64>() {
                self.page = number.saturating_sub(1);
            }
        }
        debug!(
            "Query state: page {}, sort {:?}, filters {}",
            self.page,
            self.sort,
            self.filters.describe()
        );
    }
}

///
/// Per-user query state for the lifetime of the process.
///
/// Each user gets their own lock, so holding it for a whole command keeps
/// two commands from the same user from losing each other's updates.
///
#[derive(Debug, Default)]
pub struct QueryStateStore {
    states: Mutex<HashMap<u64, Arc<Mutex<UserQueryState>>>>,
}

impl QueryStateStore {
    pub fn new() -> QueryStateStore {
        QueryStateStore::default()
    }

    pub async fn get(&self, user_id: u64) -> Arc<Mutex<UserQueryState>> {
        let mut states = self.states.lock().await;
        states
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(UserQueryState::new())))
            .clone()
    }

    pub async fn reset(&self, user_id: u64) {
        let state = self.get(user_id).await;
        *state.lock().await = UserQueryState::new();
    }

    pub async fn len(&self) -> usize {
        self.states.lock().await.len()
    }
}
