use crate::structs::Member;
use crate::{Error, Result};
use mongodb::{Collection, Database};
use std::sync::OnceLock;

static MEMBERS: OnceLock<Collection<Member>> = OnceLock::new();

pub fn init(database: &Database) {
    MEMBERS.get_or_init(|| database.collection::<Member>("members"));
}

fn collection() -> Result<&'static Collection<Member>> {
    MEMBERS.get().ok_or(Error::NotInitialized("members collection"))
}

/// Full names of every member known to the catalog.
pub async fn list_full_names() -> Result<Vec<String>> {
    let names = collection()?.distinct("name", None, None).await?;
    Ok(names
        .into_iter()
        .filter_map(|name| name.as_str().map(str::to_string))
        .collect())
}
