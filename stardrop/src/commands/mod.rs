pub mod album;
pub mod debug;
pub mod play;
pub mod stats;

use stardrop_common::alias::AliasResolver;
use stardrop_common::store::MemberRoster;
use stardrop_common::Result;

/// Resolver over the member roster as currently stored in the catalog.
pub async fn resolver() -> Result<AliasResolver> {
    let roster = crate::STORE.list_known_full_names().await?;
    Ok(AliasResolver::new(roster))
}
