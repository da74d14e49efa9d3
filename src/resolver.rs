//! Tracked-set resolution.
//!
//! Turns the configured names, addresses and owner addresses into the
//! canonical [`ResolvedSet`]. Soft failures (an ambiguous name, an owner
//! listing that cannot be fetched) drop their one contribution and move on;
//! a failure while loading any tracked hotspot's document discards the whole
//! in-progress set, so the next cycle re-resolves from scratch rather than
//! publishing a partial tracked set.

use std::collections::{BTreeMap, HashSet};

use tracing::{error, info, warn};

use crate::api::HeliumApi;
use crate::config::Config;
use crate::error::ResolveError;
use crate::types::ResolvedSet;

/// Whether the tracked set has been built yet.
///
/// Owned by the poll loop; a failed resolution stays `Unresolved` (no error
/// is cached) and is retried wholesale on the next cycle.
#[derive(Debug, Clone, Default)]
pub enum Resolution {
    #[default]
    Unresolved,
    Resolved(ResolvedSet),
}

/// Normalizes a configured hotspot name: lowercased, surrounding whitespace
/// dropped, internal whitespace runs collapsed to a single hyphen.
pub fn normalize_name(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalizes an address for use as a dedup key.
pub fn normalize_address(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Builds the tracked set from the configured inputs.
pub async fn resolve(api: &dyn HeliumApi, config: &Config) -> Result<ResolvedSet, ResolveError> {
    let mut addresses: Vec<String> = Vec::new();

    for raw in &config.hotspot_names {
        let name = normalize_name(raw);
        match api.hotspots_by_name(&name).await {
            Ok(Some(matches)) => match matches.as_slice() {
                [] => error!(%name, "no hotspot found with this name"),
                [only] => addresses.push(normalize_address(&only.address)),
                _ => error!(
                    %name,
                    matches = matches.len(),
                    "hotspot name is not unique, refusing to guess"
                ),
            },
            Ok(None) => error!(%name, "no hotspot found with this name"),
            Err(err) => error!(%name, %err, "name lookup failed, dropping name"),
        }
    }

    for raw in &config.hotspot_addresses {
        addresses.push(normalize_address(raw));
    }

    for raw in &config.owner_addresses {
        let owner = normalize_address(raw);
        match api.hotspots_for_owner(&owner).await {
            Ok(Some(owned)) => {
                info!(%owner, hotspots = owned.len(), "tracking hotspots by owner");
                addresses.extend(owned.iter().map(|h| normalize_address(&h.address)));
            }
            Ok(None) => warn!(%owner, "owner has no hotspot listing"),
            Err(err) => warn!(%owner, %err, "owner lookup failed, contributing no hotspots"),
        }
    }

    // Dedup by normalized address, keeping first-seen order for the fetch pass.
    let mut seen = HashSet::new();
    addresses.retain(|address| seen.insert(address.clone()));

    let mut hotspots = BTreeMap::new();
    let mut accounts: BTreeMap<String, usize> = BTreeMap::new();
    for address in addresses {
        let doc = match api.hotspot(&address).await {
            Ok(Some(doc)) => doc,
            Ok(None) => return Err(ResolveError::MissingDocument { address }),
            Err(source) => return Err(ResolveError::HotspotLookup { address, source }),
        };
        *accounts.entry(normalize_address(&doc.owner)).or_insert(0) += 1;
        hotspots.insert(address, doc.name);
    }

    Ok(ResolvedSet { hotspots, accounts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{hotspot_doc, MockApi};

    fn config(names: &[&str], addresses: &[&str], owners: &[&str]) -> Config {
        Config {
            hotspot_names: names.iter().map(|s| s.to_string()).collect(),
            hotspot_addresses: addresses.iter().map(|s| s.to_string()).collect(),
            owner_addresses: owners.iter().map(|s| s.to_string()).collect(),
            ..Config::default()
        }
    }

    #[test]
    fn names_are_normalized() {
        assert_eq!(normalize_name("  Tall  Iris Pony "), "tall-iris-pony");
        assert_eq!(normalize_name("tall-iris-pony"), "tall-iris-pony");
        assert_eq!(normalize_address(" ADDR1 "), "addr1");
    }

    #[tokio::test]
    async fn overlapping_inputs_dedup_by_normalized_address() {
        let api = MockApi::new();
        api.set_name_matches("tall-iris-pony", &["addr1"]);
        api.set_owner_hotspots("owner-one", &["addr2", "addr3"]);

        let mut one = hotspot_doc("addr1", "tall-iris-pony");
        one.owner = "owner-one".to_string();
        let mut two = hotspot_doc("addr2", "quick-mint-otter");
        two.owner = "owner-one".to_string();
        let mut three = hotspot_doc("addr3", "wild-plum-falcon");
        three.owner = "owner-two".to_string();
        api.set_hotspot(one);
        api.set_hotspot(two);
        api.set_hotspot(three);

        // addr1 arrives via its name and again as an explicit address; addr2
        // arrives explicitly and again via its owner.
        let config = config(&["Tall Iris Pony"], &[" ADDR1 ", "addr2"], &["owner-one"]);
        let set = resolve(&api, &config).await.unwrap();

        assert_eq!(set.hotspots.len(), 3);
        assert_eq!(
            set.hotspots.get("addr1"),
            Some(&"tall-iris-pony".to_string())
        );
        assert_eq!(set.accounts.get("owner-one"), Some(&2));
        assert_eq!(set.accounts.get("owner-two"), Some(&1));

        // Each document was fetched exactly once despite the overlap.
        let doc_fetches = api
            .calls()
            .iter()
            .filter(|call| call.starts_with("hotspot:"))
            .count();
        assert_eq!(doc_fetches, 3);
    }

    #[tokio::test]
    async fn ambiguous_and_missing_names_are_dropped() {
        let api = MockApi::new();
        api.set_name_matches("doubled-name", &["addr1", "addr2"]);
        api.set_name_matches("good-name", &["addr3"]);
        // "absent-name" has no entry at all.
        api.set_hotspot(hotspot_doc("addr3", "good-name"));

        let config = config(&["doubled name", "absent name", "good name"], &[], &[]);
        let set = resolve(&api, &config).await.unwrap();

        assert_eq!(set.hotspots.len(), 1);
        assert!(set.hotspots.contains_key("addr3"));
    }

    #[tokio::test]
    async fn name_lookup_failure_does_not_abort_other_names() {
        let api = MockApi::new();
        api.fail("name:broken-name");
        api.set_name_matches("good-name", &["addr1"]);
        api.set_hotspot(hotspot_doc("addr1", "good-name"));

        let config = config(&["broken name", "good name"], &[], &[]);
        let set = resolve(&api, &config).await.unwrap();

        assert_eq!(set.hotspots.len(), 1);
    }

    #[tokio::test]
    async fn owner_lookup_failure_contributes_nothing() {
        let api = MockApi::new();
        api.fail("owner:bad-owner");
        api.set_hotspot(hotspot_doc("addr1", "good-name"));

        let config = config(&[], &["addr1"], &["bad-owner"]);
        let set = resolve(&api, &config).await.unwrap();

        assert_eq!(set.hotspots.len(), 1);
    }

    #[tokio::test]
    async fn document_failure_discards_the_whole_set() {
        let api = MockApi::new();
        api.set_hotspot(hotspot_doc("addr1", "good-name"));
        api.fail("hotspot:addr2");

        let config = config(&[], &["addr1", "addr2"], &[]);
        assert!(resolve(&api, &config).await.is_err());

        // Same inputs succeed once the upstream recovers.
        api.unfail("hotspot:addr2");
        api.set_hotspot(hotspot_doc("addr2", "other-name"));
        let set = resolve(&api, &config).await.unwrap();
        assert_eq!(set.hotspots.len(), 2);
    }

    #[tokio::test]
    async fn missing_document_discards_the_whole_set() {
        let api = MockApi::new();
        api.set_hotspot(hotspot_doc("addr1", "good-name"));
        // addr2 resolves to no document at all.

        let config = config(&[], &["addr1", "addr2"], &[]);
        assert!(resolve(&api, &config).await.is_err());
    }
}
