//! Merging locally-known related entities into server-fetched collections.

use crate::entities::Entity;
use std::borrow::Cow;
use std::collections::HashSet;

/// Prepend every candidate whose identifier is not yet present.
///
/// `None` candidates are ignored. When no candidate remains the original
/// slice is handed back as `Cow::Borrowed`, so callers can compare by
/// identity. Candidates without an identifier never match and are dropped;
/// duplicates among candidates keep only the first occurrence.
pub fn add_to_collection_if_missing<'a, 'c, E, I>(
    collection: &'a [E],
    candidates: I,
) -> Cow<'a, [E]>
where
    E: Entity,
    I: IntoIterator<Item = Option<&'c E>>,
{
    let candidates: Vec<&E> = candidates.into_iter().flatten().collect();
    if candidates.is_empty() {
        return Cow::Borrowed(collection);
    }

    let mut known: HashSet<&E::Id> = collection.iter().filter_map(Entity::id).collect();
    let mut to_add = Vec::new();
    for candidate in candidates {
        let Some(id) = candidate.id() else {
            continue;
        };
        if known.insert(id) {
            to_add.push(candidate.clone());
        }
    }

    let mut merged = Vec::with_capacity(to_add.len() + collection.len());
    merged.extend(to_add);
    merged.extend_from_slice(collection);
    Cow::Owned(merged)
}

/// Owned variant for callers that replace a collection field in place.
pub fn add_if_missing<'c, E, I>(collection: Vec<E>, candidates: I) -> Vec<E>
where
    E: Entity + 'c,
    I: IntoIterator<Item = Option<&'c E>>,
{
    let merged = match add_to_collection_if_missing(&collection, candidates) {
        Cow::Borrowed(_) => None,
        Cow::Owned(merged) => Some(merged),
    };
    merged.unwrap_or(collection)
}
