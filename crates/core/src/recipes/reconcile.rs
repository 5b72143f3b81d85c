use crate::types::{ExtendedRecipe, RecipeId};

/// Merge one mutation result into a previously fetched list.
///
/// - `updated` present: the first entry with the same id is replaced. When
///   nothing matches the list is returned unchanged; brand-new recipes are
///   never inserted here. `delete_id` is ignored in this case.
/// - only `delete_id` present: every entry with that id is removed.
/// - neither present: the list is returned unchanged.
///
/// The input slice is never modified; a new list is always produced.
#[must_use]
pub fn reconcile(
    old: &[ExtendedRecipe],
    updated: Option<ExtendedRecipe>,
    delete_id: Option<&RecipeId>,
) -> Vec<ExtendedRecipe> {
    match (updated, delete_id) {
        (Some(updated), _) => {
            let mut list = old.to_vec();
            if let Some(slot) = list.iter_mut().find(|recipe| recipe.id == updated.id) {
                *slot = updated;
            }
            list
        }
        (None, Some(id)) => old
            .iter()
            .filter(|recipe| &recipe.id != id)
            .cloned()
            .collect(),
        (None, None) => old.to_vec(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::RecipeList;
    use serde_json::json;

    fn recipe(id: &str, name: &str) -> ExtendedRecipe {
        serde_json::from_value(json!({
            "_id": id,
            "name": name,
            "owner": {"_id": "u1", "name": "Ada", "image": null},
            "likedBy": []
        }))
        .unwrap()
    }

    fn names(list: &[ExtendedRecipe]) -> Vec<&str> {
        list.iter().filter_map(|r| r.detail_str("name")).collect()
    }

    #[test]
    fn test_identity_when_nothing_given() {
        let old = vec![recipe("r1", "a"), recipe("r2", "b")];
        assert_eq!(reconcile(&old, None, None), old);
        assert!(reconcile(&[], None, None).is_empty());
    }

    #[test]
    fn test_update_replaces_matching_entry() {
        let old = vec![recipe("r1", "a"), recipe("r2", "b"), recipe("r3", "c")];
        let mut updated = recipe("r2", "b2");
        updated.liked = true;

        let new = reconcile(&old, Some(updated.clone()), None);
        assert_eq!(new.len(), old.len());
        assert_eq!(names(&new), vec!["a", "b2", "c"]);
        assert_eq!(new.get(1), Some(&updated));
        // Input untouched
        assert_eq!(names(&old), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_update_replaces_only_first_match() {
        let old = vec![recipe("r1", "a"), recipe("r1", "dup")];
        let new = reconcile(&old, Some(recipe("r1", "z")), None);
        assert_eq!(names(&new), vec!["z", "dup"]);
    }

    #[test]
    fn test_update_does_not_insert() {
        let old = vec![recipe("r1", "a")];
        let new = reconcile(&old, Some(recipe("r9", "new")), None);
        assert_eq!(new, old);
    }

    #[test]
    fn test_update_wins_over_delete() {
        let old = vec![recipe("r1", "a"), recipe("r2", "b")];
        let id = RecipeId::new("r1");
        let new = reconcile(&old, Some(recipe("r2", "b2")), Some(&id));
        assert_eq!(names(&new), vec!["a", "b2"]);
    }

    #[test]
    fn test_delete_removes_every_match() {
        let old = vec![recipe("r1", "a"), recipe("r2", "b"), recipe("r1", "c")];
        let id = RecipeId::new("r1");
        let new = reconcile(&old, None, Some(&id));
        assert_eq!(names(&new), vec!["b"]);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let old = vec![recipe("r1", "a"), recipe("r2", "b")];
        let id = RecipeId::new("missing");
        assert_eq!(reconcile(&old, None, Some(&id)), old);
    }

    #[test]
    fn test_recipe_list_wrapper() {
        let list = RecipeList::new(vec![recipe("r1", "a"), recipe("r2", "b")]);
        let id = RecipeId::new("r1");
        let pruned = list.reconcile(None, Some(&id));
        assert_eq!(pruned.len(), 1);
        assert_eq!(list.len(), 2);
        assert!(!pruned.is_empty());
    }
}
