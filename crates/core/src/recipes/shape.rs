use crate::types::{ExtendedRecipe, PublicUser, Recipe, UserId};

/// Fields that are always recomputed and must not leak through `details`.
const DERIVED_FIELDS: [&str; 2] = ["owns", "liked"];

/// Shape a batch of recipes for one viewer.
#[must_use]
pub fn shape(recipes: &[Recipe], viewer: &UserId) -> Vec<ExtendedRecipe> {
    recipes.iter().map(|recipe| shape_one(recipe, viewer)).collect()
}

/// Shape a single recipe for one viewer.
///
/// Owner and liked-by entries are reduced to id, name and image; `owns` and
/// `liked` are computed against `viewer`, replacing any values the API sent.
#[must_use]
pub fn shape_one(recipe: &Recipe, viewer: &UserId) -> ExtendedRecipe {
    let mut details = recipe.details.clone();
    for field in DERIVED_FIELDS {
        details.remove(field);
    }

    ExtendedRecipe {
        id: recipe.id.clone(),
        owner: PublicUser::from(&recipe.owner),
        liked_by: recipe.liked_by.iter().map(PublicUser::from).collect(),
        created_at: recipe.created_at,
        details,
        owns: &recipe.owner.id == viewer,
        liked: recipe.liked_by.iter().any(|user| &user.id == viewer),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe(value: serde_json::Value) -> Recipe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_owner_who_liked() {
        let recipes = vec![recipe(json!({
            "_id": "r1",
            "owner": {"_id": "u1", "name": "Ada", "image": "ada.png", "email": "ada@example.com"},
            "likedBy": [{"_id": "u1", "name": "Ada", "image": "ada.png", "email": "ada@example.com"}]
        }))];

        let shaped = shape(&recipes, &UserId::new("u1"));
        assert_eq!(shaped.len(), 1);
        let first = shaped.first().unwrap();
        assert!(first.owns);
        assert!(first.liked);
    }

    #[test]
    fn test_other_viewer() {
        let recipes = vec![recipe(json!({
            "_id": "r1",
            "owner": {"_id": "u1", "name": "Ada"},
            "likedBy": [{"_id": "u2", "name": "Grace"}, {"_id": "u3", "name": "Linus"}]
        }))];

        let shaped = shape(&recipes, &UserId::new("u3"));
        let first = shaped.first().unwrap();
        assert!(!first.owns);
        assert!(first.liked);

        let shaped = shape(&recipes, &UserId::new("u9"));
        let first = shaped.first().unwrap();
        assert!(!first.owns);
        assert!(!first.liked);
    }

    #[test]
    fn test_user_objects_are_trimmed() {
        let raw = recipe(json!({
            "_id": "r1",
            "owner": {"_id": "u1", "name": "Ada", "image": "ada.png", "email": "ada@example.com", "emailVerified": null},
            "likedBy": [{"_id": "u2", "name": "Grace", "image": null, "email": "grace@example.com"}]
        }));

        let shaped = shape_one(&raw, &UserId::new("u2"));
        let value = serde_json::to_value(&shaped).unwrap();
        assert_eq!(value["owner"], json!({"_id": "u1", "name": "Ada", "image": "ada.png"}));
        assert_eq!(value["likedBy"], json!([{"_id": "u2", "name": "Grace", "image": null}]));
    }

    #[test]
    fn test_stale_flags_from_api_are_recomputed() {
        let raw = recipe(json!({
            "_id": "r1",
            "name": "Ramen",
            "owner": {"_id": "u1"},
            "likedBy": [],
            "owns": true,
            "liked": true
        }));

        let shaped = shape_one(&raw, &UserId::new("u2"));
        assert!(!shaped.owns);
        assert!(!shaped.liked);
        assert!(!shaped.details.contains_key("owns"));
        assert_eq!(shaped.detail_str("name"), Some("Ramen"));

        let value = serde_json::to_value(&shaped).unwrap();
        assert_eq!(value["owns"], false);
        assert_eq!(value["liked"], false);
    }

    #[test]
    fn test_empty_input() {
        assert!(shape(&[], &UserId::new("u1")).is_empty());
    }
}
