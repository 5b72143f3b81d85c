//! Recipe records as exchanged with the internal REST API.
//!
//! A [`Recipe`] is what the API returns: the owner and liked-by entries carry
//! whatever user fields the API chose to populate. An [`ExtendedRecipe`] is
//! the view-facing form produced by [`crate::recipes::shape`]: user entries
//! are reduced to [`PublicUser`] and the viewer-relative `owns` / `liked`
//! flags are attached.
//!
//! Domain fields the core does not interpret (ingredients, instructions,
//! nutrition, tags, ...) are kept verbatim in `details` so they survive the
//! round trip through shaping and reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::id::{RecipeId, UserId};

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user as embedded in a raw recipe record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeUser {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Any other user fields (email, provider ids, timestamps, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The public-safe projection of a user: id, display name and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<&RecipeUser> for PublicUser {
    fn from(user: &RecipeUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

/// A recipe as returned by the internal REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: RecipeId,
    pub owner: RecipeUser,
    #[serde(rename = "likedBy", default, deserialize_with = "null_as_default")]
    pub liked_by: Vec<RecipeUser>,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Opaque domain fields.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A recipe annotated for one viewer.
///
/// The flags are derived per viewer per request and are never sent back to
/// the API as authoritative state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedRecipe {
    #[serde(rename = "_id")]
    pub id: RecipeId,
    pub owner: PublicUser,
    #[serde(rename = "likedBy", default, deserialize_with = "null_as_default")]
    pub liked_by: Vec<PublicUser>,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
    /// The viewer is the recipe's owner.
    #[serde(default)]
    pub owns: bool,
    /// The viewer is in the liked-by set.
    #[serde(default)]
    pub liked: bool,
}

impl ExtendedRecipe {
    /// Look up an opaque string field such as `name` or `imgLink`.
    #[must_use]
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }

    /// Number of users who liked the recipe.
    #[must_use]
    pub fn like_count(&self) -> usize {
        self.liked_by.len()
    }
}

/// An ordered list of recipes held as view state.
///
/// The list is only ever changed through [`RecipeList::reconcile`], which
/// produces a new list rather than editing entries in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeList(Vec<ExtendedRecipe>);

impl RecipeList {
    /// Wrap an already-shaped list.
    #[must_use]
    pub const fn new(recipes: Vec<ExtendedRecipe>) -> Self {
        Self(recipes)
    }

    /// Merge a mutation result into the list.
    ///
    /// See [`crate::recipes::reconcile`] for the rules.
    #[must_use]
    pub fn reconcile(&self, updated: Option<ExtendedRecipe>, delete_id: Option<&RecipeId>) -> Self {
        Self(crate::recipes::reconcile(&self.0, updated, delete_id))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ExtendedRecipe] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtendedRecipe> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<ExtendedRecipe> {
        self.0
    }
}

impl From<Vec<ExtendedRecipe>> for RecipeList {
    fn from(recipes: Vec<ExtendedRecipe>) -> Self {
        Self(recipes)
    }
}

impl<'a> IntoIterator for &'a RecipeList {
    type Item = &'a ExtendedRecipe;
    type IntoIter = std::slice::Iter<'a, ExtendedRecipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_keeps_unknown_fields() {
        let raw = json!({
            "_id": "r1",
            "name": "Shakshuka",
            "ingredients": [{"name": "egg", "quantity": "4"}],
            "owner": {"_id": "u1", "name": "Ada", "image": "a.png", "email": "ada@example.com"},
            "likedBy": [],
            "createdAt": "2024-03-05T10:00:00Z"
        });

        let recipe: Recipe = serde_json::from_value(raw).unwrap();
        assert_eq!(recipe.id.as_str(), "r1");
        assert_eq!(recipe.owner.extra.get("email"), Some(&json!("ada@example.com")));
        assert_eq!(recipe.details.get("name"), Some(&json!("Shakshuka")));
        assert!(recipe.details.contains_key("ingredients"));
        assert!(recipe.created_at.is_some());
    }

    #[test]
    fn test_recipe_liked_by_defaults_to_empty() {
        let raw = json!({"_id": "r1", "owner": {"_id": "u1"}});
        let recipe: Recipe = serde_json::from_value(raw).unwrap();
        assert!(recipe.liked_by.is_empty());
        assert_eq!(recipe.owner.name, "");
        assert_eq!(recipe.owner.image, None);
    }

    #[test]
    fn test_null_user_fields_do_not_reject_the_list() {
        let raw = json!([
            {"_id": "r1", "owner": {"name": "Ada"}},
            {
                "_id": "r2",
                "owner": {"_id": "u2", "name": null},
                "likedBy": [{"_id": "u3", "name": null, "image": null}]
            },
            {"_id": "r3", "owner": {"_id": null, "name": "Bo"}, "likedBy": null}
        ]);

        let recipes: Vec<Recipe> = serde_json::from_value(raw).unwrap();
        assert_eq!(recipes.len(), 3);
        assert_eq!(recipes[0].owner.id.as_str(), "");
        assert_eq!(recipes[1].owner.name, "");
        assert_eq!(recipes[1].liked_by[0].name, "");
        assert_eq!(recipes[1].liked_by[0].id.as_str(), "u3");
        assert_eq!(recipes[2].owner.id.as_str(), "");
        assert!(recipes[2].liked_by.is_empty());

        let shaped = crate::recipes::shape(&recipes, &UserId::new("u3"));
        let flags: Vec<_> = shaped.iter().map(|r| (r.owns, r.liked)).collect();
        assert_eq!(flags, vec![(false, false), (false, true), (false, false)]);
    }

    #[test]
    fn test_extended_recipe_accepts_null_names() {
        let raw = json!({
            "_id": "r1",
            "owner": {"_id": "u1", "name": null},
            "likedBy": [{"_id": "u2", "name": null}]
        });
        let recipe: ExtendedRecipe = serde_json::from_value(raw).unwrap();
        assert_eq!(recipe.owner.name, "");
        assert_eq!(recipe.liked_by[0].name, "");
    }

    #[test]
    fn test_extended_recipe_wire_shape() {
        let recipe = ExtendedRecipe {
            id: RecipeId::new("r1"),
            owner: PublicUser {
                id: UserId::new("u1"),
                name: "Ada".to_string(),
                image: None,
            },
            liked_by: vec![],
            created_at: None,
            details: Map::new(),
            owns: true,
            liked: false,
        };

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["_id"], "r1");
        assert_eq!(value["owner"]["_id"], "u1");
        assert_eq!(value["likedBy"], json!([]));
        assert_eq!(value["owns"], true);
        assert_eq!(value["liked"], false);
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn test_detail_str() {
        let raw = json!({
            "_id": "r1",
            "owner": {"_id": "u1"},
            "name": "Dal",
            "servings": 4
        });
        let recipe: ExtendedRecipe = serde_json::from_value(raw).unwrap();
        assert_eq!(recipe.detail_str("name"), Some("Dal"));
        assert_eq!(recipe.detail_str("servings"), None);
        assert_eq!(recipe.detail_str("missing"), None);
    }
}
