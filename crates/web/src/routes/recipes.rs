//! Recipe feed, profile and recipe action handlers.
//!
//! The last list rendered to a visitor is kept in their session as a
//! [`RecipeList`] snapshot. Like and delete actions reconcile the API's
//! answer into that snapshot and return it, so the page can update without
//! refetching.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use recipe_finder_core::recipes::{shape, shape_one};
use recipe_finder_core::types::date::format_datetime;
use recipe_finder_core::types::image::is_bucket_url;
use recipe_finder_core::{
    ExtendedRecipe, PaginationQuery, RawPaginationQuery, Recipe, RecipeId, RecipeList,
    normalize_s3_image_url,
};

use super::query_pairs;
use crate::error::AppError;
use crate::gate::{InitialProps, PageProps, PageRedirect, load_initial_props};
use crate::middleware::{OptionalSession, RequireSession};
use crate::models::{AuthSession, session_keys};
use crate::rest::ApiRequest;
use crate::state::AppState;

/// Props key the recipe pages load their data under.
pub const RECIPES_KEY: &str = "recipes";

/// REST resource for the paginated feed.
pub const FEED_RESOURCE: &str = "api/get-recipes";

/// REST resource for the viewer's own recipes.
pub const PROFILE_RESOURCE: &str = "api/profile";

// =============================================================================
// View types
// =============================================================================

/// Recipe display data for templates.
#[derive(Clone, Serialize)]
pub struct RecipeCard {
    pub id: String,
    pub name: String,
    pub image: String,
    pub owner_name: String,
    pub owner_image: String,
    pub like_count: usize,
    pub liked: bool,
    pub owns: bool,
    pub created: Option<String>,
    pub audio: Option<String>,
}

impl From<&ExtendedRecipe> for RecipeCard {
    fn from(recipe: &ExtendedRecipe) -> Self {
        Self {
            id: recipe.id.to_string(),
            name: recipe.detail_str("name").unwrap_or("Untitled recipe").to_string(),
            image: normalize_s3_image_url(recipe.detail_str("imgLink").unwrap_or_default()),
            owner_name: recipe.owner.name.clone(),
            owner_image: normalize_s3_image_url(recipe.owner.image.as_deref().unwrap_or_default()),
            like_count: recipe.like_count(),
            liked: recipe.liked,
            owns: recipe.owns,
            created: recipe.created_at.as_ref().map(format_datetime),
            audio: recipe
                .detail_str("audio")
                .filter(|url| is_bucket_url(url))
                .map(normalize_s3_image_url),
        }
    }
}

/// Recipe list page template.
#[derive(Template, WebTemplate)]
#[template(path = "recipes/index.html")]
pub struct RecipesTemplate {
    pub title: &'static str,
    pub viewer_name: String,
    pub recipes: Vec<RecipeCard>,
    pub notice: Option<&'static str>,
    pub search: String,
    pub sort_option: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

fn page_href(query: &PaginationQuery, page: u32) -> String {
    let mut next = query.clone();
    next.page = page;
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(next.to_query_pairs())
        .finish();
    format!("/home?{encoded}")
}

fn page_redirect(redirect: &PageRedirect) -> Response {
    if redirect.permanent {
        Redirect::permanent(&redirect.destination).into_response()
    } else {
        Redirect::temporary(&redirect.destination).into_response()
    }
}

/// REST address for one page of the feed.
#[must_use]
pub fn feed_resource(query: &PaginationQuery) -> String {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.to_query_pairs())
        .finish();
    format!("{FEED_RESOURCE}?{encoded}")
}

/// Outcome of loading a recipe page.
enum LoadedPage {
    Page(AuthSession, PageProps<RecipeList>),
    Redirect(Response),
}

/// Run the data gate, shape the result for the viewer and remember it.
async fn load_recipes(
    state: &AppState,
    auth: Option<AuthSession>,
    session: &Session,
    resource: &str,
) -> Result<LoadedPage, AppError> {
    let viewer = auth.as_ref().map(|a| a.user_id().clone());

    let gate = load_initial_props::<Vec<Recipe>>(state.api(), auth.as_ref(), resource, RECIPES_KEY)
        .await
        .map(|recipes| {
            viewer.map_or_else(RecipeList::default, |viewer| {
                RecipeList::new(shape(&recipes, &viewer))
            })
        });

    let (props, auth) = match (gate, auth) {
        (InitialProps::Props(props), Some(auth)) => (props, auth),
        (InitialProps::Redirect(redirect), _) => {
            return Ok(LoadedPage::Redirect(page_redirect(&redirect)));
        }
        (InitialProps::Props(_), None) => {
            return Ok(LoadedPage::Redirect(page_redirect(&PageRedirect::signed_out())));
        }
    };

    session.insert(session_keys::RECIPE_LIST, &props.data).await?;

    Ok(LoadedPage::Page(auth, props))
}

fn render_list(
    title: &'static str,
    auth: &AuthSession,
    props: &PageProps<RecipeList>,
    query: Option<&PaginationQuery>,
) -> Response {
    let recipes: Vec<RecipeCard> = props.data.iter().map(RecipeCard::from).collect();

    let (prev_href, next_href) = query.map_or((None, None), |q| {
        let prev = (q.page > 1).then(|| page_href(q, q.page - 1));
        let full_page = u32::try_from(recipes.len()).is_ok_and(|len| len >= q.limit);
        let next = full_page.then(|| page_href(q, q.page.saturating_add(1)));
        (prev, next)
    });

    RecipesTemplate {
        title,
        viewer_name: auth.user.name.clone(),
        notice: props
            .is_recovered()
            .then_some("Recipes could not be loaded right now."),
        search: query.and_then(|q| q.query.clone()).unwrap_or_default(),
        sort_option: query.map(|q| q.sort_option.clone()).unwrap_or_default(),
        recipes,
        prev_href,
        next_href,
    }
    .into_response()
}

// =============================================================================
// Pages
// =============================================================================

/// Display the recipe feed.
///
/// # Route
///
/// `GET /home?page=&limit=&sortOption=&query=`
#[instrument(skip_all)]
pub async fn feed(
    State(state): State<AppState>,
    OptionalSession(auth): OptionalSession,
    session: Session,
    RawQuery(raw): RawQuery,
) -> Result<Response, AppError> {
    let raw = RawPaginationQuery::from_pairs(query_pairs(raw.as_deref()));
    let query = PaginationQuery::normalize(&raw);

    Ok(
        match load_recipes(&state, auth, &session, &feed_resource(&query)).await? {
            LoadedPage::Page(auth, props) => render_list("Recipes", &auth, &props, Some(&query)),
            LoadedPage::Redirect(redirect) => redirect,
        },
    )
}

/// Display the viewer's own recipes.
///
/// # Route
///
/// `GET /profile`
#[instrument(skip_all)]
pub async fn profile(
    State(state): State<AppState>,
    OptionalSession(auth): OptionalSession,
    session: Session,
) -> Result<Response, AppError> {
    Ok(
        match load_recipes(&state, auth, &session, PROFILE_RESOURCE).await? {
            LoadedPage::Page(auth, props) => render_list("Your recipes", &auth, &props, None),
            LoadedPage::Redirect(redirect) => redirect,
        },
    )
}

// =============================================================================
// Actions
// =============================================================================

async fn snapshot(session: &Session) -> Result<RecipeList, AppError> {
    Ok(session
        .get::<RecipeList>(session_keys::RECIPE_LIST)
        .await?
        .unwrap_or_default())
}

/// Toggle the viewer's like on a recipe.
///
/// Returns the updated recipe and the reconciled list.
///
/// # Route
///
/// `POST /recipes/{id}/like`
#[instrument(skip_all)]
pub async fn like(
    State(state): State<AppState>,
    RequireSession(auth): RequireSession,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = RecipeId::new(id);

    let request = ApiRequest::put("api/like-recipe")
        .with_payload(json!({ "recipeId": id }))
        .with_credential(&auth.credential);
    let updated: Recipe = state.api().call(request).await?;
    let updated = shape_one(&updated, auth.user_id());

    let list = snapshot(&session).await?.reconcile(Some(updated.clone()), None);
    session.insert(session_keys::RECIPE_LIST, &list).await?;

    Ok(Json(json!({ "recipe": updated, "recipes": list })))
}

/// Delete one of the viewer's recipes.
///
/// Returns the reconciled list.
///
/// # Route
///
/// `DELETE /recipes/{id}`
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireSession(auth): RequireSession,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = RecipeId::new(id);

    let request = ApiRequest::delete("api/delete-recipe")
        .with_payload(json!({ "recipeId": id }))
        .with_credential(&auth.credential);
    let _: Value = state.api().call(request).await?;

    let list = snapshot(&session).await?.reconcile(None, Some(&id));
    session.insert(session_keys::RECIPE_LIST, &list).await?;

    tracing::info!(recipe_id = %id, user_id = %auth.user_id(), "Recipe deleted");

    Ok(Json(json!({ "recipes": list })))
}
