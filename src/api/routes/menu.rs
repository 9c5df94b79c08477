//! Menu Routes
//!
//! - GET /api/v1/menu?category= - Items, optionally filtered by category
//! - GET /api/v1/menu/categories - Categories with items
//! - GET /api/v1/menu/:id - A single item

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{MenuCategoriesResponse, MenuQuery, MenuResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::menu::{MenuCategory, MenuItem, MenuItemId};

/// GET /api/v1/menu
pub async fn list_menu(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MenuQuery>,
) -> ApiResult<Json<MenuResponse>> {
    let category = match query.category.as_deref() {
        Some(raw) => MenuCategory::parse_filter(raw).map_err(ApiError::Validation)?,
        None => None,
    };

    let items: Vec<MenuItem> = state.menu.filter(category).into_iter().cloned().collect();

    Ok(Json(MenuResponse {
        category,
        total: items.len(),
        items,
    }))
}

/// GET /api/v1/menu/categories
pub async fn list_categories(State(state): State<Arc<AppState>>) -> Json<MenuCategoriesResponse> {
    Json(MenuCategoriesResponse {
        categories: state.menu.categories(),
    })
}

/// GET /api/v1/menu/:id
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MenuItemId>,
) -> ApiResult<Json<MenuItem>> {
    state
        .menu
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Menu item {} not found", id)))
}
