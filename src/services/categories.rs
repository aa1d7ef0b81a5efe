use uuid::Uuid;

use super::{logged, Resource};
use crate::api::{categories, ApiClient};
use crate::error::ApiError;
use crate::models::{Category, CategoryPatch, NewCategory};

pub struct CategoriesService;

impl Resource for CategoriesService {
    type Entity = Category;
    type New = NewCategory;

    const LABEL: &'static str = "categories";

    async fn fetch_all(client: &ApiClient) -> Result<Vec<Category>, ApiError> {
        logged(categories::get_categories(client).await, "fetching categories")
    }

    async fn create(client: &ApiClient, data: &NewCategory) -> Result<Category, ApiError> {
        logged(categories::create_category(client, data).await, "creating category")
    }

    async fn update(client: &ApiClient, id: Uuid, patch: &CategoryPatch) -> Result<(), ApiError> {
        logged(categories::update_category(client, id, patch).await, "updating category")
    }

    async fn delete(client: &ApiClient, id: Uuid) -> Result<(), ApiError> {
        logged(categories::delete_category(client, id).await, "deleting category")
    }
}
