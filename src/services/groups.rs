use uuid::Uuid;

use super::{logged, Resource};
use crate::api::{groups, ApiClient};
use crate::error::ApiError;
use crate::models::{Group, GroupPatch, NewGroup};

pub struct GroupsService;

impl Resource for GroupsService {
    type Entity = Group;
    type New = NewGroup;

    const LABEL: &'static str = "groups";

    async fn fetch_all(client: &ApiClient) -> Result<Vec<Group>, ApiError> {
        logged(groups::get_groups(client).await, "fetching groups")
    }

    async fn create(client: &ApiClient, data: &NewGroup) -> Result<Group, ApiError> {
        logged(groups::create_group(client, data).await, "creating group")
    }

    async fn update(client: &ApiClient, id: Uuid, patch: &GroupPatch) -> Result<(), ApiError> {
        logged(groups::update_group(client, id, patch).await, "updating group")
    }

    async fn delete(client: &ApiClient, id: Uuid) -> Result<(), ApiError> {
        logged(groups::delete_group(client, id).await, "deleting group")
    }
}
