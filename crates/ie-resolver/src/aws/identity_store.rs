//! Identity Store directory

use async_trait::async_trait;
use aws_sdk_identitystore::types::{AlternateIdentifier, MemberId, UniqueAttribute};
use aws_sdk_identitystore::Client;
use aws_smithy_types::Document;
use tracing::debug;

use super::{classify_sdk_error, missing_field};
use crate::{DirectoryService, ResolveError, Result};

/// Attribute users are matched on.
const USER_NAME_ATTRIBUTE: &str = "userName";

/// [`DirectoryService`] backed by the Identity Store API.
pub struct IdentityStoreDirectory {
    client: Client,
}

impl IdentityStoreDirectory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectoryService for IdentityStoreDirectory {
    async fn user_id_by_user_name(&self, identity_store_id: &str, user_name: &str) -> Result<String> {
        debug!(identity_store_id, user_name, "GetUserId");

        let attribute = UniqueAttribute::builder()
            .attribute_path(USER_NAME_ATTRIBUTE)
            .attribute_value(Document::String(user_name.to_string()))
            .build()
            .map_err(|e| ResolveError::InvalidRequest(format!("Invalid user lookup: {}", e)))?;

        let response = self
            .client
            .get_user_id()
            .identity_store_id(identity_store_id)
            .alternate_identifier(AlternateIdentifier::UniqueAttribute(attribute))
            .send()
            .await
            .map_err(|e| classify_sdk_error("GetUserId", &format!("user {}", user_name), e))?;

        Ok(response.user_id().to_string())
    }

    async fn group_ids_for_member(&self, identity_store_id: &str, user_id: &str) -> Result<Vec<String>> {
        debug!(identity_store_id, user_id, "ListGroupMembershipsForMember");

        let response = self
            .client
            .list_group_memberships_for_member()
            .identity_store_id(identity_store_id)
            .member_id(MemberId::UserId(user_id.to_string()))
            .send()
            .await
            .map_err(|e| {
                classify_sdk_error("ListGroupMembershipsForMember", &format!("user {}", user_id), e)
            })?;

        response
            .group_memberships()
            .iter()
            .map(|membership| {
                membership
                    .group_id()
                    .map(str::to_string)
                    .ok_or_else(|| missing_field("ListGroupMembershipsForMember", "GroupId"))
            })
            .collect()
    }
}
