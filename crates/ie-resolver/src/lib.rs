//! Entitlement resolution for IAM Identity Center users.
//!
//! Given a user name, [`EntitlementResolver`] finds the user's id, the groups
//! the user belongs to, and every account and application assignment granted
//! to the user or to any of those groups.
//!
//! Remote lookups go through two capability traits so the orchestration can
//! run against the AWS SDK in production and in-memory fakes in tests:
//!
//! - [`DirectoryService`] - Identity Store (users, group memberships)
//! - [`AssignmentService`] - SSO Admin (assignments, permission sets, applications)

use async_trait::async_trait;
use ie_common::Principal;

pub mod error;
pub mod handler;
pub mod resolver;

#[cfg(feature = "aws")]
pub mod aws;

pub use error::ResolveError;
pub use handler::handle_event;
pub use resolver::EntitlementResolver;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// An account assignment as listed by the service, before its permission set
/// has been resolved to a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountAssignmentRef {
    pub account_id: String,
    pub permission_set_arn: String,
}

/// Users and group memberships
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Exact match on the `userName` attribute. `NotFound` if there is no such user.
    async fn user_id_by_user_name(&self, identity_store_id: &str, user_name: &str) -> Result<String>;

    /// Ids of the groups the user is a direct member of, in service order.
    async fn group_ids_for_member(&self, identity_store_id: &str, user_id: &str) -> Result<Vec<String>>;
}

/// Account and application assignments, and the names behind their ARNs
#[async_trait]
pub trait AssignmentService: Send + Sync {
    async fn list_account_assignments(
        &self,
        instance_arn: &str,
        principal: &Principal,
    ) -> Result<Vec<AccountAssignmentRef>>;

    async fn permission_set_name(&self, instance_arn: &str, permission_set_arn: &str) -> Result<String>;

    /// ARNs of the applications assigned to the principal.
    async fn list_application_assignments(
        &self,
        instance_arn: &str,
        principal: &Principal,
    ) -> Result<Vec<String>>;

    async fn application_name(&self, application_arn: &str) -> Result<String>;
}
