//! Resolver orchestration
//!
//! One invocation runs: user id, the user's own assignments, the user's groups,
//! then each group's assignments. Every invocation accumulates into its own
//! [`AssignmentSet`], so a single resolver can serve concurrent invocations.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info};

use ie_common::{
    AccountAssignment, ApplicationAssignment, AssignmentSet, Principal, ResolutionResult,
    ResolveRequest,
};
use ie_config::ResolverConfig;

use crate::{AssignmentService, DirectoryService, ResolveError, Result};

pub struct EntitlementResolver {
    directory: Arc<dyn DirectoryService>,
    assignments: Arc<dyn AssignmentService>,
    max_concurrent_principals: usize,
}

impl EntitlementResolver {
    pub fn new(directory: Arc<dyn DirectoryService>, assignments: Arc<dyn AssignmentService>) -> Self {
        Self {
            directory,
            assignments,
            max_concurrent_principals: 1,
        }
    }

    /// Allow up to `limit` group principals to be aggregated at once.
    /// Result ordering does not depend on this setting.
    pub fn with_max_concurrent_principals(mut self, limit: usize) -> Self {
        self.max_concurrent_principals = limit.max(1);
        self
    }

    pub fn with_config(self, config: &ResolverConfig) -> Self {
        self.with_max_concurrent_principals(config.max_concurrent_principals)
    }

    pub(crate) fn max_concurrent_principals(&self) -> usize {
        self.max_concurrent_principals
    }

    /// Resolve everything the requested user is entitled to.
    ///
    /// Any failed lookup aborts the whole resolution; no partial result is returned.
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<ResolutionResult> {
        let user_id = self
            .resolve_principal_id(&request.identity_store_id, &request.user_name)
            .await?;

        let mut assignments = self
            .aggregate_principal(&request.instance_arn, &Principal::user(&user_id))
            .await?;

        let group_ids = self
            .resolve_group_ids(&request.identity_store_id, &user_id)
            .await?;

        let instance_arn = request.instance_arn.as_str();
        let group_sets: Vec<AssignmentSet> = stream::iter(group_ids.iter().cloned().map(Principal::group))
            .map(|principal| async move { self.aggregate_principal(instance_arn, &principal).await })
            .buffered(self.max_concurrent_principals())
            .try_collect()
            .await?;

        for set in group_sets {
            assignments.merge(set);
        }

        info!(
            user_id = %user_id,
            groups = group_ids.len(),
            max_concurrent_principals = self.max_concurrent_principals(),
            account_assignments = assignments.accounts.len(),
            application_assignments = assignments.applications.len(),
            "Resolved entitlements"
        );

        Ok(ResolutionResult::new(user_id, group_ids, assignments))
    }

    /// Look up the user id for `user_name`.
    pub async fn resolve_principal_id(&self, identity_store_id: &str, user_name: &str) -> Result<String> {
        debug!(identity_store_id, user_name, "Resolving user id");

        let user_id = self
            .directory
            .user_id_by_user_name(identity_store_id, user_name)
            .await?;

        if user_id.is_empty() {
            return Err(ResolveError::NotFound(format!("user {}", user_name)));
        }
        Ok(user_id)
    }

    /// Groups the user is a direct member of.
    pub async fn resolve_group_ids(&self, identity_store_id: &str, user_id: &str) -> Result<Vec<String>> {
        let group_ids = self
            .directory
            .group_ids_for_member(identity_store_id, user_id)
            .await?;

        debug!(user_id, groups = group_ids.len(), "Resolved group memberships");
        Ok(group_ids)
    }

    /// Account and application assignments held by one principal.
    pub async fn aggregate_principal(&self, instance_arn: &str, principal: &Principal) -> Result<AssignmentSet> {
        let mut set = AssignmentSet::new();
        self.append_account_assignments(instance_arn, principal, &mut set).await?;
        self.append_application_assignments(instance_arn, principal, &mut set).await?;

        debug!(
            %principal,
            account_assignments = set.accounts.len(),
            application_assignments = set.applications.len(),
            "Aggregated principal"
        );
        Ok(set)
    }

    pub async fn append_account_assignments(
        &self,
        instance_arn: &str,
        principal: &Principal,
        set: &mut AssignmentSet,
    ) -> Result<()> {
        let listed = self
            .assignments
            .list_account_assignments(instance_arn, principal)
            .await?;

        for assignment in listed {
            let permission_set_name = self
                .resolve_permission_set_name(instance_arn, &assignment.permission_set_arn)
                .await?;
            set.accounts.push(AccountAssignment {
                account_id: assignment.account_id,
                permission_set_name,
            });
        }
        Ok(())
    }

    pub async fn append_application_assignments(
        &self,
        instance_arn: &str,
        principal: &Principal,
        set: &mut AssignmentSet,
    ) -> Result<()> {
        let application_arns = self
            .assignments
            .list_application_assignments(instance_arn, principal)
            .await?;

        for application_arn in application_arns {
            let application_name = self.resolve_application_name(&application_arn).await?;
            set.applications.push(ApplicationAssignment { application_name });
        }
        Ok(())
    }

    pub async fn resolve_permission_set_name(&self, instance_arn: &str, permission_set_arn: &str) -> Result<String> {
        self.assignments
            .permission_set_name(instance_arn, permission_set_arn)
            .await
    }

    pub async fn resolve_application_name(&self, application_arn: &str) -> Result<String> {
        self.assignments.application_name(application_arn).await
    }
}

#[cfg(feature = "aws")]
impl EntitlementResolver {
    /// Resolver backed by the Identity Store and SSO Admin APIs.
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, config: &ResolverConfig) -> Self {
        let directory = Arc::new(crate::aws::IdentityStoreDirectory::new(
            aws_sdk_identitystore::Client::new(sdk_config),
        ));
        let assignments = Arc::new(crate::aws::SsoAdminAssignments::new(
            aws_sdk_ssoadmin::Client::new(sdk_config),
        ));

        Self::new(directory, assignments).with_config(config)
    }
}
