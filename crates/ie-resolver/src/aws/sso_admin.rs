//! SSO Admin assignments

use async_trait::async_trait;
use aws_sdk_ssoadmin::types::PrincipalType;
use aws_sdk_ssoadmin::Client;
use tracing::debug;

use ie_common::{Principal, PrincipalKind};

use super::{classify_sdk_error, missing_field};
use crate::{AccountAssignmentRef, AssignmentService, Result};

/// [`AssignmentService`] backed by the SSO Admin API.
pub struct SsoAdminAssignments {
    client: Client,
}

impl SsoAdminAssignments {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn principal_type(kind: PrincipalKind) -> PrincipalType {
    match kind {
        PrincipalKind::User => PrincipalType::User,
        PrincipalKind::Group => PrincipalType::Group,
    }
}

#[async_trait]
impl AssignmentService for SsoAdminAssignments {
    async fn list_account_assignments(
        &self,
        instance_arn: &str,
        principal: &Principal,
    ) -> Result<Vec<AccountAssignmentRef>> {
        const OPERATION: &str = "ListAccountAssignmentsForPrincipal";
        debug!(%principal, "{}", OPERATION);

        let response = self
            .client
            .list_account_assignments_for_principal()
            .instance_arn(instance_arn)
            .principal_id(&principal.id)
            .principal_type(principal_type(principal.kind))
            .send()
            .await
            .map_err(|e| classify_sdk_error(OPERATION, &principal.to_string(), e))?;

        response
            .account_assignments()
            .iter()
            .map(|assignment| {
                Ok(AccountAssignmentRef {
                    account_id: assignment
                        .account_id()
                        .ok_or_else(|| missing_field(OPERATION, "AccountId"))?
                        .to_string(),
                    permission_set_arn: assignment
                        .permission_set_arn()
                        .ok_or_else(|| missing_field(OPERATION, "PermissionSetArn"))?
                        .to_string(),
                })
            })
            .collect()
    }

    async fn permission_set_name(&self, instance_arn: &str, permission_set_arn: &str) -> Result<String> {
        const OPERATION: &str = "DescribePermissionSet";
        debug!(permission_set_arn, "{}", OPERATION);

        let response = self
            .client
            .describe_permission_set()
            .instance_arn(instance_arn)
            .permission_set_arn(permission_set_arn)
            .send()
            .await
            .map_err(|e| classify_sdk_error(OPERATION, permission_set_arn, e))?;

        response
            .permission_set()
            .and_then(|permission_set| permission_set.name())
            .map(str::to_string)
            .ok_or_else(|| missing_field(OPERATION, "PermissionSet.Name"))
    }

    async fn list_application_assignments(
        &self,
        instance_arn: &str,
        principal: &Principal,
    ) -> Result<Vec<String>> {
        const OPERATION: &str = "ListApplicationAssignmentsForPrincipal";
        debug!(%principal, "{}", OPERATION);

        let response = self
            .client
            .list_application_assignments_for_principal()
            .instance_arn(instance_arn)
            .principal_id(&principal.id)
            .principal_type(principal_type(principal.kind))
            .send()
            .await
            .map_err(|e| classify_sdk_error(OPERATION, &principal.to_string(), e))?;

        response
            .application_assignments()
            .iter()
            .map(|assignment| {
                assignment
                    .application_arn()
                    .map(str::to_string)
                    .ok_or_else(|| missing_field(OPERATION, "ApplicationArn"))
            })
            .collect()
    }

    async fn application_name(&self, application_arn: &str) -> Result<String> {
        const OPERATION: &str = "DescribeApplication";
        debug!(application_arn, "{}", OPERATION);

        let response = self
            .client
            .describe_application()
            .application_arn(application_arn)
            .send()
            .await
            .map_err(|e| classify_sdk_error(OPERATION, application_arn, e))?;

        response
            .name()
            .map(str::to_string)
            .ok_or_else(|| missing_field(OPERATION, "Name"))
    }
}
