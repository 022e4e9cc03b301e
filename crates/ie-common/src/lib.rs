//! Shared data model for entitlement resolution.
//!
//! Wire names follow the Identity Center conventions (`PascalCase` keys in the
//! response body, `USER`/`GROUP` principal kinds) so the serialized result can
//! be handed straight back to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod logging;

// ============================================================================
// Principals
// ============================================================================

/// Kind of principal an assignment can be granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    User,
    Group,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::User => "USER",
            PrincipalKind::Group => "GROUP",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user or group identity that can hold access grants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub id: String,
    pub kind: PrincipalKind,
}

impl Principal {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: PrincipalKind::User,
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: PrincipalKind::Group,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

// ============================================================================
// Assignments
// ============================================================================

/// A permission set granted to a principal on one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountAssignment {
    pub account_id: String,
    pub permission_set_name: String,
}

/// Access to one application granted to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationAssignment {
    pub application_name: String,
}

/// Assignments collected for one or more principals.
///
/// Records are kept in the order they were appended and never deduplicated:
/// the same grant reached through two principals shows up twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentSet {
    pub accounts: Vec<AccountAssignment>,
    pub applications: Vec<ApplicationAssignment>,
}

impl AssignmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move every record of `other` to the end of this set.
    pub fn merge(&mut self, other: AssignmentSet) {
        self.accounts.extend(other.accounts);
        self.applications.extend(other.applications);
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.applications.is_empty()
    }
}

// ============================================================================
// Invocation Types
// ============================================================================

/// Invocation event: which user to resolve, and where.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolveRequest {
    #[serde(rename = "IdStoreId")]
    pub identity_store_id: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "InstanceArn")]
    pub instance_arn: String,
}

impl ResolveRequest {
    pub fn new(
        identity_store_id: impl Into<String>,
        user_name: impl Into<String>,
        instance_arn: impl Into<String>,
    ) -> Self {
        Self {
            identity_store_id: identity_store_id.into(),
            user_name: user_name.into(),
            instance_arn: instance_arn.into(),
        }
    }

    /// Wire name of the first field that is empty, if any.
    pub fn first_empty_field(&self) -> Option<&'static str> {
        if self.identity_store_id.trim().is_empty() {
            Some("IdStoreId")
        } else if self.user_name.trim().is_empty() {
            Some("UserName")
        } else if self.instance_arn.trim().is_empty() {
            Some("InstanceArn")
        } else {
            None
        }
    }
}

/// Everything a user is entitled to, directly or through group membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolutionResult {
    pub user_id: String,
    pub group_ids: Vec<String>,
    pub account_assignments: Vec<AccountAssignment>,
    pub application_assignments: Vec<ApplicationAssignment>,
}

impl ResolutionResult {
    pub fn new(user_id: String, group_ids: Vec<String>, assignments: AssignmentSet) -> Self {
        Self {
            user_id,
            group_ids,
            account_assignments: assignments.accounts,
            application_assignments: assignments.applications,
        }
    }
}

/// Proxy-style response envelope with a JSON-encoded body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn ok(result: &ResolutionResult) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(result)?,
        })
    }
}
