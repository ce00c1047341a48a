//! Authorization boundary contract
//!
//! The engine itself performs no permission logic; a gateway may plug in an
//! [`Authorizer`] to gate exports on a per-principal basis. When no
//! authorizer is configured the check is skipped entirely, matching the
//! optional-collaborator contract.

use crate::error::{ExportError, Result};

/// Permission-check collaborator.
///
/// Implementations answer whether `principal` may perform `action` on
/// `resource` (for exports: the `find` action on the target collection).
pub trait Authorizer: Send + Sync {
    /// Check a single permission.
    fn is_authorized(&self, principal: &str, resource: &str, action: &str) -> bool;
}

/// Authorizer that grants everything; useful for local tooling and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermitAll;

impl Authorizer for PermitAll {
    fn is_authorized(&self, _principal: &str, _resource: &str, _action: &str) -> bool {
        true
    }
}

/// Run the optional permission check for an export.
///
/// With no authorizer configured the check is skipped. A denial maps to
/// [`ExportError::Unauthorized`], which a gateway reports as 401 before any
/// bytes are written.
///
/// # Arguments
/// * `authorizer` - Optional permission collaborator
/// * `principal` - Requesting identity
/// * `collection` - Target collection
pub fn check_export_permission(
    authorizer: Option<&dyn Authorizer>,
    principal: &str,
    collection: &str,
) -> Result<()> {
    if let Some(authorizer) = authorizer {
        if !authorizer.is_authorized(principal, collection, "find") {
            return Err(ExportError::Unauthorized(format!(
                "{principal} may not find on {collection}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DenyAll;

    impl Authorizer for DenyAll {
        fn is_authorized(&self, _: &str, _: &str, _: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_absent_authorizer_skips_check() {
        assert!(check_export_permission(None, "anon", "pois").is_ok());
    }

    #[test]
    fn test_permit_all() {
        assert!(check_export_permission(Some(&PermitAll), "anon", "pois").is_ok());
    }

    #[test]
    fn test_denial_maps_to_unauthorized() {
        let err = check_export_permission(Some(&DenyAll), "anon", "pois").unwrap_err();
        assert!(matches!(err, ExportError::Unauthorized(_)));
        assert_eq!(crate::request::http_status(&err), 401);
    }
}
