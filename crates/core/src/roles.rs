//! Well-known role names and the rules for granting and revoking them.

use crate::error::CoreError;

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_RESTAURANT: &str = "restaurant";
pub const ROLE_ADMIN: &str = "admin";

/// Every role an admin may grant.
pub const ALL_ROLES: &[&str] = &[ROLE_CUSTOMER, ROLE_RESTAURANT, ROLE_ADMIN];

/// Roles a visitor may pick when registering. Admins are provisioned, not self-registered.
pub const SELF_SERVICE_ROLES: &[&str] = &[ROLE_CUSTOMER, ROLE_RESTAURANT];

/// Validate a role chosen at registration.
pub fn validate_self_service_role(role: &str) -> Result<(), String> {
    if SELF_SERVICE_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            SELF_SERVICE_ROLES.join(", ")
        ))
    }
}

fn check_known_role(role: &str) -> Result<(), CoreError> {
    if ALL_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::field(
            "role",
            format!("Unknown role '{role}'. Must be one of: {}", ALL_ROLES.join(", ")),
        ))
    }
}

/// Grant `role`. Holding it already is an error.
pub fn grant_role(roles: &mut Vec<String>, role: &str) -> Result<(), CoreError> {
    check_known_role(role)?;
    if roles.iter().any(|r| r == role) {
        return Err(CoreError::Validation("User already has the role".into()));
    }
    roles.push(role.to_string());
    Ok(())
}

/// Revoke `role`. Every user keeps at least one role.
pub fn revoke_role(roles: &mut Vec<String>, role: &str) -> Result<(), CoreError> {
    check_known_role(role)?;
    let Some(index) = roles.iter().position(|r| r == role) else {
        return Err(CoreError::Validation("User does not have the role".into()));
    };
    if roles.len() == 1 {
        return Err(CoreError::Validation(
            "Cannot remove the only role from a user".into(),
        ));
    }
    roles.remove(index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn customer_and_restaurant_can_self_register() {
        assert!(validate_self_service_role(ROLE_CUSTOMER).is_ok());
        assert!(validate_self_service_role(ROLE_RESTAURANT).is_ok());
    }

    #[test]
    fn admin_cannot_self_register() {
        let err = validate_self_service_role(ROLE_ADMIN).unwrap_err();
        assert!(err.contains("Invalid role"));
    }

    #[test]
    fn granting_appends_once() {
        let mut roles = vec![ROLE_CUSTOMER.to_string()];
        grant_role(&mut roles, ROLE_ADMIN).unwrap();
        assert_eq!(roles, vec!["customer", "admin"]);
        assert_matches!(
            grant_role(&mut roles, ROLE_ADMIN),
            Err(CoreError::Validation(m)) if m == "User already has the role"
        );
        assert_matches!(grant_role(&mut roles, "chef"), Err(CoreError::InvalidFields(_)));
    }

    #[test]
    fn revoking_keeps_at_least_one_role() {
        let mut roles = vec![ROLE_CUSTOMER.to_string(), ROLE_RESTAURANT.to_string()];
        assert_matches!(revoke_role(&mut roles, ROLE_ADMIN), Err(CoreError::Validation(_)));
        revoke_role(&mut roles, ROLE_CUSTOMER).unwrap();
        assert_eq!(roles, vec!["restaurant"]);
        assert_matches!(
            revoke_role(&mut roles, ROLE_RESTAURANT),
            Err(CoreError::Validation(m)) if m == "Cannot remove the only role from a user"
        );
    }
}
