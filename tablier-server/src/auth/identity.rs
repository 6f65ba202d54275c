//! Identity adapter
//!
//! Wraps [`JwtService`] behind a handle that can be reloaded under load
//! (the identity service may rotate its secret without a restart) and
//! resolves the caller's role, falling back to the persisted employee
//! record when the token carries no role claim.

use std::sync::RwLock;

use shared::{AppError, AppResult, Role};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::jwt::{Claims, JwtConfig, JwtError, JwtService};
use crate::db::repository::EmployeeRepository;
use crate::security_log;

/// Authenticated caller context, injected into request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Stable identity-service user id
    pub id: String,
    /// Account email, absent for guests
    pub email: Option<String>,
    /// Resolved role
    pub role: Role,
    /// Guest flag (anonymous tableside caller)
    pub is_guest: bool,
}

impl CurrentUser {
    /// Engine-boundary role check
    ///
    /// Every engine operation calls this itself, so internal callers
    /// cannot bypass the HTTP-layer guards.
    pub fn require_role(&self, allowed: &[Role]) -> AppResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "role {} may not perform this operation",
                self.role
            )))
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn require_staff(&self) -> AppResult<()> {
        self.require_role(&[Role::Server, Role::Chef, Role::Manager])
    }
}

/// Token verification with role resolution
///
/// The inner [`JwtService`] sits behind an `RwLock` so [`reload`]
/// can swap it while requests are in flight.
///
/// [`reload`]: IdentityService::reload
pub struct IdentityService {
    jwt: RwLock<JwtService>,
    db: Surreal<Db>,
}

impl IdentityService {
    pub fn new(config: JwtConfig, db: Surreal<Db>) -> Self {
        Self {
            jwt: RwLock::new(JwtService::with_config(config)),
            db,
        }
    }

    /// Rebuild the verification keys from the environment
    pub fn reload(&self) {
        let service = JwtService::with_config(JwtConfig::from_env());
        if let Ok(mut guard) = self.jwt.write() {
            *guard = service;
            tracing::info!("identity verification keys reloaded");
        }
    }

    /// Verify a bearer token and resolve the caller
    ///
    /// Failed verification always yields `unauthenticated`, whatever the
    /// underlying reason. A claims set without a recognizable role is
    /// resolved against the employee collection by identity id; a caller
    /// with no recognized role at all is denied.
    pub async fn verify(&self, token: &str) -> AppResult<CurrentUser> {
        let claims = {
            let guard = self
                .jwt
                .read()
                .map_err(|_| AppError::internal("identity service lock poisoned"))?;
            guard.validate_token(token).map_err(|e| match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            })?
        };

        self.resolve(claims).await
    }

    async fn resolve(&self, claims: Claims) -> AppResult<CurrentUser> {
        let role = if claims.guest {
            Role::Guest
        } else if let Some(claimed) = claims.role.as_deref() {
            match Role::parse(claimed) {
                Some(role) => role,
                None => {
                    security_log!(
                        "WARN",
                        "unknown_role_claim",
                        user_id = claims.sub.clone(),
                        role = claimed.to_string()
                    );
                    return Err(AppError::forbidden("no recognized role"));
                }
            }
        } else {
            // No role claim: staff tokens from the identity service carry
            // only the subject, the role lives on the employee record.
            let repo = EmployeeRepository::new(self.db.clone());
            match repo.find_by_identity_id(&claims.sub).await {
                Ok(Some(employee)) => employee.role,
                Ok(None) => Role::Client,
                Err(e) => {
                    return Err(AppError::upstream(format!(
                        "employee lookup failed: {}",
                        e
                    )));
                }
            }
        };

        Ok(CurrentUser {
            id: claims.sub,
            email: claims.email,
            role,
            is_guest: claims.guest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: "u-1".to_string(),
            email: None,
            role,
            is_guest: role == Role::Guest,
        }
    }

    #[test]
    fn test_require_role() {
        assert!(user(Role::Chef).require_role(&[Role::Chef]).is_ok());
        assert!(user(Role::Server).require_role(&[Role::Chef]).is_err());
        assert!(
            user(Role::Manager)
                .require_role(&[Role::Server, Role::Manager])
                .is_ok()
        );
    }

    #[test]
    fn test_require_staff() {
        assert!(user(Role::Server).require_staff().is_ok());
        assert!(user(Role::Guest).require_staff().is_err());
        assert!(user(Role::Client).require_staff().is_err());
    }
}
