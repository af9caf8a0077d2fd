// Authentication service - business logic layer

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, LoginRequest, NewUser, RegisterRequest, UserView},
    password::PasswordService,
    repository::UserStore,
    token::TokenCodec,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::validate_email;

/// Authentication service coordinating the credential store and token codec.
///
/// Every call is independent; the service holds no per-request state, so
/// concurrent callers need no coordination beyond the store's own
/// uniqueness guarantee on `create`.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenCodec) -> Self {
        Self { store, tokens }
    }

    /// Register a new user and issue a bearer token.
    ///
    /// Validation runs before the store is touched: required fields, email
    /// syntax, then password strength. `DuplicateEmail` comes from the
    /// store's uniqueness constraint, not a pre-check.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        require_field("firstName", &request.first_name)?;
        require_field("lastName", &request.last_name)?;
        require_field("email", &request.email)?;
        require_field("phone", &request.phone)?;
        require_field("password", &request.password)?;

        if !validate_email(request.email.as_str()) {
            return Err(AuthError::InvalidEmail);
        }
        PasswordService::validate_strength(&request.password)?;

        let password_hash = PasswordService::hash_password(&request.password)?;
        let user = self
            .store
            .create(NewUser {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                phone: request.phone,
                password_hash,
                newsletter_opt_in: request.newsletter_opt_in,
            })
            .await?;

        info!("Registered user {}", user.id);
        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Log a user in and issue a fresh bearer token.
    ///
    /// Unknown email and wrong password produce the same
    /// `InvalidCredentials` so callers cannot enumerate accounts.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        require_field("email", &request.email)?;
        require_field("password", &request.password)?;

        let user = match self.store.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                debug!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            debug!("Password mismatch for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);
        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Resolve a bearer token to the user it authenticates.
    ///
    /// Any verification failure collapses to `Unauthorized` outward; the
    /// fine-grained reason is only logged.
    pub async fn profile(&self, bearer: Option<&str>) -> Result<UserView, AuthError> {
        let token = bearer.ok_or(AuthError::MissingToken)?;

        let claims = self.tokens.verify(token).map_err(|e| {
            warn!("Token verification failed: {}", e);
            AuthError::Unauthorized
        })?;

        let user = self
            .store
            .find_by_id(claims.subject_user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.into())
    }

    /// Logout is a server-side no-op: tokens are stateless and there is no
    /// revocation list, so a token remains usable until it expires and
    /// clients simply discard their copy. Known limitation.
    pub fn logout(&self) {
        debug!("Logout requested (stateless tokens, nothing to revoke)");
    }
}

fn require_field(name: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingField(name.to_string()));
    }
    Ok(())
}
