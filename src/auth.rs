use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use uuid::Uuid;

use crate::errors::AppError;

/// Minimum accepted password length; shorter passwords are rejected as
/// weak before any remote call.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Fixed provider error vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidEmail,
    UserNotFound,
    WrongPassword,
    EmailAlreadyInUse,
    WeakPassword,
    NetworkFailure,
    RequiresRecentLogin,
    Other,
}

impl AuthErrorCode {
    /// User-facing message for classified codes; `None` means the caller
    /// falls back to the raw provider message.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            AuthErrorCode::InvalidEmail => Some("Invalid email address."),
            AuthErrorCode::UserNotFound => Some("No account found with this email."),
            AuthErrorCode::WrongPassword => Some("Incorrect password."),
            AuthErrorCode::EmailAlreadyInUse => Some("Email already in use."),
            AuthErrorCode::WeakPassword => Some("Password is too weak."),
            AuthErrorCode::NetworkFailure => {
                Some("Network error. Please check your connection.")
            }
            AuthErrorCode::RequiresRecentLogin => {
                Some("Please log out and log back in before retrying this change.")
            }
            AuthErrorCode::Other => None,
        }
    }
}

/// Signed-in identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // user ID
    pub email: String, // sign-in email
    pub exp: usize,    // expiration time
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub recent_auth_window: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret".into(),
            token_ttl: Duration::hours(24),
            recent_auth_window: Duration::minutes(5),
        }
    }
}

impl AuthConfig {
    /// Environment-backed config. `JWT_SECRET` is required; the TTLs fall
    /// back to the defaults.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|e| AppError::EnvError(e.to_string()))?;
        let token_ttl = std::env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Duration::hours)
            .unwrap_or_else(|| Duration::hours(24));
        let recent_auth_window = std::env::var("RECENT_AUTH_WINDOW_SECS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Duration::seconds)
            .unwrap_or_else(|| Duration::minutes(5));

        Ok(Self {
            jwt_secret,
            token_ttl,
            recent_auth_window,
        })
    }
}

pub fn generate_jwt(identity: &Identity, config: &AuthConfig) -> Result<String, AppError> {
    let expiration = (Utc::now() + config.token_ttl).timestamp() as usize;
    let claims = Claims {
        sub: identity.id.to_string(),
        email: identity.email.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::JwtError(e.to_string()))
}

pub fn decode_token(token: &str, config: &AuthConfig) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    Ok(token_data.claims)
}

/// Auth provider boundary. The identity-change receiver yields the
/// current identity and every subsequent sign-in/sign-out transition.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AppError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError>;

    async fn sign_out(&self) -> Result<(), AppError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AppError>;

    fn current_identity(&self) -> Option<Identity>;

    fn identity_changes(&self) -> watch::Receiver<Option<Identity>>;

    async fn update_email(&self, new_email: &str) -> Result<(), AppError>;

    async fn update_password(&self, new_password: &str) -> Result<(), AppError>;

    async fn reauthenticate(&self, password: &str) -> Result<(), AppError>;

    async fn update_display_name(&self, display_name: &str) -> Result<(), AppError>;
}

fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    password: String,
}

/// In-process auth provider with JWT session tokens.
#[derive(Clone)]
pub struct MemoryAuth {
    config: AuthConfig,
    // Keyed by lowercased email
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    session: Arc<watch::Sender<Option<Identity>>>,
    session_token: Arc<Mutex<Option<String>>>,
    last_authenticated: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl MemoryAuth {
    pub fn new(config: AuthConfig) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            config,
            accounts: Arc::new(Mutex::new(HashMap::new())),
            session: Arc::new(session),
            session_token: Arc::new(Mutex::new(None)),
            last_authenticated: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn session_token(&self) -> Option<String> {
        self.session_token.lock().await.clone()
    }

    /// Restore a session from a previously issued token.
    pub async fn restore_session(&self, token: &str) -> Result<Identity, AppError> {
        let claims = decode_token(token, &self.config)?;
        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|e| AppError::Deserialization(e.to_string()))?;

        let identity = {
            let accounts = self.accounts.lock().await;
            accounts
                .values()
                .find(|account| account.identity.id == user_id)
                .map(|account| account.identity.clone())
                .ok_or_else(|| {
                    AppError::auth(AuthErrorCode::UserNotFound, "No account for session token")
                })?
        };

        // A restored session is not a recent authentication; sensitive
        // changes still require reauthenticate
        *self.session_token.lock().await = Some(token.to_string());
        let _ = self.session.send(Some(identity.clone()));
        Ok(identity)
    }

    async fn open_session(&self, identity: Identity) {
        *self.last_authenticated.lock().await = Some(Utc::now());
        let _ = self.session.send(Some(identity));
    }

    fn require_identity(&self) -> Result<Identity, AppError> {
        self.session
            .borrow()
            .clone()
            .ok_or_else(|| AppError::Unauthorized("No authenticated user found".into()))
    }

    async fn require_recent_auth(&self) -> Result<(), AppError> {
        let last = *self.last_authenticated.lock().await;
        match last {
            Some(at) if Utc::now() - at < self.config.recent_auth_window => Ok(()),
            _ => Err(AppError::auth(
                AuthErrorCode::RequiresRecentLogin,
                "Recent authentication required",
            )),
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        if !is_valid_email(email) {
            return Err(AppError::auth(AuthErrorCode::InvalidEmail, "Invalid email"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::auth(
                AuthErrorCode::WeakPassword,
                "Password below minimum length",
            ));
        }

        let key = email.to_lowercase();
        let identity = {
            let mut accounts = self.accounts.lock().await;
            if accounts.contains_key(&key) {
                return Err(AppError::auth(
                    AuthErrorCode::EmailAlreadyInUse,
                    "Email already registered",
                ));
            }

            let identity = Identity {
                id: Uuid::new_v4(),
                email: email.to_string(),
                display_name: None,
            };
            accounts.insert(
                key,
                Account {
                    identity: identity.clone(),
                    password: password.to_string(),
                },
            );
            identity
        };

        let token = generate_jwt(&identity, &self.config)?;
        *self.session_token.lock().await = Some(token);
        self.open_session(identity.clone()).await;

        tracing::info!("Registered account for {}", identity.id);
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        if !is_valid_email(email) {
            return Err(AppError::auth(AuthErrorCode::InvalidEmail, "Invalid email"));
        }

        let identity = {
            let accounts = self.accounts.lock().await;
            let account = accounts.get(&email.to_lowercase()).ok_or_else(|| {
                AppError::auth(AuthErrorCode::UserNotFound, "Unknown account")
            })?;
            if account.password != password {
                return Err(AppError::auth(
                    AuthErrorCode::WrongPassword,
                    "Password mismatch",
                ));
            }
            account.identity.clone()
        };

        let token = generate_jwt(&identity, &self.config)?;
        *self.session_token.lock().await = Some(token);
        self.open_session(identity.clone()).await;

        tracing::debug!("Signed in {}", identity.id);
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        *self.session_token.lock().await = None;
        *self.last_authenticated.lock().await = None;
        let _ = self.session.send(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        let accounts = self.accounts.lock().await;
        if !accounts.contains_key(&email.to_lowercase()) {
            return Err(AppError::auth(
                AuthErrorCode::UserNotFound,
                "Unknown account",
            ));
        }

        // No mail transport in-process; the reset is only recorded
        tracing::info!("Password reset requested for {}", email);
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.session.borrow().clone()
    }

    fn identity_changes(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }

    async fn update_email(&self, new_email: &str) -> Result<(), AppError> {
        let identity = self.require_identity()?;
        if !is_valid_email(new_email) {
            return Err(AppError::auth(AuthErrorCode::InvalidEmail, "Invalid email"));
        }

        let new_key = new_email.to_lowercase();
        let old_key = identity.email.to_lowercase();
        {
            let accounts = self.accounts.lock().await;
            if new_key != old_key && accounts.contains_key(&new_key) {
                return Err(AppError::auth(
                    AuthErrorCode::EmailAlreadyInUse,
                    "Email already registered",
                ));
            }
        }

        self.require_recent_auth().await?;

        let updated = {
            let mut accounts = self.accounts.lock().await;
            let mut account = accounts.remove(&old_key).ok_or_else(|| {
                AppError::auth(AuthErrorCode::UserNotFound, "Unknown account")
            })?;
            account.identity.email = new_email.to_string();
            let updated = account.identity.clone();
            accounts.insert(new_key, account);
            updated
        };

        let _ = self.session.send(Some(updated));
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<(), AppError> {
        let identity = self.require_identity()?;
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::auth(
                AuthErrorCode::WeakPassword,
                "Password below minimum length",
            ));
        }

        self.require_recent_auth().await?;

        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(&identity.email.to_lowercase())
            .ok_or_else(|| AppError::auth(AuthErrorCode::UserNotFound, "Unknown account"))?;
        account.password = new_password.to_string();
        Ok(())
    }

    async fn reauthenticate(&self, password: &str) -> Result<(), AppError> {
        let identity = self.require_identity()?;

        let accounts = self.accounts.lock().await;
        let account = accounts
            .get(&identity.email.to_lowercase())
            .ok_or_else(|| AppError::auth(AuthErrorCode::UserNotFound, "Unknown account"))?;
        if account.password != password {
            return Err(AppError::auth(
                AuthErrorCode::WrongPassword,
                "Password mismatch",
            ));
        }
        drop(accounts);

        *self.last_authenticated.lock().await = Some(Utc::now());
        Ok(())
    }

    async fn update_display_name(&self, display_name: &str) -> Result<(), AppError> {
        let identity = self.require_identity()?;

        let updated = {
            let mut accounts = self.accounts.lock().await;
            let account = accounts
                .get_mut(&identity.email.to_lowercase())
                .ok_or_else(|| AppError::auth(AuthErrorCode::UserNotFound, "Unknown account"))?;
            account.identity.display_name = Some(display_name.to_string());
            account.identity.clone()
        };

        let _ = self.session.send(Some(updated));
        Ok(())
    }
}
