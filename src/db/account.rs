use crate::{
    auth::{AuthProvider, Identity, MIN_PASSWORD_LEN},
    errors::AppError,
    state::{AuthClient, StoreClient},
};

/// Create an account and its profile document in one step.
pub async fn register_account(
    email: &str,
    password: &str,
    display_name: &str,
    first_name: &str,
    last_name: &str,
    auth: &AuthClient,
    store: &StoreClient,
) -> Result<Identity, AppError> {
    let identity = auth.sign_up(email, password).await?;

    let display_name = display_name.trim();
    if !display_name.is_empty() {
        auth.update_display_name(display_name).await?;
    }

    super::user::post::create_user_profile(
        &identity,
        display_name,
        first_name.trim(),
        last_name.trim(),
        store,
    )
    .await?;

    Ok(auth.current_identity().unwrap_or(identity))
}

/// Update the signed-in user's display name.
pub async fn update_display_name(new_name: &str, auth: &AuthClient) -> Result<(), AppError> {
    if new_name.trim().is_empty() {
        return Err(AppError::Validation("Username cannot be empty".into()));
    }

    auth.update_display_name(new_name.trim()).await
}

/// Update the sign-in email.
pub async fn update_email(new_email: &str, auth: &AuthClient) -> Result<(), AppError> {
    if new_email.trim().is_empty() {
        return Err(AppError::Validation("Email cannot be empty".into()));
    }

    auth.update_email(new_email.trim()).await
}

/// Change the password. Every local check runs before any provider call
/// is made.
pub async fn update_password(
    current: &str,
    new: &str,
    confirm: &str,
    auth: &AuthClient,
) -> Result<(), AppError> {
    if current.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err(AppError::Validation(
            "All password fields are required".into(),
        ));
    }
    if new != confirm {
        return Err(AppError::Validation("New passwords do not match!".into()));
    }
    if new.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    auth.reauthenticate(current).await?;
    auth.update_password(new).await
}
