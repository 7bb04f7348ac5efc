use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use snipit_core::{AppError, Validator};
use snipit_models::ModelError;
use tracing::{info, instrument, warn};

use crate::form::DecodedForm;
use crate::middleware::auth::{CurrentUser, LOGIN_PATH};
use crate::modules::users::model::{PasswordUpdateForm, UserLoginForm, UserSignupForm};
use crate::session::{AUTHENTICATED_USER_ID, FLASH, REDIRECT_AFTER_LOGIN};
use crate::state::AppState;
use crate::templates::{FormData, PageContext};

const DEFAULT_AFTER_LOGIN: &str = "/snippet/create";

/// Only same-origin absolute paths are followed after login.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

#[instrument(skip(state, page))]
pub async fn user_signup(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Response, AppError> {
    let data = page
        .template_data()
        .await?
        .with_form(FormData::new(&UserSignupForm::default(), Validator::default()));
    state.templates.render(StatusCode::OK, "signup", &data)
}

#[instrument(skip_all)]
pub async fn user_signup_post(
    State(state): State<AppState>,
    page: PageContext,
    DecodedForm(form): DecodedForm<UserSignupForm>,
) -> Result<Response, AppError> {
    let mut validator = form.validate();

    if validator.valid() {
        match state.users.insert(&form.name, &form.email, &form.password).await {
            Ok(()) => {
                info!("User signed up");
                page.session()
                    .put(FLASH, &"Your signup was successful. Please log in.".to_string())
                    .await?;
                return Ok(Redirect::to(LOGIN_PATH).into_response());
            }
            Err(ModelError::DuplicateEmail) => {
                validator.add_field_error("email", "Email address is already in use");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let data = page
        .template_data()
        .await?
        .with_form(FormData::new(&form, validator));
    state
        .templates
        .render(StatusCode::UNPROCESSABLE_ENTITY, "signup", &data)
}

#[instrument(skip(state, page))]
pub async fn user_login(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Response, AppError> {
    let data = page
        .template_data()
        .await?
        .with_form(FormData::new(&UserLoginForm::default(), Validator::default()));
    state.templates.render(StatusCode::OK, "login", &data)
}

#[instrument(skip_all)]
pub async fn user_login_post(
    State(state): State<AppState>,
    page: PageContext,
    DecodedForm(form): DecodedForm<UserLoginForm>,
) -> Result<Response, AppError> {
    let mut validator = form.validate();

    if validator.valid() {
        match state.users.authenticate(&form.email, &form.password).await {
            Ok(user_id) => {
                let session = page.session();
                session.renew_token().await?;
                session.put(AUTHENTICATED_USER_ID, &user_id).await?;
                info!(user_id, "User logged in");

                let target = session
                    .pop(REDIRECT_AFTER_LOGIN)
                    .await?
                    .filter(|path| is_local_path(path))
                    .unwrap_or_else(|| DEFAULT_AFTER_LOGIN.to_string());
                return Ok(Redirect::to(&target).into_response());
            }
            Err(ModelError::InvalidCredentials) => {
                validator.add_non_field_error("Email or password is incorrect");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let data = page
        .template_data()
        .await?
        .with_form(FormData::new(&form, validator));
    state
        .templates
        .render(StatusCode::UNPROCESSABLE_ENTITY, "login", &data)
}

#[instrument(skip(page))]
pub async fn user_logout_post(
    CurrentUser(user_id): CurrentUser,
    page: PageContext,
) -> Result<Response, AppError> {
    let session = page.session();
    session.renew_token().await?;
    session.remove(AUTHENTICATED_USER_ID).await?;
    session
        .put(FLASH, &"You've been logged out successfully!".to_string())
        .await?;
    info!(user_id, "User logged out");

    Ok(Redirect::to("/").into_response())
}

#[instrument(skip(state, page))]
pub async fn account_view(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    page: PageContext,
) -> Result<Response, AppError> {
    let user = match state.users.get(user_id).await {
        Ok(user) => user,
        Err(ModelError::NoRecord) => {
            page.session().remove(AUTHENTICATED_USER_ID).await?;
            return Ok(Redirect::to(LOGIN_PATH).into_response());
        }
        Err(err) => return Err(err.into()),
    };

    let mut data = page.template_data().await?;
    data.user = Some(user);
    state.templates.render(StatusCode::OK, "account", &data)
}

#[instrument(skip(state, page))]
pub async fn account_password_update(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Response, AppError> {
    let data = page
        .template_data()
        .await?
        .with_form(FormData::new(&PasswordUpdateForm::default(), Validator::default()));
    state.templates.render(StatusCode::OK, "password", &data)
}

#[instrument(skip_all)]
pub async fn account_password_update_post(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    page: PageContext,
    DecodedForm(form): DecodedForm<PasswordUpdateForm>,
) -> Result<Response, AppError> {
    let mut validator = form.validate();

    if validator.valid() {
        match state
            .users
            .change_password(user_id, &form.current_password, &form.new_password)
            .await
        {
            Ok(()) => {
                info!(user_id, "Password changed");
                page.session()
                    .put(FLASH, &"Your password has been updated!".to_string())
                    .await?;
                return Ok(Redirect::to("/account/view").into_response());
            }
            Err(ModelError::InvalidCredentials) => {
                validator.add_non_field_error("Current password is incorrect");
            }
            Err(ModelError::NoRecord) => {
                warn!(user_id, "Password change for a missing user");
                page.session().remove(AUTHENTICATED_USER_ID).await?;
                return Ok(Redirect::to(LOGIN_PATH).into_response());
            }
            Err(err) => return Err(err.into()),
        }
    }

    let data = page
        .template_data()
        .await?
        .with_form(FormData::new(&form, validator));
    state
        .templates
        .render(StatusCode::UNPROCESSABLE_ENTITY, "password", &data)
}
