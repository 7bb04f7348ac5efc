use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use snipit_core::AppError;
use snipit_models::{ModelError, snippets::LATEST_LIMIT};
use tracing::{info, instrument};

use crate::form::DecodedForm;
use crate::modules::snippets::model::SnippetCreateForm;
use crate::session::FLASH;
use crate::state::AppState;
use crate::templates::{FormData, PageContext};

#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> Result<Response, AppError> {
    let snippets = state.snippets.latest(LATEST_LIMIT).await?;

    let mut data = page.template_data().await?;
    data.snippets = snippets;
    state.templates.render(StatusCode::OK, "home", &data)
}

#[instrument(skip(state, page))]
pub async fn snippet_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    page: PageContext,
) -> Result<Response, AppError> {
    let id = match id.parse::<i64>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(AppError::not_found(anyhow!("invalid snippet id {id:?}"))),
    };

    let snippet = match state.snippets.get(id).await {
        Ok(snippet) => snippet,
        Err(ModelError::NoRecord) => {
            return Err(AppError::not_found(anyhow!("snippet {id} not found")));
        }
        Err(err) => return Err(err.into()),
    };

    let mut data = page.template_data().await?;
    data.snippet = Some(snippet);
    state.templates.render(StatusCode::OK, "view", &data)
}

#[instrument(skip(state, page))]
pub async fn snippet_create(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Response, AppError> {
    let form = SnippetCreateForm::blank();
    let data = page
        .template_data()
        .await?
        .with_form(FormData::new(&form, Default::default()));
    state.templates.render(StatusCode::OK, "create", &data)
}

#[instrument(skip_all)]
pub async fn snippet_create_post(
    State(state): State<AppState>,
    page: PageContext,
    DecodedForm(form): DecodedForm<SnippetCreateForm>,
) -> Result<Response, AppError> {
    let validator = form.validate();
    if !validator.valid() {
        let data = page
            .template_data()
            .await?
            .with_form(FormData::new(&form, validator));
        return state
            .templates
            .render(StatusCode::UNPROCESSABLE_ENTITY, "create", &data);
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires)
        .await?;
    info!(snippet_id = id, "Snippet created");

    page.session()
        .put(FLASH, &"Snippet successfully created!".to_string())
        .await?;
    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}
