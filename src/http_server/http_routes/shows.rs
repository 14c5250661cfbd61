use std::sync::Arc;

use axum::{extract::State, response::Html};
use axum_extra::extract::Form;

use crate::http_server::{error::AppResult, forms::ShowForm, state::AppState, views};
use crate::services::ServiceResult;

pub async fn shows(State(app_state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let shows = app_state.shows().list().await?;
    Ok(Html(views::shows::list(&shows)))
}

pub async fn create_show_form(State(app_state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let artists = app_state.artists().choices().await?;
    let venues = app_state.venues().choices().await?;
    Ok(Html(views::shows::form(&artists, &venues)))
}

pub async fn create_show_submission(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<ShowForm>,
) -> Html<String> {
    let result: ServiceResult<_> = async {
        let input = form.into_input()?;
        app_state.shows().create(input).await
    }
    .await;

    let notice = match result {
        Ok(_) => "Show was successfully listed!",
        Err(e) => {
            log::error!("Failed to create show: {}", e);
            "An error occurred. Show could not be listed."
        }
    };
    Html(views::home(Some(notice)))
}
