use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::{CookieJar, Form};
use chrono::Utc;

use crate::http_server::{
    error::{AppError, AppResult},
    flash,
    forms::{ArtistForm, SearchForm},
    http_routes::EntityId,
    state::AppState,
    views,
};
use crate::services::{ServiceError, ServiceResult};

pub async fn artists(State(app_state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let artists = app_state.artists().list().await?;
    Ok(Html(views::artists::list(&artists)))
}

pub async fn search_artists(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> AppResult<Html<String>> {
    let results = app_state
        .artists()
        .search(&form.search_term, Utc::now())
        .await?;
    Ok(Html(views::artists::search_results(&form.search_term, &results)))
}

pub async fn show_artist(
    State(app_state): State<Arc<AppState>>,
    EntityId(artist_id): EntityId,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let artist = app_state
        .artists()
        .get_detail(artist_id, Utc::now())
        .await?
        .ok_or(AppError::NotFound)?;

    let (jar, message) = flash::take(jar);
    Ok((jar, Html(views::artists::detail(&artist, message.as_deref()))))
}

pub async fn create_artist_form() -> Html<String> {
    Html(views::artists::form(None))
}

pub async fn create_artist_submission(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<ArtistForm>,
) -> Html<String> {
    let name = form.display_name().to_string();
    let result: ServiceResult<_> = async {
        let input = form.into_input()?;
        app_state.artists().create(input).await
    }
    .await;

    let notice = match result {
        Ok(_) => format!("Artist {name} was successfully listed!"),
        Err(e) => {
            log::error!("Failed to create artist {}: {}", name, e);
            format!("An error occurred. Artist {name} could not be listed.")
        }
    };
    Html(views::home(Some(&notice)))
}

pub async fn edit_artist(
    State(app_state): State<Arc<AppState>>,
    EntityId(artist_id): EntityId,
) -> AppResult<Html<String>> {
    let artist = app_state
        .artists()
        .get(artist_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Html(views::artists::form(Some(&artist))))
}

pub async fn edit_artist_submission(
    State(app_state): State<Arc<AppState>>,
    EntityId(artist_id): EntityId,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> (CookieJar, Redirect) {
    let name = form.display_name().to_string();
    let result: ServiceResult<_> = async {
        let input = form.into_input()?;
        app_state.artists().update(artist_id, input).await
    }
    .await;

    // A missing row has no detail page to carry the notice
    let (notice, target) = match result {
        Ok(_) => (
            format!("Artist {name} was successfully updated!"),
            format!("/artists/{artist_id}"),
        ),
        Err(e) => {
            log::error!("Failed to update artist {}: {}", artist_id, e);
            let target = match e {
                ServiceError::NotFound { .. } => "/".to_string(),
                _ => format!("/artists/{artist_id}"),
            };
            (
                format!("An error occurred. Artist {name} could not be updated."),
                target,
            )
        }
    };
    (flash::set(jar, &notice), Redirect::to(&target))
}

pub async fn delete_artist(
    State(app_state): State<Arc<AppState>>,
    EntityId(artist_id): EntityId,
) -> StatusCode {
    if let Err(e) = app_state.artists().delete(artist_id).await {
        log::error!("Failed to delete artist {}: {}", artist_id, e);
    }
    StatusCode::NO_CONTENT
}
