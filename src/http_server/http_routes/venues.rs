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
    forms::{SearchForm, VenueForm},
    http_routes::EntityId,
    state::AppState,
    views,
};
use crate::services::{ServiceError, ServiceResult};

pub async fn venues(State(app_state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let areas = app_state.venues().list_by_area(Utc::now()).await?;
    Ok(Html(views::venues::list(&areas)))
}

pub async fn search_venues(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> AppResult<Html<String>> {
    let results = app_state
        .venues()
        .search(&form.search_term, Utc::now())
        .await?;
    Ok(Html(views::venues::search_results(&form.search_term, &results)))
}

pub async fn show_venue(
    State(app_state): State<Arc<AppState>>,
    EntityId(venue_id): EntityId,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let venue = app_state
        .venues()
        .get_detail(venue_id, Utc::now())
        .await?
        .ok_or(AppError::NotFound)?;

    let (jar, message) = flash::take(jar);
    Ok((jar, Html(views::venues::detail(&venue, message.as_deref()))))
}

pub async fn create_venue_form() -> Html<String> {
    Html(views::venues::form(None))
}

pub async fn create_venue_submission(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<VenueForm>,
) -> Html<String> {
    let name = form.display_name().to_string();
    let result: ServiceResult<_> = async {
        let input = form.into_input()?;
        app_state.venues().create(input).await
    }
    .await;

    let notice = match result {
        Ok(_) => format!("Venue {name} was successfully listed!"),
        Err(e) => {
            log::error!("Failed to create venue {}: {}", name, e);
            format!("An error occurred. Venue {name} could not be listed.")
        }
    };
    Html(views::home(Some(&notice)))
}

pub async fn edit_venue(
    State(app_state): State<Arc<AppState>>,
    EntityId(venue_id): EntityId,
) -> AppResult<Html<String>> {
    let venue = app_state
        .venues()
        .get(venue_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Html(views::venues::form(Some(&venue))))
}

pub async fn edit_venue_submission(
    State(app_state): State<Arc<AppState>>,
    EntityId(venue_id): EntityId,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> (CookieJar, Redirect) {
    let name = form.display_name().to_string();
    let result: ServiceResult<_> = async {
        let input = form.into_input()?;
        app_state.venues().update(venue_id, input).await
    }
    .await;

    // A missing row has no detail page to carry the notice
    let (notice, target) = match result {
        Ok(_) => (
            format!("Venue {name} was successfully updated!"),
            format!("/venues/{venue_id}"),
        ),
        Err(e) => {
            log::error!("Failed to update venue {}: {}", venue_id, e);
            let target = match e {
                ServiceError::NotFound { .. } => "/".to_string(),
                _ => format!("/venues/{venue_id}"),
            };
            (
                format!("An error occurred. Venue {name} could not be updated."),
                target,
            )
        }
    };
    (flash::set(jar, &notice), Redirect::to(&target))
}

pub async fn delete_venue(
    State(app_state): State<Arc<AppState>>,
    EntityId(venue_id): EntityId,
) -> StatusCode {
    if let Err(e) = app_state.venues().delete(venue_id).await {
        log::error!("Failed to delete venue {}: {}", venue_id, e);
    }
    StatusCode::NO_CONTENT
}
