use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use tracing::instrument;

use crate::aggregation::{EntitySummary, count_upcoming_by, format_start_time, partition_shows};
use crate::database::Database;
use crate::entities::{self, StringVec};
use crate::services::{SearchResults, ServiceError, ServiceResult, name_matches};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistInput {
    fn apply(self, artist: &mut entities::artist::ActiveModel) {
        artist.name = Set(self.name);
        artist.city = Set(self.city);
        artist.state = Set(self.state);
        artist.phone = Set(self.phone);
        artist.website = Set(self.website);
        artist.genres = Set(if self.genres.is_empty() {
            None
        } else {
            Some(StringVec(self.genres))
        });
        artist.facebook_link = Set(self.facebook_link);
        artist.image_link = Set(self.image_link);
        artist.seeking_venue = Set(self.seeking_venue);
        artist.seeking_description = Set(self.seeking_description);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistEntry {
    pub id: i64,
    pub name: String,
}

/// A venue the artist plays at, as shown on the artist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueAppearance {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub seeking_venue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeking_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub upcoming_shows: Vec<VenueAppearance>,
    pub upcoming_shows_count: usize,
    pub past_shows: Vec<VenueAppearance>,
    pub past_shows_count: usize,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<ArtistEntry>> {
        let artists = entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Id)
            .all(&self.db.conn)
            .await?;

        Ok(artists
            .into_iter()
            .map(|a| ArtistEntry {
                id: a.id,
                name: a.name,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn search(&self, term: &str, now: DateTime<Utc>) -> ServiceResult<SearchResults> {
        // SQLite's LIKE only folds ASCII, so names are matched here
        let artists: Vec<entities::artist::Model> = entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Id)
            .all(&self.db.conn)
            .await?
            .into_iter()
            .filter(|artist| name_matches(&artist.name, term))
            .collect();

        let ids: Vec<i64> = artists.iter().map(|a| a.id).collect();
        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.is_in(ids))
            .all(&self.db.conn)
            .await?;
        let counts = count_upcoming_by(shows.iter().map(|s| (s.artist_id, s.start_time)), now);

        let data: Vec<EntitySummary> = artists
            .into_iter()
            .map(|artist| EntitySummary {
                id: artist.id,
                num_upcoming_shows: counts.get(&artist.id).copied().unwrap_or(0),
                name: artist.name,
            })
            .collect();

        Ok(data.into())
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Option<entities::artist::Model>> {
        Ok(entities::artist::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_detail(&self, id: i64, now: DateTime<Utc>) -> ServiceResult<Option<ArtistDetail>> {
        let Some(artist) = self.get(id).await? else {
            return Ok(None);
        };

        let shows = artist
            .find_related(entities::show::Entity)
            .order_by_asc(entities::show::Column::StartTime)
            .find_also_related(entities::venue::Entity)
            .all(&self.db.conn)
            .await?;

        let appearances = shows.into_iter().filter_map(|(show, venue)| match venue {
            Some(venue) => Some((show.start_time, VenueAppearance {
                venue_id: venue.id,
                venue_name: venue.name,
                venue_image_link: venue.image_link,
                start_time: format_start_time(show.start_time),
            })),
            None => {
                log::warn!("Show {} references missing venue {}", show.id, show.venue_id);
                None
            }
        });
        let split = partition_shows(appearances, now, |(start, _)| *start);
        let upcoming_shows: Vec<VenueAppearance> =
            split.upcoming.into_iter().map(|(_, v)| v).collect();
        let past_shows: Vec<VenueAppearance> = split.past.into_iter().map(|(_, v)| v).collect();

        Ok(Some(ArtistDetail {
            id: artist.id,
            name: artist.name,
            genres: artist.genres.map(|g| g.0),
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
            website: artist.website,
            facebook_link: artist.facebook_link,
            image_link: artist.image_link,
            upcoming_shows_count: upcoming_shows.len(),
            upcoming_shows,
            past_shows_count: past_shows.len(),
            past_shows,
        }))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ArtistInput) -> ServiceResult<entities::artist::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::artist::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let mut artist = <entities::artist::ActiveModel as Default>::default();
                    input.apply(&mut artist);
                    Ok(artist.insert(txn).await?)
                })
            })
            .await?;

        tracing::info!("Artist created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update(&self, id: i64, input: ArtistInput) -> ServiceResult<entities::artist::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::artist::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let artist = entities::artist::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ServiceError::NotFound { entity: "Artist", id })?;

                    let mut artist: entities::artist::ActiveModel = artist.into();
                    input.apply(&mut artist);
                    Ok(artist.update(txn).await?)
                })
            })
            .await?;

        tracing::info!("Artist updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Deletes an artist and every show they were booked into.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.db
            .conn
            .transaction::<_, (), ServiceError>(|txn| {
                Box::pin(async move {
                    let artist = entities::artist::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ServiceError::NotFound { entity: "Artist", id })?;

                    let removed = entities::show::Entity::delete_many()
                        .filter(entities::show::Column::ArtistId.eq(id))
                        .exec(txn)
                        .await?;
                    tracing::debug!("Removed {} shows of artist {}", removed.rows_affected, id);

                    artist.delete(txn).await?;
                    Ok(())
                })
            })
            .await?;

        tracing::info!("Artist deleted (ID: {})", id);
        Ok(())
    }

    pub async fn choices(&self) -> ServiceResult<Vec<(i64, String)>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect())
    }
}
