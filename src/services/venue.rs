use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use tracing::instrument;

use crate::aggregation::{
    Area, EntitySummary, count_upcoming_by, format_start_time, group_by_area, partition_shows,
};
use crate::database::Database;
use crate::entities::{self, StringVec};
use crate::services::{SearchResults, ServiceError, ServiceResult, name_matches};

/// Every editable venue field. Writing one replaces the whole row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueInput {
    fn apply(self, venue: &mut entities::venue::ActiveModel) {
        venue.name = Set(self.name);
        venue.city = Set(self.city);
        venue.state = Set(self.state);
        venue.address = Set(self.address);
        venue.phone = Set(self.phone);
        venue.website = Set(self.website);
        venue.genres = Set(if self.genres.is_empty() {
            None
        } else {
            Some(StringVec(self.genres))
        });
        venue.facebook_link = Set(self.facebook_link);
        venue.image_link = Set(self.image_link);
        venue.seeking_talent = Set(self.seeking_talent);
        venue.seeking_description = Set(self.seeking_description);
    }
}

/// An artist playing at the venue, as shown on the venue page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistAppearance {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// Display structure for the venue page. Absent optional fields are left out when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub upcoming_shows: Vec<ArtistAppearance>,
    pub upcoming_shows_count: usize,
    pub past_shows: Vec<ArtistAppearance>,
    pub past_shows_count: usize,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All venues grouped by (city, state), with upcoming show counts.
    #[instrument(skip(self))]
    pub async fn list_by_area(&self, now: DateTime<Utc>) -> ServiceResult<Vec<Area>> {
        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::Id)
            .all(&self.db.conn)
            .await?;
        let shows = entities::show::Entity::find().all(&self.db.conn).await?;
        let counts = count_upcoming_by(shows.iter().map(|s| (s.venue_id, s.start_time)), now);

        let areas = group_by_area(venues.into_iter().map(|venue| {
            let summary = EntitySummary {
                id: venue.id,
                num_upcoming_shows: counts.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            };
            (venue.city, venue.state, summary)
        }));

        tracing::debug!("Listed venues in {} areas", areas.len());
        Ok(areas)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, term: &str, now: DateTime<Utc>) -> ServiceResult<SearchResults> {
        // SQLite's LIKE only folds ASCII, so names are matched here
        let venues: Vec<entities::venue::Model> = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::Id)
            .all(&self.db.conn)
            .await?
            .into_iter()
            .filter(|venue| name_matches(&venue.name, term))
            .collect();

        let ids: Vec<i64> = venues.iter().map(|v| v.id).collect();
        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.is_in(ids))
            .all(&self.db.conn)
            .await?;
        let counts = count_upcoming_by(shows.iter().map(|s| (s.venue_id, s.start_time)), now);

        let data: Vec<EntitySummary> = venues
            .into_iter()
            .map(|venue| EntitySummary {
                id: venue.id,
                num_upcoming_shows: counts.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            })
            .collect();

        Ok(data.into())
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Option<entities::venue::Model>> {
        Ok(entities::venue::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_detail(&self, id: i64, now: DateTime<Utc>) -> ServiceResult<Option<VenueDetail>> {
        let Some(venue) = self.get(id).await? else {
            return Ok(None);
        };

        let shows = venue
            .find_related(entities::show::Entity)
            .order_by_asc(entities::show::Column::StartTime)
            .find_also_related(entities::artist::Entity)
            .all(&self.db.conn)
            .await?;

        let appearances = shows.into_iter().filter_map(|(show, artist)| match artist {
            Some(artist) => Some((show.start_time, ArtistAppearance {
                artist_id: artist.id,
                artist_name: artist.name,
                artist_image_link: artist.image_link,
                start_time: format_start_time(show.start_time),
            })),
            None => {
                log::warn!("Show {} references missing artist {}", show.id, show.artist_id);
                None
            }
        });
        let split = partition_shows(appearances, now, |(start, _)| *start);
        let upcoming_shows: Vec<ArtistAppearance> =
            split.upcoming.into_iter().map(|(_, a)| a).collect();
        let past_shows: Vec<ArtistAppearance> = split.past.into_iter().map(|(_, a)| a).collect();

        Ok(Some(VenueDetail {
            id: venue.id,
            name: venue.name,
            genres: venue.genres.map(|g| g.0),
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: venue.phone,
            website: venue.website,
            facebook_link: venue.facebook_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
            image_link: venue.image_link,
            upcoming_shows_count: upcoming_shows.len(),
            upcoming_shows,
            past_shows_count: past_shows.len(),
            past_shows,
        }))
    }

    /// Inserts a venue; the store assigns the id.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: VenueInput) -> ServiceResult<entities::venue::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::venue::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let mut venue = <entities::venue::ActiveModel as Default>::default();
                    input.apply(&mut venue);
                    Ok(venue.insert(txn).await?)
                })
            })
            .await?;

        tracing::info!("Venue created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Overwrites every editable field of an existing venue.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update(&self, id: i64, input: VenueInput) -> ServiceResult<entities::venue::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::venue::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let venue = entities::venue::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ServiceError::NotFound { entity: "Venue", id })?;

                    let mut venue: entities::venue::ActiveModel = venue.into();
                    input.apply(&mut venue);
                    Ok(venue.update(txn).await?)
                })
            })
            .await?;

        tracing::info!("Venue updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Deletes a venue together with its shows.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.db
            .conn
            .transaction::<_, (), ServiceError>(|txn| {
                Box::pin(async move {
                    let venue = entities::venue::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ServiceError::NotFound { entity: "Venue", id })?;

                    let removed = entities::show::Entity::delete_many()
                        .filter(entities::show::Column::VenueId.eq(id))
                        .exec(txn)
                        .await?;
                    tracing::debug!("Removed {} shows of venue {}", removed.rows_affected, id);

                    venue.delete(txn).await?;
                    Ok(())
                })
            })
            .await?;

        tracing::info!("Venue deleted (ID: {})", id);
        Ok(())
    }

    /// (id, name) pairs for the show form's venue select.
    pub async fn choices(&self) -> ServiceResult<Vec<(i64, String)>> {
        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::Id)
            .all(&self.db.conn)
            .await?;
        Ok(venues.into_iter().map(|v| (v.id, v.name)).collect())
    }
}
