use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use serde::Serialize;
use tracing::instrument;

use crate::aggregation::format_start_time;
use crate::database::Database;
use crate::entities;
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowInput {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: DateTime<Utc>,
}

/// One row of the flat show listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show joined with its venue and artist display fields.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<ShowListing>> {
        let shows = entities::show::Entity::find()
            .order_by_asc(entities::show::Column::StartTime)
            .find_also_related(entities::venue::Entity)
            .all(&self.db.conn)
            .await?;

        // One query for artists instead of one per show
        let artists: HashMap<i64, entities::artist::Model> = entities::artist::Entity::find()
            .all(&self.db.conn)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let listings = shows
            .into_iter()
            .filter_map(|(show, venue)| {
                let (Some(venue), Some(artist)) = (venue, artists.get(&show.artist_id)) else {
                    log::warn!("Show {} has a dangling artist or venue reference", show.id);
                    return None;
                };
                Some(ShowListing {
                    venue_id: venue.id,
                    venue_name: venue.name,
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: format_start_time(show.start_time),
                })
            })
            .collect();

        Ok(listings)
    }

    /// Books an artist into a venue. Unknown ids are rejected by the foreign keys.
    #[instrument(skip(self))]
    pub async fn create(&self, input: ShowInput) -> ServiceResult<entities::show::Model> {
        let model = self
            .db
            .conn
            .transaction::<_, entities::show::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let show = entities::show::ActiveModel {
                        artist_id: Set(input.artist_id),
                        venue_id: Set(input.venue_id),
                        start_time: Set(input.start_time),
                        ..Default::default()
                    };
                    Ok(show.insert(txn).await?)
                })
            })
            .await?;

        tracing::info!(
            "Show created (ID: {}): artist {} at venue {}",
            model.id,
            model.artist_id,
            model.venue_id
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_artist, insert_venue, test_db};
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_db().await;
        let artist = insert_artist(&db, "The Wild Sax Band").await;
        let venue = insert_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
        let service = ShowService::new(db);

        let show = service
            .create(ShowInput {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: start(),
            })
            .await
            .unwrap();
        assert_eq!(show.id, 1);

        let listings = service.list().await.unwrap();
        assert_eq!(
            listings,
            vec![ShowListing {
                venue_id: venue.id,
                venue_name: "Park Square Live Music & Coffee".into(),
                artist_id: artist.id,
                artist_name: "The Wild Sax Band".into(),
                artist_image_link: None,
                start_time: "2035-04-01 20:00:00".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_artist() {
        let db = test_db().await;
        let venue = insert_venue(&db, "Hall", "Austin", "TX").await;
        let service = ShowService::new(db);

        let result = service
            .create(ShowInput {
                artist_id: 404,
                venue_id: venue.id,
                start_time: start(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Database(_))));
        assert!(service.list().await.unwrap().is_empty());
    }
}
