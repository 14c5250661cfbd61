use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::services::{
    ServiceError, ServiceResult, artist::ArtistInput, show::ShowInput, venue::VenueInput,
};

/// An HTML checkbox: checked whenever the field is submitted at all, whatever its value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Checkbox(pub bool);

impl<'de> Deserialize<'de> for Checkbox {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(Checkbox(true))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub image_link: String,
    pub seeking_talent: Checkbox,
    pub seeking_description: String,
}

impl VenueForm {
    /// Name used in notices, even when the submission is rejected.
    pub fn display_name(&self) -> &str {
        self.name.trim()
    }

    pub fn into_input(self) -> ServiceResult<VenueInput> {
        Ok(VenueInput {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            address: required("address", self.address)?,
            phone: optional(self.phone),
            website: optional(self.website),
            genres: genres(self.genres),
            facebook_link: optional(self.facebook_link),
            image_link: optional(self.image_link),
            seeking_talent: self.seeking_talent.0,
            seeking_description: optional(self.seeking_description),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub image_link: String,
    pub seeking_venue: Checkbox,
    // Older artist forms posted the venue flag under this name
    pub seeking_talent: Checkbox,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn display_name(&self) -> &str {
        self.name.trim()
    }

    pub fn into_input(self) -> ServiceResult<ArtistInput> {
        Ok(ArtistInput {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            phone: optional(self.phone),
            website: optional(self.website),
            genres: genres(self.genres),
            facebook_link: optional(self.facebook_link),
            image_link: optional(self.image_link),
            seeking_venue: self.seeking_venue.0 || self.seeking_talent.0,
            seeking_description: optional(self.seeking_description),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    pub fn into_input(self) -> ServiceResult<ShowInput> {
        let start_time = parse_start_time(&self.start_time).ok_or_else(|| {
            ServiceError::Validation(format!("unrecognised start_time '{}'", self.start_time))
        })?;

        Ok(ShowInput {
            artist_id: parse_id("artist_id", &self.artist_id)?,
            venue_id: parse_id("venue_id", &self.venue_id)?,
            start_time,
        })
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, the `datetime-local` input format and RFC 3339.
/// Values without an offset are taken as UTC.
pub fn parse_start_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn required(field: &str, value: String) -> ServiceResult<String> {
    optional(value).ok_or_else(|| ServiceError::Validation(format!("{field} is required")))
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn genres(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter_map(optional).collect()
}

fn parse_id(field: &str, value: &str) -> ServiceResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| ServiceError::Validation(format!("{field} must be an integer, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};
    use axum_extra::extract::Form;
    use chrono::TimeZone;

    async fn decode<T>(body: &'static str) -> T
    where
        T: serde::de::DeserializeOwned + Send,
    {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        let Form(form) = Form::<T>::from_request(request, &()).await.unwrap();
        form
    }

    #[tokio::test]
    async fn test_venue_form_collects_every_genre() {
        let form: VenueForm = decode(
            "name=+The+Dueling+Pianos+Bar+&city=New+York&state=NY&address=335+Delancey+Street\
             &genres=Classical&genres=R%26B&genres=Hip-Hop&genres=+&seeking_talent=y",
        )
        .await;
        assert_eq!(form.display_name(), "The Dueling Pianos Bar");

        let input = form.into_input().unwrap();
        assert_eq!(input.name, "The Dueling Pianos Bar");
        assert_eq!(input.genres, vec!["Classical", "R&B", "Hip-Hop"]);
        assert!(input.seeking_talent);
        assert_eq!(input.phone, None);
        assert_eq!(input.website, None);
    }

    #[tokio::test]
    async fn test_checkbox_is_true_for_any_submitted_value() {
        for body in ["seeking_talent=false", "seeking_talent=0", "seeking_talent="] {
            let form: VenueForm = decode(body).await;
            assert_eq!(form.seeking_talent, Checkbox(true), "body: {body}");
        }

        let form: VenueForm = decode("name=x").await;
        assert_eq!(form.seeking_talent, Checkbox(false));
    }

    #[tokio::test]
    async fn test_venue_form_requires_address() {
        let form: VenueForm = decode("name=Hall&city=Austin&state=TX&address=++").await;
        let err = form.into_input().unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref msg) if msg == "address is required"));
    }

    #[tokio::test]
    async fn test_artist_form_reads_legacy_seeking_field() {
        let form: ArtistForm = decode("name=Guns+N+Petals&city=San+Francisco&state=CA&seeking_talent=y").await;
        assert!(form.into_input().unwrap().seeking_venue);

        let form: ArtistForm = decode("name=Guns+N+Petals&city=San+Francisco&state=CA").await;
        assert!(!form.into_input().unwrap().seeking_venue);
    }

    #[tokio::test]
    async fn test_show_form() {
        let form: ShowForm = decode("artist_id=4&venue_id=1&start_time=2019-05-21+21%3A30%3A00").await;
        let input = form.into_input().unwrap();
        assert_eq!(input.artist_id, 4);
        assert_eq!(input.venue_id, 1);
        assert_eq!(
            input.start_time,
            Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap()
        );

        let form: ShowForm = decode("artist_id=four&venue_id=1&start_time=2019-05-21+21%3A30%3A00").await;
        assert!(matches!(form.into_input(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_parse_start_time_formats() {
        let expected = Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap();
        assert_eq!(parse_start_time("2035-04-01 20:00:00"), Some(expected));
        assert_eq!(parse_start_time("2035-04-01T20:00"), Some(expected));
        assert_eq!(parse_start_time("2035-04-01T20:00:00"), Some(expected));
        assert_eq!(parse_start_time("2035-04-01T22:00:00+02:00"), Some(expected));
        assert_eq!(parse_start_time("next tuesday"), None);
        assert_eq!(parse_start_time(""), None);
    }
}
