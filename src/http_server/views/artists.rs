use crate::entities::artist;
use crate::http_server::filters::{DateFormat, format_datetime};
use crate::services::SearchResults;
use crate::services::artist::{ArtistDetail, ArtistEntry, VenueAppearance};

use super::{
    checkbox, delete_button, escape, genre_select, layout, optional_link, search_box, text_input,
};

pub fn list(artists: &[ArtistEntry]) -> String {
    let items: String = artists
        .iter()
        .map(|artist| {
            format!(
                "<li><a href=\"/artists/{}\">{}</a></li>\n",
                artist.id,
                escape(&artist.name)
            )
        })
        .collect();

    let content = format!(
        "<h1>Artists</h1>\n{}\n<ul>\n{items}</ul>",
        search_box("/artists/search", "Find an artist")
    );
    layout("Artists", None, &content)
}

pub fn search_results(search_term: &str, results: &SearchResults) -> String {
    let items: String = results
        .data
        .iter()
        .map(|artist| {
            format!(
                "<li><a href=\"/artists/{}\">{}</a> <span class=\"muted\">{} upcoming</span></li>\n",
                artist.id,
                escape(&artist.name),
                artist.num_upcoming_shows
            )
        })
        .collect();

    let content = format!(
        "<h1>Number of search results for \"{}\": {}</h1>\n{}\n<ul>\n{items}</ul>",
        escape(search_term),
        results.count,
        search_box("/artists/search", "Find an artist"),
    );
    layout("Artist Search", None, &content)
}

pub fn detail(artist: &ArtistDetail, flash: Option<&str>) -> String {
    let genres = artist
        .genres
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|genre| escape(genre))
        .collect::<Vec<_>>()
        .join(", ");

    let seeking = if artist.seeking_venue {
        format!(
            "<p><strong>Currently seeking performance venues</strong></p>\n<p>{}</p>",
            escape(artist.seeking_description.as_deref().unwrap_or_default())
        )
    } else {
        r#"<p class="muted">Not currently seeking performance venues</p>"#.to_string()
    };

    let image = artist
        .image_link
        .as_deref()
        .map(|src| {
            format!(
                r#"<img src="{}" alt="{}" width="240">"#,
                escape(src),
                escape(&artist.name)
            )
        })
        .unwrap_or_default();

    let content = format!(
        r#"<h1>{name}</h1>
<p class="muted">ID: {id}</p>
<p>{genres}</p>
<p>{city}, {state}</p>
<p>{phone}</p>
{website}
{facebook}
{seeking}
{image}
<p><a href="/artists/{id}/edit">Edit</a> {delete}</p>
<h2>{upcoming_count} Upcoming Shows</h2>
{upcoming}
<h2>{past_count} Past Shows</h2>
{past}"#,
        name = escape(&artist.name),
        id = artist.id,
        city = escape(&artist.city),
        state = escape(&artist.state),
        phone = escape(artist.phone.as_deref().unwrap_or("No phone")),
        website = optional_link("website", artist.website.as_deref()),
        facebook = optional_link("facebook page", artist.facebook_link.as_deref()),
        delete = delete_button(&format!("/artists/{}", artist.id), "Delete artist"),
        upcoming_count = artist.upcoming_shows_count,
        upcoming = appearances(&artist.upcoming_shows),
        past_count = artist.past_shows_count,
        past = appearances(&artist.past_shows),
    );

    layout(&artist.name, flash, &content)
}

fn appearances(shows: &[VenueAppearance]) -> String {
    let items: String = shows
        .iter()
        .map(|show| {
            format!(
                "<li><a href=\"/venues/{}\">{}</a> <span class=\"muted\">{}</span></li>\n",
                show.venue_id,
                escape(&show.venue_name),
                escape(&format_datetime(&show.start_time, DateFormat::Medium))
            )
        })
        .collect();
    format!("<ul>\n{items}</ul>")
}

pub fn form(artist: Option<&artist::Model>) -> String {
    let (title, action) = match artist {
        Some(a) => (format!("Edit artist {}", a.name), format!("/artists/{}/edit", a.id)),
        None => ("List a new artist".to_string(), "/artists/create".to_string()),
    };
    let genres = artist
        .and_then(|a| a.genres.as_ref())
        .map(|g| g.0.as_slice())
        .unwrap_or_default();

    let content = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}">
{name}
{city}
{state}
{phone}
{genres}
{facebook}
{image}
{website}
{seeking}
{description}
<button type="submit">{submit}</button>
</form>"#,
        heading = escape(&title),
        name = text_input("name", "Name", artist.map(|a| a.name.as_str())),
        city = text_input("city", "City", artist.map(|a| a.city.as_str())),
        state = text_input("state", "State", artist.map(|a| a.state.as_str())),
        phone = text_input("phone", "Phone", artist.and_then(|a| a.phone.as_deref())),
        genres = genre_select(genres),
        facebook = text_input(
            "facebook_link",
            "Facebook link",
            artist.and_then(|a| a.facebook_link.as_deref())
        ),
        image = text_input("image_link", "Image link", artist.and_then(|a| a.image_link.as_deref())),
        website = text_input("website", "Website", artist.and_then(|a| a.website.as_deref())),
        seeking = checkbox(
            "seeking_venue",
            "Looking for venues",
            artist.is_some_and(|a| a.seeking_venue)
        ),
        description = text_input(
            "seeking_description",
            "Seeking description",
            artist.and_then(|a| a.seeking_description.as_deref())
        ),
        submit = if artist.is_some() { "Save changes" } else { "Create artist" },
    );

    layout(&title, None, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_omits_missing_links() {
        let artist = ArtistDetail {
            id: 4,
            name: "Guns N Petals".into(),
            genres: Some(vec!["Rock n Roll".into()]),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: None,
            seeking_venue: false,
            seeking_description: None,
            website: None,
            facebook_link: None,
            image_link: None,
            upcoming_shows: vec![],
            upcoming_shows_count: 0,
            past_shows: vec![VenueAppearance {
                venue_id: 1,
                venue_name: "The Musical Hop".into(),
                venue_image_link: None,
                start_time: "2019-05-21 21:30:00".into(),
            }],
            past_shows_count: 1,
        };

        let html = detail(&artist, Some("Artist Guns N Petals was successfully updated!"));
        assert!(html.contains("<p>Rock n Roll</p>"));
        assert!(html.contains(r#"<p class="muted">No website</p>"#));
        assert!(html.contains("<h2>1 Past Shows</h2>"));
        assert!(html.contains("Tue 05, 21, 2019 9:30PM"));
        assert!(html.contains("Artist Guns N Petals was successfully updated!"));
    }
}
