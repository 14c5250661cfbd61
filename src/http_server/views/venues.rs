use crate::aggregation::Area;
use crate::entities::venue;
use crate::http_server::filters::{DateFormat, format_datetime};
use crate::services::SearchResults;
use crate::services::venue::{ArtistAppearance, VenueDetail};

use super::{
    checkbox, delete_button, escape, genre_select, layout, optional_link, search_box, text_input,
};

pub fn list(areas: &[Area]) -> String {
    let mut content = format!(
        "<h1>Venues</h1>\n{}\n",
        search_box("/venues/search", "Find a venue")
    );

    if areas.is_empty() {
        content.push_str(r#"<p class="muted">No venues listed yet.</p>"#);
    }

    for area in areas {
        content.push_str(&format!(
            "<h3>{}, {}</h3>\n<ul>\n",
            escape(&area.city),
            escape(&area.state)
        ));
        for venue in &area.venues {
            content.push_str(&format!(
                r#"<li><a href="/venues/{}">{}</a> <span class="muted">{} upcoming</span></li>"#,
                venue.id,
                escape(&venue.name),
                venue.num_upcoming_shows
            ));
            content.push('\n');
        }
        content.push_str("</ul>\n");
    }

    layout("Venues", None, &content)
}

pub fn search_results(search_term: &str, results: &SearchResults) -> String {
    let items: String = results
        .data
        .iter()
        .map(|venue| {
            format!(
                "<li><a href=\"/venues/{}\">{}</a></li>\n",
                venue.id,
                escape(&venue.name)
            )
        })
        .collect();

    let content = format!(
        "<h1>Number of search results for \"{}\": {}</h1>\n{}\n<ul>\n{items}</ul>",
        escape(search_term),
        results.count,
        search_box("/venues/search", "Find a venue"),
    );
    layout("Venue Search", None, &content)
}

pub fn detail(venue: &VenueDetail, flash: Option<&str>) -> String {
    let genres = venue
        .genres
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|genre| escape(genre))
        .collect::<Vec<_>>()
        .join(", ");

    let seeking = if venue.seeking_talent {
        format!(
            "<p><strong>Currently seeking talent</strong></p>\n<p>{}</p>",
            escape(venue.seeking_description.as_deref().unwrap_or_default())
        )
    } else {
        r#"<p class="muted">Not currently seeking talent</p>"#.to_string()
    };

    let content = format!(
        r#"<h1>{name}</h1>
<p class="muted">ID: {id}</p>
<p>{genres}</p>
<p>{address}, {city}, {state}</p>
<p>{phone}</p>
{website}
{facebook}
{seeking}
{image}
<p><a href="/venues/{id}/edit">Edit</a> {delete}</p>
<h2>{upcoming_count} Upcoming Shows</h2>
{upcoming}
<h2>{past_count} Past Shows</h2>
{past}"#,
        name = escape(&venue.name),
        id = venue.id,
        address = escape(&venue.address),
        city = escape(&venue.city),
        state = escape(&venue.state),
        phone = escape(venue.phone.as_deref().unwrap_or("No phone")),
        website = optional_link("website", venue.website.as_deref()),
        facebook = optional_link("facebook page", venue.facebook_link.as_deref()),
        image = image_tag(venue.image_link.as_deref(), &venue.name),
        delete = delete_button(&format!("/venues/{}", venue.id), "Delete venue"),
        upcoming_count = venue.upcoming_shows_count,
        upcoming = appearances(&venue.upcoming_shows),
        past_count = venue.past_shows_count,
        past = appearances(&venue.past_shows),
    );

    layout(&venue.name, flash, &content)
}

fn appearances(shows: &[ArtistAppearance]) -> String {
    let items: String = shows
        .iter()
        .map(|show| {
            format!(
                "<li>{}<a href=\"/artists/{}\">{}</a> <span class=\"muted\">{}</span></li>\n",
                image_tag(show.artist_image_link.as_deref(), &show.artist_name),
                show.artist_id,
                escape(&show.artist_name),
                escape(&format_datetime(&show.start_time, DateFormat::Medium))
            )
        })
        .collect();
    format!("<ul>\n{items}</ul>")
}

fn image_tag(src: Option<&str>, alt: &str) -> String {
    src.map(|src| {
        format!(
            r#"<img src="{}" alt="{}" width="120">"#,
            escape(src),
            escape(alt)
        )
    })
    .unwrap_or_default()
}

/// Creation form when `venue` is `None`, pre-filled edit form otherwise.
pub fn form(venue: Option<&venue::Model>) -> String {
    let (title, action) = match venue {
        Some(v) => (format!("Edit venue {}", v.name), format!("/venues/{}/edit", v.id)),
        None => ("List a new venue".to_string(), "/venues/create".to_string()),
    };
    let genres = venue
        .and_then(|v| v.genres.as_ref())
        .map(|g| g.0.as_slice())
        .unwrap_or_default();

    let content = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}">
{name}
{city}
{state}
{address}
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
        name = text_input("name", "Name", venue.map(|v| v.name.as_str())),
        city = text_input("city", "City", venue.map(|v| v.city.as_str())),
        state = text_input("state", "State", venue.map(|v| v.state.as_str())),
        address = text_input("address", "Address", venue.map(|v| v.address.as_str())),
        phone = text_input("phone", "Phone", venue.and_then(|v| v.phone.as_deref())),
        genres = genre_select(genres),
        facebook = text_input("facebook_link", "Facebook link", venue.and_then(|v| v.facebook_link.as_deref())),
        image = text_input("image_link", "Image link", venue.and_then(|v| v.image_link.as_deref())),
        website = text_input("website", "Website", venue.and_then(|v| v.website.as_deref())),
        seeking = checkbox(
            "seeking_talent",
            "Looking for talent",
            venue.is_some_and(|v| v.seeking_talent)
        ),
        description = text_input(
            "seeking_description",
            "Seeking description",
            venue.and_then(|v| v.seeking_description.as_deref())
        ),
        submit = if venue.is_some() { "Save changes" } else { "Create venue" },
    );

    layout(&title, None, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::EntitySummary;

    #[test]
    fn test_list_renders_each_area() {
        let areas = vec![Area {
            city: "San Francisco".into(),
            state: "CA".into(),
            venues: vec![EntitySummary {
                id: 1,
                name: "The Musical Hop".into(),
                num_upcoming_shows: 2,
            }],
        }];

        let html = list(&areas);
        assert!(html.contains("<h3>San Francisco, CA</h3>"));
        assert!(html.contains(r#"<a href="/venues/1">The Musical Hop</a>"#));
        assert!(html.contains("2 upcoming"));
    }

    #[test]
    fn test_edit_form_is_prefilled() {
        let venue = venue::Model {
            id: 3,
            name: "Park Square Live Music & Coffee".into(),
            genres: Some(vec!["Jazz".to_string()].into()),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "34 Whiskey Moore Ave".into(),
            phone: Some("415-000-1234".into()),
            image_link: None,
            website: None,
            facebook_link: None,
            seeking_talent: true,
            seeking_description: None,
        };

        let html = form(Some(&venue));
        assert!(html.contains(r#"action="/venues/3/edit""#));
        assert!(html.contains(r#"value="Park Square Live Music &amp; Coffee""#));
        assert!(html.contains(r#"name="seeking_talent" value="y" checked"#));
        assert!(html.contains(r#"<option value="Jazz" selected>"#));

        let empty = form(None);
        assert!(empty.contains(r#"action="/venues/create""#));
        assert!(!empty.contains(" checked"));
    }
}
