use crate::http_server::filters::{DateFormat, format_datetime};
use crate::services::show::ShowListing;

use super::{escape, layout};

pub fn list(shows: &[ShowListing]) -> String {
    let items: String = shows
        .iter()
        .map(|show| {
            format!(
                r#"<li><a href="/artists/{}">{}</a> at <a href="/venues/{}">{}</a> <span class="muted">{}</span></li>
"#,
                show.artist_id,
                escape(&show.artist_name),
                show.venue_id,
                escape(&show.venue_name),
                escape(&format_datetime(&show.start_time, DateFormat::Full))
            )
        })
        .collect();

    let content = if shows.is_empty() {
        r#"<h1>Shows</h1>
<p class="muted">No shows listed yet.</p>"#
            .to_string()
    } else {
        format!("<h1>Shows</h1>\n<ul>\n{items}</ul>")
    };
    layout("Shows", None, &content)
}

/// Show creation form. Artists and venues are offered as `(id, name)` choices.
pub fn form(artists: &[(i64, String)], venues: &[(i64, String)]) -> String {
    let content = format!(
        r#"<h1>List a new show</h1>
<form method="post" action="/shows/create">
<label>Artist {artists}</label>
<label>Venue {venues}</label>
<label>Start time <input type="datetime-local" name="start_time"></label>
<button type="submit">Create show</button>
</form>"#,
        artists = select("artist_id", artists),
        venues = select("venue_id", venues),
    );
    layout("New Show", None, &content)
}

fn select(name: &str, choices: &[(i64, String)]) -> String {
    let options: String = choices
        .iter()
        .map(|(id, label)| format!(r#"<option value="{id}">{}</option>"#, escape(label)))
        .collect();
    format!(r#"<select name="{name}">{options}</select>"#)
}
