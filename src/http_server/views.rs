//! Server-rendered HTML pages.
//!
//! Every value interpolated into markup goes through [`escape`].

pub mod artists;
pub mod shows;
pub mod venues;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wraps page content in the shared chrome: navigation plus the pending notice, if any.
pub fn layout(title: &str, flash: Option<&str>, content: &str) -> String {
    let notice = flash
        .map(|message| format!(r#"<div class="notice">{}</div>"#, escape(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Gigboard</title>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; color: #222; }}
        nav {{ background-color: #2a2a2a; padding: 12px 20px; }}
        nav a {{ color: #e0e0e0; margin-right: 16px; text-decoration: none; }}
        main {{ padding: 20px; max-width: 960px; }}
        .notice {{ background-color: #e8f4ff; border: 1px solid #4a9eff; padding: 10px; margin-bottom: 20px; }}
        .muted {{ color: #888; }}
        label {{ display: block; margin-top: 10px; }}
    </style>
</head>
<body>
<nav>
    <a href="/">Gigboard</a>
    <a href="/venues">Venues</a>
    <a href="/artists">Artists</a>
    <a href="/shows">Shows</a>
    <a href="/venues/create">Post a venue</a>
    <a href="/artists/create">Post an artist</a>
    <a href="/shows/create">Post a show</a>
</nav>
<main>
{notice}
{content}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn home(flash: Option<&str>) -> String {
    layout(
        "Home",
        flash,
        r#"<h1>Gigboard</h1>
<p>Find venues to play at and artists to book.</p>"#,
    )
}

pub fn not_found() -> String {
    layout(
        "Not Found",
        None,
        r#"<h1>404</h1>
<p>The page you were looking for does not exist.</p>"#,
    )
}

pub fn server_error() -> String {
    layout(
        "Server Error",
        None,
        r#"<h1>500</h1>
<p>Something went wrong.</p>"#,
    )
}

/// Search box posting `search_term` to `action`.
fn search_box(action: &str, placeholder: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
    <input type="search" name="search_term" placeholder="{placeholder}">
    <button type="submit">Search</button>
</form>"#
    )
}

/// Text input pre-filled with `value`.
fn text_input(name: &str, label: &str, value: Option<&str>) -> String {
    format!(
        r#"<label>{label} <input type="text" name="{name}" value="{}"></label>"#,
        escape(value.unwrap_or_default())
    )
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        r#"<label><input type="checkbox" name="{name}" value="y"{}> {label}</label>"#,
        if checked { " checked" } else { "" }
    )
}

/// Multi-select of `GENRES` with the current values selected.
fn genre_select(selected: &[String]) -> String {
    let options: String = GENRES
        .iter()
        .map(|genre| {
            let mark = if selected.iter().any(|s| s == genre) {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{g}"{mark}>{g}</option>"#,
                g = escape(genre)
            )
        })
        .collect();
    format!(r#"<label>Genres <select name="genres" multiple>{options}</select></label>"#)
}

/// Link if present, muted placeholder otherwise.
fn optional_link(label: &str, href: Option<&str>) -> String {
    match href {
        Some(href) => format!(
            r#"<p><a href="{h}" target="_blank">{label}</a></p>"#,
            h = escape(href)
        ),
        None => format!(r#"<p class="muted">No {label}</p>"#),
    }
}

/// Button that issues `DELETE` against `path` and returns home.
fn delete_button(path: &str, label: &str) -> String {
    format!(
        r#"<button onclick="fetch('{path}', {{ method: 'DELETE' }}).then(() => {{ window.location = '/'; }})">{label}</button>"#
    )
}

const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];
