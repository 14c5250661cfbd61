use axum::response::Html;
use axum_extra::extract::CookieJar;

use crate::http_server::{flash, views};

pub async fn index(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, Html(views::home(message.as_deref())))
}
