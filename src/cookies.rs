use std::fmt::Write;

use ::cookie::{Cookie, SameSite};
use time::macros::{datetime, format_description};
use time::{OffsetDateTime, UtcOffset};

use crate::types::SessionToken;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Fixed expiry for session cookies. Records never expire, so neither do cookies.
pub const SESSION_COOKIE_EXPIRES: OffsetDateTime = datetime!(2099-12-31 23:59:59 UTC);

/// Create the session cookie for a freshly issued token.
///
/// `Path=/`, `HttpOnly`, `SameSite=Strict`, and the fixed late-century `Expires`.
/// `Secure` is only added when `secure` is set.
#[must_use]
pub fn session_cookie(token: &SessionToken, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE_NAME, token.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .expires(SESSION_COOKIE_EXPIRES);
    if secure {
        builder = builder.secure(true);
    }
    builder.build()
}

/// Serialize a cookie for `Set-Cookie` as
/// `name=value; Path=..; HttpOnly; SameSite=..; Secure; Expires=<RFC 1123 date>`,
/// writing only the attributes that are set.
#[must_use]
pub fn set_cookie_header(cookie: &Cookie<'_>) -> String {
    let mut header = format!("{}={}", cookie.name(), cookie.value());
    if let Some(path) = cookie.path() {
        let _ = write!(header, "; Path={path}");
    }
    if cookie.http_only() == Some(true) {
        header.push_str("; HttpOnly");
    }
    if let Some(same_site) = cookie.same_site() {
        let _ = write!(header, "; SameSite={same_site}");
    }
    if cookie.secure() == Some(true) {
        header.push_str("; Secure");
    }
    if let Some(expires) = cookie.expires_datetime() {
        let format = format_description!(
            "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
        );
        if let Ok(date) = expires.to_offset(UtcOffset::UTC).format(format) {
            let _ = write!(header, "; Expires={date}");
        }
    }
    header
}

/// Split a `Cookie` header into `(name, value)` pairs.
///
/// Segments are `;`-delimited and split on their first `=` only, so values
/// keep any further `=` verbatim. Segments without `=` are dropped. Names and
/// values are trimmed. No percent-decoding is applied.
pub fn parse_cookie_header(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header.split(';').filter_map(|segment| {
        let (name, value) = segment.split_once('=')?;
        Some((name.trim(), value.trim()))
    })
}

/// Value of the named cookie in a `Cookie` header. The last occurrence wins.
#[must_use]
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    parse_cookie_header(header)
        .filter(|(n, _)| *n == name)
        .map(|(_, v)| v)
        .last()
}
