/// Attributes given to a cookie when it is set. They play no part in its protection.
///
/// Empty or `None` fields are left off the emitted cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CookieOptions {
    pub domain: Option<String>,
    pub path: Option<String>,
    pub http_only: bool,
    pub secure: bool,
    pub max_age: Option<Duration>,
    pub expires: Option<OffsetDateTime>,
    pub same_site: Option<SameSite>,
    pub partitioned: bool,
}

impl CookieOptions {
    pub(crate) fn apply(&self, cookie: &mut Cookie<'_>) {
        if let Some(domain) = self.domain.as_deref().filter(|domain| !domain.is_empty()) {
            cookie.set_domain(domain.to_owned());
        }
        if let Some(path) = self.path.as_deref().filter(|path| !path.is_empty()) {
            cookie.set_path(path.to_owned());
        }
        cookie.set_http_only(self.http_only);
        cookie.set_secure(self.secure);
        if let Some(max_age) = self.max_age {
            cookie.set_max_age(max_age);
        }
        if let Some(expires) = self.expires {
            cookie.set_expires(expires);
        }
        if let Some(same_site) = self.same_site {
            cookie.set_same_site(same_site);
        }
        cookie.set_partitioned(self.partitioned);
    }
}


use cookie::Cookie;
use cookie::SameSite;
use time::Duration;
use time::OffsetDateTime;
