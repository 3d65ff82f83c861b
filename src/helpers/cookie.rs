use actix_web::cookie::{time::Duration, Cookie, SameSite};

/// Attributes of the session cookie that carries the admin credential.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub name: String,
    pub secure: bool,
    pub max_age_days: i64,
}

impl CookiePolicy {
    pub fn session(&self, token: &str) -> Cookie<'static> {
        Cookie::build(self.name.clone(), token.to_string())
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(Duration::days(self.max_age_days))
            .finish()
    }

    /// Cookie that makes the browser drop the session cookie.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(self.name.clone(), "")
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .finish();
        cookie.make_removal();
        cookie
    }
}
