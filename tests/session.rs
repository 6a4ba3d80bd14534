#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Visit {
    uid: u64,
    user_agent: String,
}

impl Session for Visit {
    fn validate(&self, request: &dyn CookieRequest) -> Result<(), ValidationError> {
        match request.header("user-agent") {
            Some(user_agent) if user_agent == self.user_agent => Ok(()),
            _ => Err(ValidationError::new("user agent changed")),
        }
    }
}

fn manager(secret: &str) -> SessionManager {
    let generator = KeyGenerator::with_cache(secret, 10, Arc::new(KeyCache::new()));
    let encryptor = CookieEncryptor::from_generator(&generator).unwrap();
    SessionManager::new(
        SecureCookieStore::json(encryptor),
        "session",
        HostPolicy {
            domain: Some("example.com".to_owned()),
            base: CookieOptions {
                http_only: true,
                same_site: Some(SameSite::Lax),
                ..CookieOptions::default()
            },
        },
    )
}

fn request(host: &str, user_agent: &str, cookie: Option<&Cookie<'_>>) -> Request<()> {
    let mut request = Request::builder()
        .header(header::HOST, host)
        .header(header::USER_AGENT, user_agent);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie.stripped().to_string());
    }
    request.body(()).unwrap()
}

fn visit(uid: u64) -> Visit {
    Visit {
        uid,
        user_agent: "firefox".to_owned(),
    }
}

#[test]
fn store_round_trip() {
    let generator = KeyGenerator::with_cache("s3cret", 10, Arc::new(KeyCache::new()));
    let store = SecureCookieStore::json(CookieEncryptor::from_generator(&generator).unwrap());

    let mut response = Response::new(());
    let options = CookieOptions {
        path: Some("/".to_owned()),
        ..CookieOptions::default()
    };
    let cookie = store
        .set(&mut response, "session", &options, &json!({ "uid": 42 }))
        .unwrap();
    assert!(cookie.value().starts_with("1."));
    assert!(!cookie.value().contains("42"));

    let header = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let request = Request::builder()
        .header(header::COOKIE, Cookie::parse(header).unwrap().stripped().to_string())
        .body(())
        .unwrap();
    let value: Value = store.get(&request, "session").unwrap();
    assert_eq!(value, json!({ "uid": 42 }));
}

#[test]
fn update_depends_on_host() {
    let manager = manager("s3cret");

    let mut response = Response::new(());
    let local = manager
        .update(&mut response, &request("localhost:8080", "firefox", None), &visit(1))
        .unwrap();
    assert_eq!(local.name(), "session");
    assert_eq!(local.secure(), Some(false));
    assert_eq!(local.domain(), None);
    assert_eq!(local.path(), Some("/"));
    assert_eq!(local.http_only(), Some(true));
    assert_eq!(local.same_site(), Some(SameSite::Lax));

    let remote = manager
        .update(&mut response, &request("app.example.com", "firefox", None), &visit(1))
        .unwrap();
    assert_eq!(remote.secure(), Some(true));
    assert_eq!(remote.domain(), Some("example.com"));

    assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 2);
}

#[test]
fn current_session() {
    let manager = manager("s3cret");
    let mut response = Response::new(());
    let cookie = manager
        .update(&mut response, &request("app.example.com", "firefox", None), &visit(7))
        .unwrap();

    let same_client = request("app.example.com", "firefox", Some(&cookie));
    assert_eq!(manager.current::<Visit, _>(&same_client).unwrap(), visit(7));
    assert!(matches!(
        manager.state::<Visit, _>(&same_client),
        SessionState::Valid(Visit { uid: 7, .. })
    ));

    let stolen = request("app.example.com", "curl", Some(&cookie));
    let error = manager.current::<Visit, _>(&stolen).unwrap_err();
    assert!(matches!(error, CurrentError::Rejected(_)));
    assert_eq!(error.to_string(), "no valid session");
}

#[test]
fn missing_and_invalid_sessions() {
    let manager = manager("s3cret");

    let fresh = request("app.example.com", "firefox", None);
    let error = manager.current::<Visit, _>(&fresh).unwrap_err();
    assert!(error.is_not_found());
    assert!(matches!(
        manager.state::<Visit, _>(&fresh),
        SessionState::Absent
    ));

    let forged = Cookie::new("session", "1.AAAAAAAAAAAAAAAAAAAAAA|AAAAAAAAAAAAAAAAAAAAAA|AAAA");
    let forged = request("app.example.com", "firefox", Some(&forged));
    let error = manager.current::<Visit, _>(&forged).unwrap_err();
    assert!(matches!(error, CurrentError::Invalid(GetError::Decrypt(_))));
    assert_eq!(error.to_string(), "no valid session");
    assert!(matches!(
        manager.state::<Visit, _>(&forged),
        SessionState::Invalid(_)
    ));
}

#[test]
fn current_or_else_starts_new_sessions() {
    let manager = manager("s3cret");

    let fresh = request("app.example.com", "firefox", None);
    let session = manager.current_or_else(&fresh, |_| visit(99));
    assert_eq!(session.uid, 99);

    let mut response = Response::new(());
    let cookie = manager.update(&mut response, &fresh, &visit(3)).unwrap();
    let returning = request("app.example.com", "firefox", Some(&cookie));
    let session = manager.current_or_else(&returning, |_| visit(99));
    assert_eq!(session.uid, 3);

    let other_browser = request("app.example.com", "chrome", Some(&cookie));
    let session = manager.current_or_else(&other_browser, |request| Visit {
        uid: 0,
        user_agent: request.header("user-agent").unwrap().to_owned(),
    });
    assert_eq!(session.uid, 0);
    assert_eq!(session.user_agent, "chrome");
}

#[test]
fn clear_expires_the_cookie() {
    let manager = manager("s3cret");
    let mut response = Response::new(());
    let cookie = manager.clear(&mut response, &request("app.example.com", "firefox", None));
    assert_eq!(cookie.name(), "session");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::seconds(-1)));
    assert_eq!(cookie.domain(), Some("example.com"));
    assert_eq!(cookie.path(), Some("/"));

    let header = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(header.starts_with("session=;"));
    assert!(header.contains("Max-Age=-1"));
}

#[test]
fn clear_matches_partitioned_cookies() {
    let config = toml::from_str::<Config>(
        r#"
        secret = "configured secret"
        iterations = 10
        domain = "example.com"
        partitioned = true
        "#,
    )
    .unwrap();
    let manager = config.session_manager().unwrap();
    let request = request("app.example.com", "firefox", None);

    let mut response = Response::new(());
    let set = manager.update(&mut response, &request, &visit(1)).unwrap();
    let cleared = manager.clear(&mut response, &request);

    assert_eq!(set.partitioned(), Some(true));
    assert_eq!(cleared.partitioned(), set.partitioned());
    assert_eq!(cleared.secure(), set.secure());
    assert_eq!(cleared.domain(), set.domain());
    assert_eq!(cleared.path(), set.path());
    assert_eq!(cleared.max_age(), Some(Duration::seconds(-1)));

    let headers = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(headers.len(), 2);
    assert!(headers[1].starts_with("session=;"));
    assert!(headers[1].contains("Partitioned"), "{}", headers[1]);
}

#[test]
fn secrets_are_isolated() {
    let ours = manager("s3cret");
    let theirs = manager("another secret");

    let mut response = Response::new(());
    let cookie = theirs
        .update(&mut response, &request("app.example.com", "firefox", None), &visit(5))
        .unwrap();

    let request = request("app.example.com", "firefox", Some(&cookie));
    let error = ours.current::<Visit, _>(&request).unwrap_err();
    assert!(matches!(
        error,
        CurrentError::Invalid(GetError::Decrypt(DecryptError::Integrity(_)))
    ));
    assert_eq!(theirs.current::<Visit, _>(&request).unwrap(), visit(5));
}

#[test]
fn from_config() {
    let config = toml::from_str::<Config>(
        r#"
        secret = "configured secret"
        iterations = 10
        cookie_name = "sid"
        domain = "example.com"
        max_age = "30m"
        "#,
    )
    .unwrap();
    let manager = config.session_manager().unwrap();
    assert_eq!(manager.cookie_name(), "sid");

    let mut response = Response::new(());
    let fresh = request("app.example.com", "firefox", None);
    let cookie = manager.update(&mut response, &fresh, &visit(11)).unwrap();
    assert_eq!(cookie.name(), "sid");
    assert_eq!(cookie.max_age(), Some(Duration::minutes(30)));

    let returning = request("app.example.com", "firefox", Some(&cookie));
    assert_eq!(manager.current::<Visit, _>(&returning).unwrap(), visit(11));
}

use sealed_cookies::cookie::Cookie;
use sealed_cookies::cookie::SameSite;
use sealed_cookies::http::header;
use sealed_cookies::http::Request;
use sealed_cookies::http::Response;
use sealed_cookies::Config;
use sealed_cookies::CookieEncryptor;
use sealed_cookies::CookieOptions;
use sealed_cookies::CookieRequest;
use sealed_cookies::CurrentError;
use sealed_cookies::DecryptError;
use sealed_cookies::GetError;
use sealed_cookies::HostPolicy;
use sealed_cookies::KeyCache;
use sealed_cookies::KeyGenerator;
use sealed_cookies::SecureCookieStore;
use sealed_cookies::Session;
use sealed_cookies::SessionManager;
use sealed_cookies::SessionState;
use sealed_cookies::ValidationError;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;
use std::sync::Arc;
use time::Duration;
