use crate::http::{HTTPError, HTTPResult};
use crate::reddit::auth::{AccessToken, Credentials};
use crate::reddit::client::Reddit;
use crate::reddit::service::Service;
use reqwest::StatusCode;
use std::fs;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

pub fn test_credentials() -> Credentials {
    Credentials::new("test-client", "test-secret", "redleads_bot", "hunter2")
        .with_user_agent(format!("test-service-please-ignore v{}", env!("CARGO_PKG_VERSION")))
}

#[derive(Debug)]
enum Login {
    Token(&'static str),
    Status(StatusCode),
}

/// Serves API responses from `tests/data` and records which fixtures were
/// requested.
///
/// Fixtures are named after the resource:
///
/// - `/api/v1/me` is `me`
/// - `/r/<sub>/top` is `top_<sub>`, or `top_<sub>_<after>` for later pages
/// - `/comments/<id>` is `comments_<id>`, or `comments_<id>_<comment>` for
///   a single thread
/// - `/api/morechildren` is `more_<first child id>`
#[derive(Debug)]
pub struct TestService {
    login: Login,
    requests: Mutex<Vec<String>>,
}

impl TestService {
    fn new(login: Login) -> Self {
        Self {
            login,
            requests: Mutex::new(vec![]),
        }
    }

    /// Hands out a token for any credentials.
    pub fn authorized() -> Self {
        Self::new(Login::Token("token_valid"))
    }

    /// Refuses the username and password the way Reddit does.
    pub fn rejected() -> Self {
        Self::new(Login::Token("token_invalid_grant"))
    }

    /// Refuses the client ID and secret.
    pub fn unauthorized() -> Self {
        Self::new(Login::Status(StatusCode::UNAUTHORIZED))
    }

    /// Names of the fixtures requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("poisoned").clone()
    }

    fn fixture(path: &str, query: &[(&str, &str)]) -> String {
        let param = |name: &str| {
            query
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
        };
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        let (base, suffix) = match segments.as_slice() {
            ["api", "v1", "me"] => (String::from("me"), None),
            ["r", subreddit, "top"] => (format!("top_{subreddit}"), param("after")),
            ["comments", id] => (format!("comments_{id}"), param("comment")),
            ["api", "morechildren"] => {
                let first = param("children")
                    .and_then(|children| children.split(',').next())
                    .unwrap_or_default();
                (format!("more_{first}"), None)
            }
            _ => (path.trim_matches('/').replace('/', "_"), None),
        };

        match suffix {
            Some(suffix) => format!("{base}_{suffix}"),
            None => base,
        }
    }

    fn read(name: &str) -> HTTPResult<String> {
        fs::read_to_string(format!("tests/data/{name}.json"))
            .map_err(|_| HTTPError::Http(StatusCode::NOT_FOUND))
    }
}

impl Service for TestService {
    async fn authenticate(&self, _credentials: &Credentials) -> HTTPResult<String> {
        match self.login {
            Login::Token(name) => Self::read(name),
            Login::Status(status) => Err(HTTPError::Http(status)),
        }
    }

    async fn get_resource(
        &self,
        _token: &AccessToken,
        path: &str,
        query: &[(&str, &str)],
    ) -> HTTPResult<String> {
        let name = Self::fixture(path, query);
        self.requests.lock().expect("poisoned").push(name.clone());
        Self::read(&name)
    }
}

impl Reddit<TestService> {
    /// Returns a session that reads every response from `tests/data`.
    pub async fn test() -> Self {
        Reddit::login_with_service(&test_credentials(), TestService::authorized())
            .await
            .expect("test login failed")
    }
}

#[cfg(test)]
mod tests {
    use super::TestService;

    #[test]
    fn it_names_fixtures_after_resources() {
        assert_eq!(TestService::fixture("/api/v1/me", &[]), "me");
        assert_eq!(
            TestService::fixture("/r/rust/top", &[("t", "all"), ("limit", "100")]),
            "top_rust"
        );
        assert_eq!(
            TestService::fixture("/r/rust/top", &[("after", "t3_p2")]),
            "top_rust_t3_p2"
        );
        assert_eq!(TestService::fixture("/comments/deep", &[]), "comments_deep");
        assert_eq!(
            TestService::fixture("/comments/deep", &[("comment", "c2")]),
            "comments_deep_c2"
        );
        assert_eq!(
            TestService::fixture("/api/morechildren", &[("children", "m1,m2")]),
            "more_m1"
        );
    }
}
