use anyhow::Context;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, HeaderValue, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use tracing as log;

const DEFAULT_API_URL: &str = "https://api.github.com";

/// Finds the token to use: `explicit` when given, otherwise the user's
/// environment.
pub fn resolve_token(explicit: Option<SecretString>) -> anyhow::Result<SecretString> {
    token_from(
        explicit,
        |name| std::env::var(name).ok(),
        get_token_from_git_config,
    )
}

fn token_from(
    explicit: Option<SecretString>,
    var: impl Fn(&str) -> Option<String>,
    git_config: impl FnOnce() -> anyhow::Result<String>,
) -> anyhow::Result<SecretString> {
    if let Some(token) = explicit {
        return Ok(token);
    }
    let from_env = ["GITHUB_TOKEN", "GITHUB_API_TOKEN"]
        .into_iter()
        .filter_map(&var)
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty());
    let token = match from_env {
        Some(token) => token,
        None => git_config().context(
            "could not find token in GITHUB_TOKEN, GITHUB_API_TOKEN or .gitconfig/github.oauth-token",
        )?,
    };
    Ok(token.into())
}

fn api_url_from(var: impl Fn(&str) -> Option<String>) -> String {
    var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

fn get_token_from_git_config() -> anyhow::Result<String> {
    let output = std::process::Command::new("git")
        .arg("config")
        .arg("--get")
        .arg("github.oauth-token")
        .output()?;
    if !output.status.success() {
        anyhow::bail!("error received executing `git`: {:?}", output.status);
    }
    let git_token = String::from_utf8(output.stdout)?.trim().to_string();
    if git_token.is_empty() {
        anyhow::bail!("github.oauth-token is empty");
    }
    Ok(git_token)
}

#[derive(Clone)]
pub struct GithubClient {
    auth: HeaderValue,
    client: Client,
    pub(crate) api_url: String,
}

impl GithubClient {
    /// Fails if the token cannot be sent as an `Authorization` header.
    pub fn new(token: SecretString, api_url: String) -> anyhow::Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("token {}", token.expose_secret()))
            .context("the GitHub token contains characters not allowed in an HTTP header")?;
        auth.set_sensitive(true);
        Ok(GithubClient {
            client: Client::new(),
            auth,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client for `api.github.com`, or for `GITHUB_API_URL` when set.
    pub fn new_with_token(token: SecretString) -> anyhow::Result<Self> {
        Self::new(token, api_url_from(|name| std::env::var(name).ok()))
    }

    pub(crate) async fn send_req(&self, req: RequestBuilder) -> anyhow::Result<(Bytes, String)> {
        log::debug!("send_req with {:?}", req);
        let req_dbg = format!("{req:?}");
        let req = req
            .build()
            .with_context(|| format!("building reqwest {req_dbg}"))?;

        let resp = self.client.execute(req).await?;
        let maybe_err = resp.error_for_status_ref().err();
        let body = resp
            .bytes()
            .await
            .with_context(|| format!("failed to read response body {req_dbg}"))?;
        if let Some(e) = maybe_err {
            return Err(anyhow::Error::new(e))
                .with_context(|| format!("response: {}", String::from_utf8_lossy(&body)));
        }

        Ok((body, req_dbg))
    }

    pub(crate) async fn json<T>(&self, req: RequestBuilder) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let (body, req_dbg) = self.send_req(req).await?;
        serde_json::from_slice(&body).with_context(|| format!("failed to decode {req_dbg}"))
    }

    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        log::trace!("get {:?}", url);
        self.client.get(url).configure(self)
    }

    pub(crate) fn patch(&self, url: &str) -> RequestBuilder {
        log::trace!("patch {:?}", url);
        self.client.patch(url).configure(self)
    }

    pub(crate) fn delete(&self, url: &str) -> RequestBuilder {
        log::trace!("delete {:?}", url);
        self.client.delete(url).configure(self)
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        log::trace!("post {:?}", url);
        self.client.post(url).configure(self)
    }
}

trait RequestSend: Sized {
    fn configure(self, g: &GithubClient) -> Self;
}

impl RequestSend for RequestBuilder {
    fn configure(self, g: &GithubClient) -> RequestBuilder {
        self.header(USER_AGENT, "close-pending")
            .header(AUTHORIZATION, g.auth.clone())
    }
}
