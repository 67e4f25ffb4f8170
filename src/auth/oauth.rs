use anyhow::{Result, anyhow};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, ResourceOwnerPassword,
    ResourceOwnerUsername, Scope, TokenResponse, TokenUrl,
};
use reqwest::blocking::Client;
use reqwest::redirect;

const AUTHORIZE_URL: &str = "https://www.reddit.com/api/v1/authorize";
const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Tokens returned by the oauth flow (in-memory)
pub struct Tokens {
    pub access_token: String,
    pub expires_in: Option<u64>,
}

/// Reddit "script" app credentials.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

/// HTTP client for the token endpoint. Reddit throttles requests without a
/// descriptive User-Agent; redirects are not followed.
pub fn token_client(user_agent: &str) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(user_agent)
        .redirect(redirect::Policy::none())
        .build()?)
}

/// Sends an oauth2 request through `client`, keeping its default headers.
fn send(client: &Client, request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
    let response = client
        .request(request.method, request.url.as_str())
        .headers(request.headers)
        .body(request.body)
        .send()?;

    let status_code = response.status();
    let headers = response.headers().to_owned();
    let body = response.bytes()?.to_vec();
    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

/// Exchange the account password for an access token (resource owner password grant).
pub fn password_grant(creds: &Credentials, http: &Client) -> Result<Tokens> {
    let oauth_client = BasicClient::new(
        ClientId::new(creds.client_id.clone()),
        Some(ClientSecret::new(creds.client_secret.clone())),
        AuthUrl::new(AUTHORIZE_URL.to_string())?,
        Some(TokenUrl::new(TOKEN_URL.to_string())?),
    );

    let token = oauth_client
        .exchange_password(
            &ResourceOwnerUsername::new(creds.username.clone()),
            &ResourceOwnerPassword::new(creds.password.clone()),
        )
        .add_scope(Scope::new("*".to_string()))
        .request(|req| send(http, req))
        .map_err(|e| anyhow!("token request for u/{} failed: {e}", creds.username))?;

    Ok(Tokens {
        access_token: token.access_token().secret().to_string(),
        expires_in: token.expires_in().map(|d| d.as_secs()),
    })
}
