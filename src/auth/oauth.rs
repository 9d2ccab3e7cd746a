use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::reqwest::http_client;
use oauth2::{
    AuthType, AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, RequestTokenError,
    Scope, TokenResponse, TokenUrl,
};

use crate::error::GraphError;

pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// App registration identity used for the client-credentials grant.
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// e.g. `https://login.microsoftonline.com/<tenant>`
    pub authority: String,
}

impl ClientCredentials {
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority.trim_end_matches('/'))
    }

    fn authorize_url(&self) -> String {
        format!(
            "{}/oauth2/v2.0/authorize",
            self.authority.trim_end_matches('/')
        )
    }
}

/// Exchange client credentials for an app-only access token.
pub fn acquire_token_for_client(
    credentials: &ClientCredentials,
    scopes: &[&str],
) -> Result<String, GraphError> {
    acquire_token_with(credentials, scopes, http_client)
}

/// Same as [`acquire_token_for_client`] with a caller-supplied HTTP function.
pub fn acquire_token_with<F, RE>(
    credentials: &ClientCredentials,
    scopes: &[&str],
    http: F,
) -> Result<String, GraphError>
where
    F: FnOnce(HttpRequest) -> Result<HttpResponse, RE>,
    RE: std::error::Error + 'static,
{
    let auth_url = AuthUrl::new(credentials.authorize_url()).map_err(|e| {
        GraphError::Authentication(format!(
            "invalid authority '{}': {e}",
            credentials.authority
        ))
    })?;
    let token_url = TokenUrl::new(credentials.token_url()).map_err(|e| {
        GraphError::Authentication(format!(
            "invalid authority '{}': {e}",
            credentials.authority
        ))
    })?;

    // Secret travels in the form body, not a Basic auth header.
    let client = BasicClient::new(
        ClientId::new(credentials.client_id.clone()),
        Some(ClientSecret::new(credentials.client_secret.clone())),
        auth_url,
        Some(token_url),
    )
    .set_auth_type(AuthType::RequestBody);

    let mut request = client.exchange_client_credentials();
    for scope in scopes {
        request = request.add_scope(Scope::new(scope.to_string()));
    }

    log::debug!("requesting token from {}", credentials.token_url());
    let token = request.request(http).map_err(describe_token_error)?;

    let access = token.access_token().secret();
    if access.is_empty() {
        return Err(GraphError::Authentication(
            "identity provider returned an empty access token".to_string(),
        ));
    }

    log::info!(
        "acquired access token (expires in {:?})",
        token.expires_in().map(|d| d.as_secs())
    );
    Ok(access.to_string())
}

fn describe_token_error<RE>(err: RequestTokenError<RE, BasicErrorResponse>) -> GraphError
where
    RE: std::error::Error + 'static,
{
    let msg = match err {
        RequestTokenError::ServerResponse(resp) => {
            format!("identity provider rejected the request: {resp}")
        }
        RequestTokenError::Request(e) => format!("token request failed: {e}"),
        RequestTokenError::Parse(e, _) => {
            format!("response did not contain an access token: {e}")
        }
        RequestTokenError::Other(s) => s,
    };
    GraphError::Authentication(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauth2::http::header::CONTENT_TYPE;
    use oauth2::http::{HeaderMap, HeaderValue, StatusCode};
    use std::cell::RefCell;

    fn creds() -> ClientCredentials {
        ClientCredentials {
            client_id: "app-id".to_string(),
            client_secret: "s3cret".to_string(),
            authority: "https://login.microsoftonline.com/contoso/".to_string(),
        }
    }

    fn json_reply(status: u16, body: &str) -> HttpResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        HttpResponse {
            status_code: StatusCode::from_u16(status).unwrap(),
            headers,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn returns_token_from_provider_reply() {
        let seen: RefCell<Option<HttpRequest>> = RefCell::new(None);
        let token = acquire_token_with(&creds(), &[GRAPH_DEFAULT_SCOPE], |req| {
            *seen.borrow_mut() = Some(req);
            Ok::<_, std::io::Error>(json_reply(
                200,
                r#"{"token_type":"Bearer","expires_in":3599,"access_token":"eyJ0eXAi"}"#,
            ))
        })
        .unwrap();
        assert_eq!(token, "eyJ0eXAi");

        let req = seen.into_inner().unwrap();
        assert_eq!(
            req.url.as_str(),
            "https://login.microsoftonline.com/contoso/oauth2/v2.0/token"
        );
        let body = String::from_utf8(req.body).unwrap();
        assert!(body.contains("grant_type=client_credentials"));
        assert!(body.contains("client_id=app-id"));
        assert!(body.contains("client_secret=s3cret"));
        assert!(body.contains("scope=https%3A%2F%2Fgraph.microsoft.com%2F.default"));
    }

    #[test]
    fn missing_access_token_is_authentication_error() {
        let err = acquire_token_with(&creds(), &[GRAPH_DEFAULT_SCOPE], |_| {
            Ok::<_, std::io::Error>(json_reply(200, r#"{"token_type":"Bearer"}"#))
        })
        .unwrap_err();
        assert!(matches!(err, GraphError::Authentication(_)), "{err:?}");
    }

    #[test]
    fn provider_error_reply_is_authentication_error() {
        let err = acquire_token_with(&creds(), &[GRAPH_DEFAULT_SCOPE], |_| {
            Ok::<_, std::io::Error>(json_reply(
                401,
                r#"{"error":"invalid_client","error_description":"bad secret"}"#,
            ))
        })
        .unwrap_err();
        match err {
            GraphError::Authentication(msg) => assert!(msg.contains("invalid_client"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn transport_failure_is_authentication_error() {
        let err = acquire_token_with(&creds(), &[GRAPH_DEFAULT_SCOPE], |_| {
            Err(std::io::Error::other("connection refused"))
        })
        .unwrap_err();
        match err {
            GraphError::Authentication(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
