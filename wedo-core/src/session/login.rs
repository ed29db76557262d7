//! Browser-based login against an Auth0-style identity provider.
//!
//! The provider is asked for an id token delivered with `response_mode=form_post`,
//! so it arrives as a form POST on the local callback listener.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::DateTime;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use url::Url;
use uuid::Uuid;

use super::Credentials;
use crate::config::AuthConfig;
use crate::error::{WeDoError, WeDoResult};

const SCOPE: &str = "openid profile";

const MAX_CALLBACK_BODY: usize = 64 * 1024;

/// Claims of the id token that the client relies on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Fields posted back to the callback by the provider.
#[derive(Debug, Default, PartialEq)]
struct CallbackForm {
    id_token: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

pub(super) async fn authorize(auth: &AuthConfig) -> WeDoResult<Credentials> {
    let callback = Url::parse(&auth.callback_url)
        .map_err(|e| WeDoError::Config(format!("Invalid auth.callback_url: {e}")))?;
    let port = callback
        .port_or_known_default()
        .ok_or_else(|| WeDoError::Config("auth.callback_url has no port".into()))?;

    let state = Uuid::new_v4().simple().to_string();
    let nonce = Uuid::new_v4().simple().to_string();
    let auth_url = authorize_url(auth, &state, &nonce)?;

    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .map_err(|e| WeDoError::Auth(format!("Failed to bind login callback listener: {e}")))?;

    eprintln!("\nOpen this URL in your browser to log in:\n");
    eprintln!("{}\n", auth_url);

    // Try to open the browser automatically
    if open::that(auth_url.as_str()).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let form = wait_for_callback(listener, callback.path()).await?;
    credentials_from_callback(form, &state, &nonce)
}

fn authorize_url(auth: &AuthConfig, state: &str, nonce: &str) -> WeDoResult<Url> {
    let base = if auth.domain.starts_with("http://") || auth.domain.starts_with("https://") {
        auth.domain.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", auth.domain.trim_end_matches('/'))
    };

    let mut url = Url::parse(&format!("{base}/authorize"))
        .map_err(|e| WeDoError::Config(format!("Invalid auth.domain: {e}")))?;

    url.query_pairs_mut()
        .append_pair("client_id", &auth.client_id)
        .append_pair("redirect_uri", &auth.callback_url)
        .append_pair("response_type", "id_token")
        .append_pair("response_mode", "form_post")
        .append_pair("scope", SCOPE)
        .append_pair("state", state)
        .append_pair("nonce", nonce);

    Ok(url)
}

/// Accept connections until the provider posts to `callback_path`.
///
/// A connection that fails or sends something unexpected is logged and
/// skipped; only the provider's POST ends the wait.
async fn wait_for_callback(listener: TcpListener, callback_path: &str) -> WeDoResult<CallbackForm> {
    loop {
        let stream = match listener.accept().await {
            Ok((stream, _)) => stream,
            Err(e) => {
                log::warn!("Login callback connection failed: {e}");
                continue;
            }
        };

        match handle_connection(stream, callback_path).await {
            Ok(Some(form)) => return Ok(form),
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring bad login callback request: {e}"),
        }
    }
}

/// Read one request; `Some` when it was the provider's form POST.
async fn handle_connection(
    stream: TcpStream,
    callback_path: &str,
) -> WeDoResult<Option<CallbackForm>> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let target_path = target.split('?').next().unwrap_or_default();
    if method != "POST" || target_path != callback_path {
        // Browsers also ask for favicons and the like
        log::debug!("Ignoring {method} {target} on login callback listener");
        let mut stream = reader.into_inner();
        write_response(&mut stream, "404 Not Found", "<h1>Not Found</h1>").await?;
        return Ok(None);
    }

    if content_length > MAX_CALLBACK_BODY {
        let mut stream = reader.into_inner();
        write_response(&mut stream, "413 Payload Too Large", "<h1>Payload Too Large</h1>").await?;
        return Err(WeDoError::Auth(format!(
            "Login callback body of {content_length} bytes exceeds {MAX_CALLBACK_BODY}"
        )));
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;
    let form = parse_callback_form(&body);

    let page = if form.id_token.is_some() {
        "<h1>Login successful!</h1><p>You can close this window and return to the terminal.</p>"
    } else {
        "<h1>Login failed</h1><p>Return to the terminal for details.</p>"
    };
    let mut stream = reader.into_inner();
    write_response(&mut stream, "200 OK", page).await?;

    Ok(Some(form))
}

async fn write_response(
    stream: &mut TcpStream,
    status: &str,
    body: &str,
) -> WeDoResult<()> {
    let response = format!(
        "HTTP/1.1 {status}\r\n\
        Content-Type: text/html\r\n\
        Content-Length: {}\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>{body}</body></html>",
        body.len() + "<html><body></body></html>".len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

fn parse_callback_form(body: &[u8]) -> CallbackForm {
    let mut form = CallbackForm::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        let value = Some(value.into_owned());
        match key.as_ref() {
            "id_token" => form.id_token = value,
            "state" => form.state = value,
            "error" => form.error = value,
            "error_description" => form.error_description = value,
            _ => {}
        }
    }
    form
}

fn credentials_from_callback(
    form: CallbackForm,
    expected_state: &str,
    expected_nonce: &str,
) -> WeDoResult<Credentials> {
    if let Some(error) = form.error {
        let description = form.error_description.unwrap_or_default();
        return Err(WeDoError::Auth(format!("{error}: {description}")));
    }

    if form.state.as_deref() != Some(expected_state) {
        return Err(WeDoError::Auth("Login state mismatch".into()));
    }

    let id_token = form
        .id_token
        .ok_or_else(|| WeDoError::Auth("No id_token in login callback".into()))?;
    let claims = decode_claims(&id_token)?;

    if claims.nonce.as_deref() != Some(expected_nonce) {
        return Err(WeDoError::Auth("Login nonce mismatch".into()));
    }

    let expires_at = DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| WeDoError::Auth(format!("Invalid token expiry {}", claims.exp)))?;

    Ok(Credentials {
        sub: claims.sub,
        id_token,
        expires_at,
    })
}

/// Decode the payload of a JWT without verifying its signature.
///
/// Signature validation belongs to the API; the client only reads `sub` and `exp`.
pub fn decode_claims(id_token: &str) -> WeDoResult<IdTokenClaims> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| WeDoError::Auth("Malformed id token".into()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| WeDoError::Auth(format!("Malformed id token: {e}")))?;

    serde_json::from_slice(&bytes).map_err(|e| WeDoError::Auth(format!("Malformed id token: {e}")))
}
