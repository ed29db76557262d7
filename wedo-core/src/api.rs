//! HTTP client for the invites API.
//!
//! Every call is a single request with no retry. Any non-2xx answer is turned
//! into [`WeDoError::Http`], transport failures into [`WeDoError::Transport`].

use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{WeDoError, WeDoResult};
use crate::invite::{CreateInviteRequest, Guest, Invite, RespondToInviteRequest, UpdateInviteRequest};

const API_KEY_HEADER: &str = "x-api-key";

/// Typed client for the invites REST API
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

// Response envelopes used by the API

#[derive(Deserialize)]
struct ItemResponse<T> {
    item: T,
}

#[derive(Deserialize)]
struct ItemsResponse<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewItemResponse<T> {
    new_item: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlResponse {
    upload_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RespondBody<'a> {
    org_id: &'a str,
    family_name: &'a str,
    attending: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentRequest<'a> {
    file_name: &'a str,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> WeDoResult<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(WeDoError::Config(
                "API endpoint not configured. Set api.endpoint in config.toml or WEDO_API__ENDPOINT"
                    .into(),
            ));
        }

        let endpoint = Url::parse(config.endpoint.trim())
            .map_err(|e| WeDoError::Config(format!("Invalid API endpoint '{}': {e}", config.endpoint)))?;

        if endpoint.cannot_be_a_base() {
            return Err(WeDoError::Config(format!(
                "Invalid API endpoint '{}'",
                config.endpoint
            )));
        }

        Ok(ApiClient {
            http: reqwest::Client::new(),
            endpoint,
            api_key: config.key.clone(),
        })
    }

    /// Build `<endpoint>/<segments...>`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> WeDoResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| WeDoError::Config(format!("Invalid API endpoint '{}'", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn public(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
    }

    fn authorized(&self, builder: RequestBuilder, id_token: &str) -> RequestBuilder {
        self.public(builder).bearer_auth(id_token)
    }

    /// GET /invites/:id
    pub async fn get_invite(&self, id_token: &str, invite_id: &str) -> WeDoResult<Invite> {
        log::debug!("Fetching invite {invite_id}");

        let url = self.url(&["invites", invite_id])?;
        let resp = send(self.authorized(self.http.get(url), id_token)).await?;
        let body: ItemResponse<Invite> = decode(resp).await?;

        log::trace!("Invite: {:?}", body.item);
        Ok(body.item)
    }

    /// GET /invites
    pub async fn get_invites(&self, id_token: &str) -> WeDoResult<Vec<Invite>> {
        log::debug!("Fetching invites");

        let url = self.url(&["invites"])?;
        let resp = send(self.authorized(self.http.get(url), id_token)).await?;
        let body: ItemsResponse<Invite> = decode(resp).await?;

        log::trace!("Invites: {:?}", body.items);
        Ok(body.items)
    }

    /// GET /invites/:id/guests
    pub async fn get_guests(&self, id_token: &str, invite_id: &str) -> WeDoResult<Vec<Guest>> {
        log::debug!("Fetching guests from invite {invite_id}");

        let url = self.url(&["invites", invite_id, "guests"])?;
        let resp = send(self.authorized(self.http.get(url), id_token)).await?;
        let body: ItemsResponse<Guest> = decode(resp).await?;

        log::trace!("Guests: {:?}", body.items);
        Ok(body.items)
    }

    /// POST /invites
    pub async fn create_invite(
        &self,
        id_token: &str,
        req: &CreateInviteRequest,
    ) -> WeDoResult<Invite> {
        log::debug!("Creating invite for {}", req.family_name);

        let url = self.url(&["invites"])?;
        let resp = send(self.authorized(self.http.post(url), id_token).json(req)).await?;
        let body: NewItemResponse<Invite> = decode(resp).await?;

        Ok(body.new_item)
    }

    /// PATCH /invites/:id
    pub async fn patch_invite(
        &self,
        id_token: &str,
        invite_id: &str,
        update: &UpdateInviteRequest,
    ) -> WeDoResult<()> {
        log::debug!("Patching invite {invite_id}");

        let url = self.url(&["invites", invite_id])?;
        send(self.authorized(self.http.patch(url), id_token).json(update)).await?;
        Ok(())
    }

    /// PATCH /invites/:id/respond
    ///
    /// Public: no bearer token. The invite code, organizer id and family name
    /// together authorize the response.
    pub async fn respond_to_invite(&self, req: &RespondToInviteRequest) -> WeDoResult<()> {
        log::debug!("Responding to invite {}", req.invite_id);

        let url = self.url(&["invites", &req.invite_id, "respond"])?;
        let body = RespondBody {
            org_id: &req.org_id,
            family_name: &req.family_name,
            attending: req.attending,
        };
        send(self.public(self.http.patch(url)).json(&body)).await?;
        Ok(())
    }

    /// DELETE /invites/:id
    pub async fn delete_invite(&self, id_token: &str, invite_id: &str) -> WeDoResult<()> {
        log::debug!("Deleting invite {invite_id}");

        let url = self.url(&["invites", invite_id])?;
        send(self.authorized(self.http.delete(url), id_token)).await?;
        Ok(())
    }

    /// POST /invites/:id/attachment, returning a pre-signed upload URL
    pub async fn get_upload_url(
        &self,
        id_token: &str,
        invite_id: &str,
        file_name: &str,
    ) -> WeDoResult<String> {
        log::debug!("Requesting upload URL for {file_name} on invite {invite_id}");

        let url = self.url(&["invites", invite_id, "attachment"])?;
        let req = AttachmentRequest { file_name };
        let resp = send(self.authorized(self.http.post(url), id_token).json(&req)).await?;
        let body: UploadUrlResponse = decode(resp).await?;

        Ok(body.upload_url)
    }

    /// PUT the raw file bytes to a pre-signed URL.
    pub async fn upload_file(&self, upload_url: &str, file: Vec<u8>) -> WeDoResult<()> {
        log::debug!("Uploading {} bytes", file.len());

        send(self.http.put(upload_url).body(file)).await?;
        Ok(())
    }
}

async fn send(builder: RequestBuilder) -> WeDoResult<Response> {
    let resp = builder.send().await?;
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        log::debug!("Request failed with {status}: {body}");
        return Err(WeDoError::Http {
            status: status.as_u16(),
            body,
        });
    }

    Ok(resp)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> WeDoResult<T> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| WeDoError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invite::InviteType;
    use serde_json::json;
    use wiremock::matchers::{body_bytes, body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig {
            endpoint: format!("{}/dev", server.uri()),
            key: "test-key".into(),
        })
        .unwrap()
    }

    fn invite_json(id: &str, family_name: &str) -> serde_json::Value {
        json!({
            "inviteId": id,
            "familyName": family_name,
            "createTs": "2021-06-01T12:00:00.000Z",
            "type": "guest",
            "responded": false,
            "attending": false
        })
    }

    #[tokio::test]
    async fn get_invites_sends_auth_headers_and_keeps_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dev/invites"))
            .and(header("authorization", "Bearer token-1"))
            .and(header("x-api-key", "test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [invite_json("B2", "Smith"), invite_json("A1", "Lee")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let invites = client(&server).get_invites("token-1").await.unwrap();

        let ids: Vec<_> = invites.iter().map(|i| i.invite_id.as_str()).collect();
        assert_eq!(ids, vec!["B2", "A1"]);
    }

    #[tokio::test]
    async fn get_invite_unwraps_item() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dev/invites/A1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "item": invite_json("A1", "Lee") })),
            )
            .mount(&server)
            .await;

        let invite = client(&server).get_invite("t", "A1").await.unwrap();
        assert_eq!(invite.family_name, "Lee");
        assert_eq!(invite.invite_type, InviteType::Guest);
    }

    #[tokio::test]
    async fn not_found_surfaces_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dev/invites/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = client(&server).get_invite("t", "missing").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Request failed with status code 404");
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dev/invites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": 1 })))
            .mount(&server)
            .await;

        let err = client(&server).get_invites("t").await.unwrap_err();
        assert!(matches!(err, WeDoError::Decode(_)));
    }

    #[tokio::test]
    async fn get_guests_hits_nested_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dev/invites/A1/guests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "guestId": "g1", "fullName": "Ann Lee", "contact": "ann@example.com" }]
            })))
            .mount(&server)
            .await;

        let guests = client(&server).get_guests("t", "A1").await.unwrap();
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].contact_or_default(), "ann@example.com");
    }

    #[tokio::test]
    async fn create_invite_posts_request_and_returns_new_item() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/dev/invites"))
            .and(body_json(json!({ "familyName": "Smith", "type": "zoom" })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({ "newItem": invite_json("N1", "Smith") })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let req = CreateInviteRequest {
            family_name: "Smith".into(),
            invite_type: InviteType::Zoom,
        };
        let created = client(&server).create_invite("t", &req).await.unwrap();
        assert_eq!(created.invite_id, "N1");
    }

    #[tokio::test]
    async fn respond_is_public_and_sends_id_in_path() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/dev/invites/XYZ123/respond"))
            .and(header("x-api-key", "test-key"))
            .and(body_json(json!({ "orgId": "abc", "familyName": "Smith", "attending": true })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let req = RespondToInviteRequest {
            org_id: "abc".into(),
            invite_id: "XYZ123".into(),
            family_name: "Smith".into(),
            attending: true,
        };
        client(&server).respond_to_invite(&req).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn delete_and_patch_use_invite_path() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/dev/invites/A1"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/dev/invites/A1"))
            .and(body_json(json!({ "responded": true })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server);
        let patch = UpdateInviteRequest {
            responded: Some(true),
            ..Default::default()
        };
        api.patch_invite("t", "A1", &patch).await.unwrap();
        api.delete_invite("t", "A1").await.unwrap();
    }

    #[tokio::test]
    async fn upload_is_two_steps() {
        let server = MockServer::start().await;
        let upload_url = format!("{}/bucket/a.pdf?sig=1", server.uri());

        Mock::given(method("POST"))
            .and(path("/dev/invites/A1/attachment"))
            .and(body_json(json!({ "fileName": "a.pdf" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "uploadUrl": upload_url })),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/bucket/a.pdf"))
            .and(body_bytes(b"%PDF".to_vec()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server);
        let url = api.get_upload_url("t", "A1", "a.pdf").await.unwrap();
        assert_eq!(url, upload_url);
        api.upload_file(&url, b"%PDF".to_vec()).await.unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let put = requests.iter().find(|r| r.method.as_str() == "PUT").unwrap();
        assert!(put.headers.get("x-api-key").is_none());
    }

    #[test]
    fn path_segments_are_encoded() {
        let api = ApiClient::new(&ApiConfig {
            endpoint: "https://api.example.com/dev/".into(),
            key: String::new(),
        })
        .unwrap();

        let url = api.url(&["invites", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/dev/invites/a%2Fb%20c");
    }

    #[test]
    fn empty_endpoint_is_a_config_error() {
        let err = ApiClient::new(&ApiConfig::default()).err().unwrap();
        assert!(matches!(err, WeDoError::Config(_)));
    }
}
