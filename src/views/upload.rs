//! Attachment upload: fetch a pre-signed URL, then PUT the file to it.

use wedo_core::error::WeDoResult;

use super::{Context, Effect};
use crate::render::heading;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    NoUpload,
    FetchingPresignedUrl,
    UploadingFile,
}

#[derive(Debug)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct UploadView {
    invite_id: String,
    file: Option<SelectedFile>,
    state: UploadState,
}

impl UploadView {
    pub fn new(invite_id: impl Into<String>) -> Self {
        UploadView {
            invite_id: invite_id.into(),
            file: None,
            state: UploadState::NoUpload,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.file = Some(SelectedFile {
            name: name.into(),
            bytes,
        });
    }

    pub async fn submit(&mut self, ctx: Context<'_>) -> Vec<Effect> {
        let Some(file) = self.file.take() else {
            return vec![Effect::Error("File should be selected".into())];
        };

        let result = self.upload(ctx, &file).await;
        self.state = UploadState::NoUpload;

        match result {
            Ok(()) => vec![Effect::Alert("File was uploaded!".into())],
            Err(e) => {
                self.file = Some(file);
                vec![Effect::Error(format!("Could not upload a file: {e}"))]
            }
        }
    }

    async fn upload(&mut self, ctx: Context<'_>, file: &SelectedFile) -> WeDoResult<()> {
        let token = ctx.session.id_token()?;

        self.state = UploadState::FetchingPresignedUrl;
        let upload_url = ctx.api.get_upload_url(token, &self.invite_id, &file.name).await?;

        self.state = UploadState::UploadingFile;
        ctx.api.upload_file(&upload_url, file.bytes.clone()).await
    }

    pub fn render(&self) -> String {
        let status = match self.state {
            UploadState::NoUpload => match &self.file {
                Some(file) => format!("Selected {} ({} bytes)", file.name, file.bytes.len()),
                None => "No file selected".to_string(),
            },
            UploadState::FetchingPresignedUrl => "Uploading file metadata".to_string(),
            UploadState::UploadingFile => "Uploading file".to_string(),
        };

        [heading("Upload new attachment"), self.invite_id.clone(), String::new(), status].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{api, logged_in};
    use serde_json::json;
    use wiremock::matchers::{body_bytes, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn uploads_through_presigned_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invites/A1/attachment"))
            .and(body_json(json!({ "fileName": "menu.pdf" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uploadUrl": format!("{}/bucket/A1/menu.pdf", server.uri())
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/bucket/A1/menu.pdf"))
            .and(body_bytes(b"menu".to_vec()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = api(&server);
        let session = logged_in();
        let mut view = UploadView::new("A1");
        view.select_file("menu.pdf", b"menu".to_vec());
        let effects = view.submit(Context { api: &api, session: &session }).await;

        assert_eq!(effects, vec![Effect::Alert("File was uploaded!".into())]);
        assert_eq!(view.state(), UploadState::NoUpload);
    }

    #[tokio::test]
    async fn missing_file_is_rejected_without_requests() {
        let server = MockServer::start().await;
        let api = api(&server);
        let session = logged_in();
        let mut view = UploadView::new("A1");

        let effects = view.submit(Context { api: &api, session: &session }).await;

        assert_eq!(effects, vec![Effect::Error("File should be selected".into())]);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_put_reports_and_resets_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invites/A1/attachment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uploadUrl": format!("{}/bucket/A1/menu.pdf", server.uri())
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/bucket/A1/menu.pdf"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let api = api(&server);
        let session = logged_in();
        let mut view = UploadView::new("A1");
        view.select_file("menu.pdf", b"menu".to_vec());
        let effects = view.submit(Context { api: &api, session: &session }).await;

        assert_eq!(
            effects,
            vec![Effect::Error("Could not upload a file: Request failed with status code 403".into())]
        );
        assert_eq!(view.state(), UploadState::NoUpload);
        assert!(view.render().contains("Selected menu.pdf"));
    }
}
