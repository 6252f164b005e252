//! HTTP client for the feedback backend.

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::contract::{
    check_success, require, AllPersonsResponse, GifExportRequest, PersonScoreRecord,
    ScorePayload, ScoresResponse, StatusOnlyResponse, StatusResponse, UploadResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::upload::UploadFile;

/// Where the batch exporter gets its people from and where server-side GIF
/// exports are requested. Implemented by [`ApiClient`]; tests provide fakes.
#[allow(async_fn_in_trait)]
pub trait ScoreSource {
    async fn all_persons(&self) -> ApiResult<Vec<PersonScoreRecord>>;

    async fn export_gif(&self, request: &GifExportRequest) -> ApiResult<()>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base_url` is the backend origin, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Validates then uploads a spreadsheet; returns the person names found in it.
    pub async fn upload(&self, file: &UploadFile) -> ApiResult<Vec<String>> {
        file.validate()?;
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime())?;
        let form = Form::new().part("file", part);

        info!(file = %file.name, size = file.size(), "uploading spreadsheet");
        let response = self.http.post(self.url("/upload")).multipart(form).send().await?;
        let body: UploadResponse = decode(response).await?;
        check_success(body.success, body.error, "Upload failed")?;
        require(body.persons, "persons")
    }

    pub async fn scores(&self, person: &str) -> ApiResult<ScorePayload> {
        let path = format!("/get_scores/{}", urlencoding::encode(person));
        debug!(%person, "fetching scores");
        let response = self.http.get(self.url(&path)).send().await?;
        let body: ScoresResponse = decode(response).await?;
        check_success(body.success, body.error, "Could not fetch scores")?;
        require(body.scores, "scores")
    }

    pub async fn available_persons(&self) -> ApiResult<Vec<String>> {
        let response = self.http.get(self.url("/status")).send().await?;
        let body: StatusResponse = decode(response).await?;
        Ok(body.available_persons)
    }
}

impl ScoreSource for ApiClient {
    async fn all_persons(&self) -> ApiResult<Vec<PersonScoreRecord>> {
        let response = self
            .http
            .get(self.url("/get_all_persons_data"))
            .send()
            .await?;
        let body: AllPersonsResponse = decode(response).await?;
        check_success(body.success, body.error, "Could not fetch person data")?;
        require(body.persons_data, "persons_data")
    }

    async fn export_gif(&self, request: &GifExportRequest) -> ApiResult<()> {
        info!(person = %request.person_name, path = %request.export_path, "requesting GIF export");
        let response = self
            .http
            .post(self.url("/export_gif"))
            .json(request)
            .send()
            .await?;
        let body: StatusOnlyResponse = decode(response).await?;
        check_success(body.success, body.error, "GIF export failed")
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        // Flask error bodies still carry `{ "error": ... }`; prefer that text.
        if let Ok(StatusOnlyResponse {
            error: Some(message),
            ..
        }) = serde_json::from_str(&text)
        {
            return Err(ApiError::Rejected(message));
        }
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))
}
