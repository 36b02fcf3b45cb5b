//! HTTP client for the CAFM API.
//!
//! Thin request/response layer: every method is one endpoint, every failure
//! is converted into [`Error`](super::error::Error). Callers own retry
//! policy; nothing here retries.

use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::context::RequestContext;
use super::error::{Error, Result};
use super::models::{
    Asset, AssetSummary, IssueCategory, LocationNode, NewServiceRequest, ServiceRequest,
};

/// Client handle. Cheap to clone; views clone it into spawned tasks.
#[derive(Debug, Clone)]
pub struct CafmClient {
    http: reqwest::Client,
    ctx: RequestContext,
}

impl CafmClient {
    pub fn new(ctx: RequestContext) -> Self {
        Self {
            http: reqwest::Client::new(),
            ctx,
        }
    }

    /// Full location hierarchy, ordered roots with nested children.
    pub async fn fetch_location_tree(&self) -> Result<Vec<LocationNode>> {
        self.get_json("locations/tree", &[]).await
    }

    /// Single asset by id, including its owning location when it has one.
    #[instrument(skip(self))]
    pub async fn fetch_asset(&self, asset_id: &str) -> Result<Asset> {
        self.get_json(&format!("assets/{asset_id}"), &[]).await
    }

    /// Assets, optionally scoped to one location. No filter returns the
    /// unscoped list.
    pub async fn fetch_assets(&self, location_id: Option<&str>) -> Result<Vec<AssetSummary>> {
        match location_id {
            Some(id) => self.get_json("assets", &[("location_id", id)]).await,
            None => self.get_json("assets", &[]).await,
        }
    }

    /// Issue category taxonomy roots with nested children.
    pub async fn fetch_issue_categories(&self) -> Result<Vec<IssueCategory>> {
        self.get_json("issue-categories", &[]).await
    }

    pub async fn list_service_requests(&self) -> Result<Vec<ServiceRequest>> {
        self.get_json("service-requests", &[]).await
    }

    pub async fn fetch_service_request(&self, id: &str) -> Result<ServiceRequest> {
        self.get_json(&format!("service-requests/{id}"), &[]).await
    }

    /// Submit one service request as a single multipart operation.
    ///
    /// `description` is appended only when present; the field is omitted
    /// entirely rather than sent empty. Image parts keep their original
    /// order under the repeated `images` field.
    #[instrument(skip(self, request))]
    pub async fn submit_service_request(
        &self,
        request: &NewServiceRequest,
    ) -> Result<ServiceRequest> {
        let mut form = Form::new()
            .text("location_id", request.location_id.clone())
            .text("category_id", request.category_id.clone());

        if let Some(asset_id) = &request.asset_id {
            form = form.text("asset_id", asset_id.clone());
        }
        if let Some(description) = &request.description {
            form = form.text("description", description.clone());
        }
        for image in &request.images {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(guess_mime(&image.file_name))?;
            form = form.part("images", part);
        }

        let response = self
            .http
            .post(self.ctx.endpoint("service-requests"))
            .bearer_auth(self.ctx.token())
            .header("X-Tenant", self.ctx.tenant())
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .http
            .get(self.ctx.endpoint(path))
            .bearer_auth(self.ctx.token())
            .header("X-Tenant", self.ctx.tenant())
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = extract_error_message(response).await;
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

/// Pull a human-readable message out of an error response. Servers answer
/// with `{"message": "..."}`; anything else degrades to the raw body or
/// the bare status.
async fn extract_error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime_known_extensions() {
        assert_eq!(guess_mime("leak.JPG"), "image/jpeg");
        assert_eq!(guess_mime("door.png"), "image/png");
        assert_eq!(guess_mime("panel.webp"), "image/webp");
    }

    #[test]
    fn test_guess_mime_unknown_falls_back() {
        assert_eq!(guess_mime("notes.txt"), "application/octet-stream");
        assert_eq!(guess_mime("no-extension"), "application/octet-stream");
    }
}
