use crate::error::{PortalError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_UPLOAD_URL: &str = "https://mods.factorio.com/api/v2/mods/releases/init_upload";
pub const DEFAULT_IMAGES_URL: &str = "https://mods.factorio.com/api/v2/mods/images";

/// Reads an API key from the named environment variable
pub fn api_key_from_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(PortalError::MissingApiKey(var.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct InitUploadResponse {
    upload_url: String,
}

/// HTTP client for a single mod on the portal
pub struct ModPortal {
    client: Client,
    mod_name: String,
    upload_url: String,
    images_url: String,
}

impl ModPortal {
    /// Create a portal client with explicit endpoints
    pub fn with_endpoints<S: Into<String>>(
        mod_name: S,
        upload_url: &str,
        images_url: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;

        Ok(Self {
            client,
            mod_name: mod_name.into(),
            upload_url: upload_url.to_string(),
            images_url: images_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload a release archive
    pub async fn upload_release(&self, api_key: &str, archive: &Path) -> Result<()> {
        let url = self.upload_url.clone();
        self.init_upload(&url, api_key, archive, "file")
            .await
            .map_err(|e| e.with_context(format!("Failed to upload '{}'", archive.display())))
    }

    /// Remove every gallery image from the mod page
    pub async fn clear_images(&self, api_key: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/edit", self.images_url))
            .bearer_auth(api_key)
            .form(&[("mod", self.mod_name.as_str()), ("images", "")])
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Append one image to the mod's gallery
    pub async fn add_image(&self, api_key: &str, image: &Path) -> Result<()> {
        let url = format!("{}/add", self.images_url);
        self.init_upload(&url, api_key, image, "image")
            .await
            .map_err(|e| e.with_context(format!("Failed to upload image '{}'", image.display())))
    }

    /// Request an upload slot at `init_url`, then post the file to it
    /// under the multipart field `field`
    pub async fn init_upload(
        &self,
        init_url: &str,
        api_key: &str,
        file: &Path,
        field: &str,
    ) -> Result<()> {
        let response = self
            .client
            .post(init_url)
            .bearer_auth(api_key)
            .form(&[("mod", self.mod_name.as_str())])
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let body = response.text().await?;
        let init: InitUploadResponse = serde_json::from_str(&body)
            .map_err(|e| PortalError::InvalidResponse(format!("{} in '{}'", e, body.trim())))?;

        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| field.to_string());
        let form = Form::new().part(field.to_string(), Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(&init.upload_url)
            .multipart(form)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(PortalError::remote(status.as_u16(), body))
}
