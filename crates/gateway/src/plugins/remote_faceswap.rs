//! Face-swap generator backed by a hosted model API.
//!
//! Takes the case's template image and first avatar, submits both to a
//! remote prediction endpoint, and downloads the resulting image. All
//! preconditions (credentials, input files) are validated up front so
//! failures carry a precise class instead of a generic exception.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use swapbench_core::TestCase;

use crate::artifact::Artifact;
use crate::error::GenerateError;
use crate::registry::Generator;

/// How long to wait for the prediction and for the output download.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Response shape of the prediction endpoint: a URL to the swapped image.
#[derive(Debug, Deserialize)]
struct PredictionResponse {
    output: Option<String>,
    error: Option<String>,
}

/// Remote face-swap generator.
pub struct RemoteFaceSwap {
    endpoint: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl RemoteFaceSwap {
    /// `endpoint` is the prediction URL; `api_token` comes from
    /// configuration and may be absent, which fails fast at generate time.
    pub fn new(endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    async fn read_input(path: &str, role: &str) -> Result<Vec<u8>, GenerateError> {
        if !Path::new(path).exists() {
            return Err(GenerateError::MissingInput(format!(
                "{role} image not found at {path}"
            )));
        }
        tokio::fs::read(path)
            .await
            .map_err(|e| GenerateError::MissingInput(format!("{role} image unreadable: {e}")))
    }

    fn map_request_error(e: reqwest::Error) -> GenerateError {
        if e.is_timeout() {
            GenerateError::Timeout(e.to_string())
        } else {
            GenerateError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl Generator for RemoteFaceSwap {
    async fn generate(&self, case: &TestCase) -> Result<Artifact, GenerateError> {
        let token = self
            .api_token
            .as_deref()
            .ok_or_else(|| GenerateError::MissingCredentials("API token not set".into()))?;

        let template_path = case
            .template_image
            .as_deref()
            .ok_or_else(|| GenerateError::MissingInput("case has no template image".into()))?;
        let avatar_path = case
            .avatars
            .first()
            .ok_or_else(|| GenerateError::MissingInput("case has no avatar image".into()))?;

        let template = Self::read_input(template_path, "template").await?;
        let avatar = Self::read_input(avatar_path, "avatar").await?;

        tracing::info!(
            case_id = %case.id,
            template = template_path,
            avatar = %avatar_path,
            "Submitting face swap",
        );

        let form = reqwest::multipart::Form::new()
            .part(
                "input_image",
                reqwest::multipart::Part::bytes(template).file_name("template.png"),
            )
            .part(
                "swap_image",
                reqwest::multipart::Part::bytes(avatar).file_name("avatar.png"),
            );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        if !response.status().is_success() {
            return Err(GenerateError::Network(format!(
                "prediction endpoint returned {}",
                response.status()
            )));
        }

        let prediction: PredictionResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::MalformedResponse(e.to_string()))?;

        if let Some(error) = prediction.error {
            return Err(GenerateError::Other(error));
        }
        let output_url = prediction.output.ok_or_else(|| {
            GenerateError::MalformedResponse("no output received from model".into())
        })?;

        tracing::debug!(case_id = %case.id, output_url = %output_url, "Downloading swap result");

        let image = self
            .client
            .get(&output_url)
            .send()
            .await
            .map_err(Self::map_request_error)?
            .error_for_status()
            .map_err(|e| GenerateError::Network(e.to_string()))?
            .bytes()
            .await
            .map_err(Self::map_request_error)?;

        Ok(Artifact::from_png(image.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn missing_token_fails_with_credentials_class() {
        let plugin = RemoteFaceSwap::new("http://localhost:1/predict", None);
        let err = plugin.generate(&TestCase::stub("tc_01")).await.unwrap_err();
        assert_matches!(err, GenerateError::MissingCredentials(_));
    }

    #[tokio::test]
    async fn missing_template_fails_with_input_class() {
        let plugin = RemoteFaceSwap::new("http://localhost:1/predict", Some("tok".into()));
        let err = plugin.generate(&TestCase::stub("tc_01")).await.unwrap_err();
        assert_matches!(err, GenerateError::MissingInput(_));
    }

    #[tokio::test]
    async fn nonexistent_input_file_fails_with_input_class() {
        let plugin = RemoteFaceSwap::new("http://localhost:1/predict", Some("tok".into()));
        let case = TestCase {
            template_image: Some("/nonexistent/template.png".into()),
            avatars: vec!["/nonexistent/avatar.png".into()],
            ..TestCase::stub("tc_01")
        };
        let err = plugin.generate(&case).await.unwrap_err();
        assert_matches!(err, GenerateError::MissingInput(_));
    }
}
