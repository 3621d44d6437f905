use reqwest::RequestBuilder;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::api_error::extract_provider_message;
use crate::provider::{LLMError, Result};

/// POST a JSON body and return the raw success body.
///
/// Non-2xx statuses become `LLMError::Status` with the provider message
/// extracted from the error body. Cancellation drops the in-flight request.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    builder: RequestBuilder,
    body: &B,
    cancel: &CancellationToken,
) -> Result<String> {
    let exchange = async {
        let response = builder.json(body).send().await.map_err(LLMError::Http)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LLMError::Status {
                status: status.as_u16(),
                message: extract_provider_message(&text),
            });
        }
        response.text().await.map_err(LLMError::Http)
    };

    tokio::select! {
        _ = cancel.cancelled() => Err(LLMError::Cancelled),
        result = exchange => result,
    }
}
