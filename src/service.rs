use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::domain::{LayerUrl, ObjectId};
use crate::error::GeotableError;
use crate::feature::Feature;
use crate::request::QueryRequest;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub trait FeatureService: Send + Sync {
    fn object_ids(&self) -> Result<Vec<ObjectId>, GeotableError>;
    fn features(&self, ids: &[ObjectId]) -> Result<Vec<Feature>, GeotableError>;
}

#[derive(Clone)]
pub struct ArcGisHttpClient {
    client: Client,
    layer: LayerUrl,
    token: Option<String>,
}

impl ArcGisHttpClient {
    pub fn new(layer: LayerUrl, token: Option<String>) -> Result<Self, GeotableError> {
        Self::with_timeout(layer, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        layer: LayerUrl,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GeotableError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("agol-pull/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| GeotableError::Transport(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| GeotableError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            layer,
            token,
        })
    }

    pub fn layer(&self) -> &LayerUrl {
        &self.layer
    }

    fn send(&self, request: &QueryRequest) -> Result<Value, GeotableError> {
        debug!(?request, method = ?request.method(), "sending feature service query");
        let response = request
            .build(&self.client)
            .send()
            .map_err(|err| GeotableError::Transport(err.without_url().to_string()))?;
        let response = Self::handle_status(response)?;
        let body: Value = response
            .json()
            .map_err(|err| GeotableError::MalformedResponse(err.without_url().to_string()))?;
        check_error_envelope(&body)?;
        Ok(body)
    }

    fn handle_status(response: Response) -> Result<Response, GeotableError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "feature service request failed".to_string());
        Err(GeotableError::HttpStatus { status, message })
    }
}

impl FeatureService for ArcGisHttpClient {
    fn object_ids(&self) -> Result<Vec<ObjectId>, GeotableError> {
        let request = QueryRequest::object_ids(&self.layer, self.token.as_deref())?;
        let body = self.send(&request)?;
        parse_object_ids(&body)
    }

    fn features(&self, ids: &[ObjectId]) -> Result<Vec<Feature>, GeotableError> {
        let request = QueryRequest::features(&self.layer, ids, self.token.as_deref())?;
        let body = self.send(&request)?;
        parse_features(body)
    }
}

/// Feature services report many failures (bad token, bad query) as a 200
/// response carrying `{"error": {"code": .., "message": ..}}`.
pub fn check_error_envelope(body: &Value) -> Result<(), GeotableError> {
    let Some(error) = body.get("error") else {
        return Ok(());
    };
    let status = error
        .get("code")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
        .unwrap_or(0);
    let mut message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("feature service reported an error")
        .to_string();
    let details = error
        .get("details")
        .and_then(Value::as_array)
        .map(|details| {
            details
                .iter()
                .filter_map(Value::as_str)
                .filter(|detail| !detail.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    if !details.is_empty() {
        message = format!("{message} ({})", details.join("; "));
    }
    Err(GeotableError::HttpStatus { status, message })
}

/// Reads `objectIds` out of a `returnIdsOnly=true` response. The service
/// sends `null` rather than `[]` for an empty layer.
pub fn parse_object_ids(body: &Value) -> Result<Vec<ObjectId>, GeotableError> {
    check_error_envelope(body)?;
    let ids = body
        .get("objectIds")
        .ok_or_else(|| GeotableError::MalformedResponse("missing objectIds".to_string()))?;
    if ids.is_null() {
        return Ok(Vec::new());
    }
    let ids = ids
        .as_array()
        .ok_or_else(|| GeotableError::MalformedResponse("objectIds is not a list".to_string()))?;
    ids.iter()
        .map(|value| {
            value.as_i64().map(ObjectId::new).ok_or_else(|| {
                GeotableError::MalformedResponse(format!("object id {value} is not an integer"))
            })
        })
        .collect()
}

pub fn parse_features(mut body: Value) -> Result<Vec<Feature>, GeotableError> {
    check_error_envelope(&body)?;
    let features = body
        .get_mut("features")
        .ok_or_else(|| GeotableError::MalformedResponse("missing features".to_string()))?
        .as_array_mut()
        .ok_or_else(|| GeotableError::MalformedResponse("features is not a list".to_string()))?;
    Ok(std::mem::take(features)
        .into_iter()
        .map(Feature::from_value)
        .collect())
}
