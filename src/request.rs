use reqwest::blocking::{Client, RequestBuilder};
use url::Url;

use crate::domain::{LayerUrl, ObjectId};
use crate::error::GeotableError;

// proxies and IIS-hosted services reject longer GET urls
pub const MAX_GET_URL_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMethod {
    Get,
    Post,
}

#[derive(Clone)]
pub struct QueryRequest {
    endpoint: Url,
    params: Vec<(String, String)>,
}

impl QueryRequest {
    pub fn object_ids(layer: &LayerUrl, token: Option<&str>) -> Result<Self, GeotableError> {
        let mut request = Self::new(layer)?;
        request
            .push("outFields", "*")
            .push("where", "1=1")
            .push("f", "json")
            .push("returnIdsOnly", "true");
        request.push_token(token);
        Ok(request)
    }

    pub fn features(
        layer: &LayerUrl,
        ids: &[ObjectId],
        token: Option<&str>,
    ) -> Result<Self, GeotableError> {
        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let mut request = Self::new(layer)?;
        request
            .push("outFields", "*")
            .push("where", "")
            .push("objectIds", &joined)
            .push("f", "geojson");
        request.push_token(token);
        Ok(request)
    }

    fn new(layer: &LayerUrl) -> Result<Self, GeotableError> {
        let mut endpoint = layer.as_url().clone();
        endpoint.set_query(None);
        endpoint.set_fragment(None);
        endpoint
            .path_segments_mut()
            .map_err(|_| GeotableError::InvalidLayerUrl(layer.to_string()))?
            .pop_if_empty()
            .push("query");
        Ok(Self {
            endpoint,
            params: Vec::new(),
        })
    }

    fn push(&mut self, name: &str, value: &str) -> &mut Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    fn push_token(&mut self, token: Option<&str>) {
        if let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) {
            self.push("token", token);
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(&self.params);
        url
    }

    pub fn method(&self) -> QueryMethod {
        if self.get_url().as_str().len() <= MAX_GET_URL_LEN {
            QueryMethod::Get
        } else {
            QueryMethod::Post
        }
    }

    pub fn build(&self, client: &Client) -> RequestBuilder {
        match self.method() {
            QueryMethod::Get => client.get(self.get_url()),
            QueryMethod::Post => client.post(self.endpoint.clone()).form(&self.params),
        }
    }
}

// Hand-written so the token never reaches logs.
impl std::fmt::Debug for QueryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .params
            .iter()
            .map(|(key, value)| {
                if key == "token" {
                    (key.as_str(), "<redacted>")
                } else {
                    (key.as_str(), value.as_str())
                }
            })
            .collect::<Vec<_>>();
        f.debug_struct("QueryRequest")
            .field("endpoint", &self.endpoint.as_str())
            .field("params", &params)
            .finish()
    }
}
