use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GeotableError;

// under the 1000-2000 record ceiling hosted services enforce
pub const DEFAULT_BATCH_SIZE: usize = 225;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(i64);

impl ObjectId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ObjectId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct BatchSize(NonZeroUsize);

impl BatchSize {
    pub fn new(value: usize) -> Result<Self, GeotableError> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(GeotableError::InvalidBatchSize(value))
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for BatchSize {
    type Error = GeotableError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BatchSize> for usize {
    fn from(value: BatchSize) -> Self {
        value.get()
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crs {
    #[serde(rename = "EPSG:4326")]
    Wgs84,
    #[serde(rename = "EPSG:26910")]
    Nad83Utm10N,
}

pub const SOURCE_CRS: Crs = Crs::Wgs84;

pub const ANALYSIS_CRS: Crs = Crs::Nad83Utm10N;

impl Crs {
    pub const fn epsg(self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Nad83Utm10N => 26910,
        }
    }

    pub const fn is_geographic(self) -> bool {
        matches!(self, Crs::Wgs84)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for Crs {
    type Err = GeotableError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let code = trimmed
            .split_once(':')
            .filter(|(authority, _)| authority.eq_ignore_ascii_case("epsg"))
            .map(|(_, code)| code)
            .unwrap_or(trimmed);
        match code {
            "4326" => Ok(Crs::Wgs84),
            "26910" => Ok(Crs::Nad83Utm10N),
            _ => Err(GeotableError::UnsupportedCrs(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerUrl(Url);

impl LayerUrl {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn has_layer_index(&self) -> bool {
        Regex::new(r"/(?:Feature|Map)Server/\d+/?$")
            .map(|re| re.is_match(self.0.path()))
            .unwrap_or(false)
    }
}

impl fmt::Display for LayerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LayerUrl {
    type Err = GeotableError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(value.trim())
            .map_err(|err| GeotableError::InvalidLayerUrl(format!("{value}: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GeotableError::InvalidLayerUrl(format!(
                "{value}: scheme must be http or https"
            )));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(GeotableError::InvalidLayerUrl(value.to_string()));
        }
        Ok(Self(url))
    }
}
