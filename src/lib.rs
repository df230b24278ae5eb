pub mod aggregate;
pub mod app;
pub mod batch;
pub mod config;
pub mod domain;
pub mod error;
pub mod feature;
pub mod output;
pub mod projection;
pub mod request;
pub mod service;
pub mod table;

pub use app::{App, PullOptions, Pulled};
pub use domain::{ANALYSIS_CRS, BatchSize, Crs, LayerUrl, ObjectId, SOURCE_CRS};
pub use error::GeotableError;
pub use feature::Feature;
pub use service::{ArcGisHttpClient, FeatureService};
pub use table::GeoTable;
