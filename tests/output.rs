mod support;

use std::time::Duration;

use camino::Utf8PathBuf;

use agol_geotable::app::{App, ProgressEvent, ProgressSink, PullOptions};
use agol_geotable::domain::{BatchSize, ObjectId};
use agol_geotable::error::GeotableError;
use agol_geotable::feature::Feature;
use agol_geotable::output::{ProgressWriter, write_geojson};
use agol_geotable::service::FeatureService;
use agol_geotable::table::build;

use support::{ids, point_feature};

struct Stations;

impl FeatureService for Stations {
    fn object_ids(&self) -> Result<Vec<ObjectId>, GeotableError> {
        Ok(ids(1..=5))
    }

    fn features(&self, ids: &[ObjectId]) -> Result<Vec<Feature>, GeotableError> {
        Ok(ids
            .iter()
            .map(|id| point_feature(id.get(), -122.0, 37.0))
            .collect())
    }
}

#[test]
fn writes_feature_collection_to_nested_path() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    let path = root.join("out").join("stations.geojson");

    let table = build(
        vec![point_feature(1, -122.0, 37.0), point_feature(2, -122.5, 38.0)],
        false,
    )
    .unwrap();
    write_geojson(&table, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let collection: geojson::FeatureCollection = text
        .parse::<geojson::GeoJson>()
        .unwrap()
        .try_into()
        .unwrap();
    assert_eq!(collection.features.len(), 2);
    let properties = collection.features[0].properties.as_ref().unwrap();
    assert_eq!(properties["name"], serde_json::json!("station 1"));
}

#[test]
fn progress_writer_prints_chunk_count_then_batches() {
    let sink = ProgressWriter::new(Vec::new());
    let options = PullOptions {
        batch_size: BatchSize::new(2).unwrap(),
        reproject: false,
    };
    App::new(Stations).pull(options, &sink).unwrap();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Breaking feature service layer IDs into 3 chunks ("));
    assert!(lines[1].starts_with("phase=Fetch; batch 1/3; 2 features"));
    assert!(lines[3].starts_with("phase=Fetch; batch 3/3; 1 features"));
    assert!(lines[4].starts_with("phase=Build; 5 rows in EPSG:4326"));
}

#[test]
fn progress_writer_omits_missing_elapsed_time() {
    let sink = ProgressWriter::new(Vec::new());
    sink.event(ProgressEvent {
        message: "done".to_string(),
        elapsed: None,
    });
    sink.event(ProgressEvent {
        message: "slow".to_string(),
        elapsed: Some(Duration::from_millis(1500)),
    });
    let text = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(text, "done\nslow (1.5s)\n");
}
