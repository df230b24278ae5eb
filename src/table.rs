use std::collections::HashMap;

use geo::{Geometry, MapCoords};
use serde_json::{Map, Value, json};

use crate::domain::{ANALYSIS_CRS, Crs, SOURCE_CRS};
use crate::error::GeotableError;
use crate::feature::Feature;
use crate::projection::UtmProjection;

const UTM_ZONE_10: u8 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct GeoRow {
    geometry: Geometry<f64>,
    values: Vec<Value>,
}

impl GeoRow {
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoTable {
    crs: Crs,
    columns: Vec<String>,
    rows: Vec<GeoRow>,
}

impl GeoTable {
    pub fn from_features(features: Vec<Feature>, crs: Crs) -> Result<Self, GeotableError> {
        let mut columns = Vec::new();
        let mut index = HashMap::new();
        let mut parsed = Vec::with_capacity(features.len());

        for (row, feature) in features.into_iter().enumerate() {
            let feature = geojson::Feature::from_json_value(feature.into_value())
                .map_err(|err| GeotableError::Construction(format!("row {row}: {err}")))?;
            let geometry = feature.geometry.ok_or_else(|| {
                GeotableError::Construction(format!("row {row}: feature has no geometry"))
            })?;
            let geometry = Geometry::<f64>::try_from(geometry)
                .map_err(|err| GeotableError::Construction(format!("row {row}: {err}")))?;
            let properties = feature.properties.unwrap_or_default();
            for name in properties.keys() {
                if !index.contains_key(name) {
                    index.insert(name.clone(), columns.len());
                    columns.push(name.clone());
                }
            }
            parsed.push((geometry, properties));
        }

        let rows = parsed
            .into_iter()
            .map(|(geometry, properties)| {
                let mut values = vec![Value::Null; columns.len()];
                for (name, value) in properties {
                    if let Some(&slot) = index.get(&name) {
                        values[slot] = value;
                    }
                }
                GeoRow { geometry, values }
            })
            .collect();

        Ok(Self { crs, columns, rows })
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[GeoRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn geometries(&self) -> impl Iterator<Item = &Geometry<f64>> {
        self.rows.iter().map(GeoRow::geometry)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let slot = self.columns.iter().position(|column| column == name)?;
        Some(self.rows.iter().map(|row| &row.values[slot]).collect())
    }

    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let slot = self.columns.iter().position(|column| column == name)?;
        self.rows.get(row).map(|row| &row.values[slot])
    }

    pub fn to_crs(self, target: Crs) -> Result<Self, GeotableError> {
        if self.crs == target {
            return Ok(self);
        }
        let projection = match (self.crs, target) {
            (Crs::Wgs84, Crs::Nad83Utm10N) => UtmProjection::north(UTM_ZONE_10)
                .map_err(|err| GeotableError::Construction(err.to_string()))?,
            (from, to) => {
                return Err(GeotableError::UnsupportedTransform {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        };

        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(row, GeoRow { geometry, values })| {
                let geometry = geometry
                    .try_map_coords(|coord| projection.forward(coord))
                    .map_err(|err| {
                        GeotableError::Construction(format!("row {row}: {target}: {err}"))
                    })?;
                Ok(GeoRow { geometry, values })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            crs: target,
            columns: self.columns,
            rows,
        })
    }

    // projected tables carry the legacy `crs` member, GDAL still reads it
    pub fn to_feature_collection(&self) -> geojson::FeatureCollection {
        let features = self
            .rows
            .iter()
            .map(|row| {
                let properties = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.values.iter().cloned())
                    .collect::<Map<String, Value>>();
                geojson::Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::new(geojson::Value::from(&row.geometry))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        let foreign_members = (!self.crs.is_geographic()).then(|| {
            let mut members = Map::new();
            members.insert(
                "crs".to_string(),
                json!({
                    "type": "name",
                    "properties": { "name": format!("urn:ogc:def:crs:EPSG::{}", self.crs.epsg()) }
                }),
            );
            members
        });

        geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members,
        }
    }
}

pub fn build(features: Vec<Feature>, reproject: bool) -> Result<GeoTable, GeotableError> {
    let table = GeoTable::from_features(features, SOURCE_CRS)?;
    if reproject {
        table.to_crs(ANALYSIS_CRS)
    } else {
        Ok(table)
    }
}
