use geo::Coord;
use proj4rs::proj::Proj;
use thiserror::Error;

const GEOGRAPHIC: &str = "+proj=longlat +datum=WGS84 +no_defs";

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("cannot set up {definition}: {message}")]
    Definition { definition: String, message: String },
    #[error("({lon}, {lat}) is outside the projection domain")]
    OutsideDomain { lon: f64, lat: f64 },
    #[error("projection failed: {0}")]
    Transform(String),
}

pub struct UtmProjection {
    central_meridian: f64,
    source: Proj,
    target: Proj,
}

impl UtmProjection {
    pub fn north(zone: u8) -> Result<Self, ProjectionError> {
        let definition = format!("+proj=utm +zone={zone} +ellps=GRS80 +units=m +no_defs");
        let source = proj(GEOGRAPHIC)?;
        let target = proj(&definition)?;
        Ok(Self {
            central_meridian: f64::from(zone) * 6.0 - 183.0,
            source,
            target,
        })
    }

    pub fn forward(&self, lon_lat: Coord<f64>) -> Result<Coord<f64>, ProjectionError> {
        let Coord { x: lon, y: lat } = lon_lat;
        // transverse Mercator only covers the hemisphere around the central meridian
        let offset = (lon - self.central_meridian + 180.0).rem_euclid(360.0) - 180.0;
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 || offset.abs() >= 90.0 {
            return Err(ProjectionError::OutsideDomain { lon, lat });
        }

        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        proj4rs::transform::transform(&self.source, &self.target, &mut point)
            .map_err(|err| ProjectionError::Transform(err.to_string()))?;
        let (x, y, _) = point;
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::OutsideDomain { lon, lat });
        }
        Ok(Coord { x, y })
    }
}

fn proj(definition: &str) -> Result<Proj, ProjectionError> {
    Proj::from_proj_string(definition).map_err(|err| ProjectionError::Definition {
        definition: definition.to_string(),
        message: err.to_string(),
    })
}
