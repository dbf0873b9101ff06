use model::{geometry::Geometry, polygon::Polygon};
use sqlx::prelude::FromRow;

use crate::{DatabaseError, Result};

/// Table: `polygons`. The geometry column is always selected as
/// `ST_AsEWKT(shape)` text.
#[derive(Debug, Clone, FromRow)]
pub struct PolygonRow {
    pub id: i32,
    pub name: String,
    pub shape: String,
    pub population_density: Option<f64>,
}

impl PolygonRow {
    pub fn to_model(self) -> Result<Polygon> {
        let shape = Geometry::from_ewkt(&self.shape)
            .and_then(Geometry::into_polygon)
            .map_err(DatabaseError::other)?;
        Ok(Polygon {
            id: self.id,
            name: self.name,
            shape,
            population_density: self.population_density,
        })
    }
}
