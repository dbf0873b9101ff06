use model::{geometry::Geometry, point::Point};
use sqlx::prelude::FromRow;

use crate::{DatabaseError, Result};

/// Table: `points`. The geometry column is always selected as
/// `ST_AsEWKT(location)` text.
#[derive(Debug, Clone, FromRow)]
pub struct PointRow {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
}

impl PointRow {
    pub fn to_model(self) -> Result<Point> {
        let location = Geometry::from_ewkt(&self.location)
            .and_then(Geometry::into_point)
            .map_err(DatabaseError::other)?;
        Ok(Point {
            id: self.id,
            name: self.name,
            location,
            description: self.description,
        })
    }
}
