use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::PolygonGeometry;

/// A named area. Names are unique among polygons.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Polygon {
    pub id: i32,
    pub name: String,
    pub shape: PolygonGeometry,
    pub population_density: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatePolygon {
    pub name: String,
    pub shape: PolygonGeometry,
    pub population_density: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdatePolygon {
    pub name: Option<String>,
    pub shape: Option<PolygonGeometry>,
    pub population_density: Option<f64>,
}

impl UpdatePolygon {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.shape.is_none() && self.population_density.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_polygon_from_geojson_body() {
        let body = json!({
            "name": "district",
            "shape": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
            },
            "population_density": 1200.5
        });
        let polygon: CreatePolygon = serde_json::from_value(body).unwrap();
        assert_eq!(polygon.name, "district");
        assert_eq!(polygon.shape.coordinates.len(), 1);
        assert_eq!(polygon.shape.coordinates[0].len(), 4);
        assert_eq!(polygon.population_density, Some(1200.5));
    }

    #[test]
    fn polygon_omits_absent_density() {
        let polygon = Polygon {
            id: 7,
            name: "district".to_string(),
            shape: PolygonGeometry::new(vec![vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.0, 0.0],
            ]]),
            population_density: None,
        };
        let value = serde_json::to_value(&polygon).unwrap();
        assert!(value.get("population_density").is_none());
        assert_eq!(value["shape"]["type"], "Polygon");
    }

    #[test]
    fn empty_update_is_detected() {
        let update: UpdatePolygon = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());

        let update: UpdatePolygon =
            serde_json::from_value(json!({ "population_density": 3.5 })).unwrap();
        assert!(!update.is_empty());
    }
}
