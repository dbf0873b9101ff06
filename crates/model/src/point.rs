use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::PointGeometry;

/// A named point of interest.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub id: i32,
    pub name: String,
    pub location: PointGeometry,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatePoint {
    pub name: String,
    pub location: PointGeometry,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdatePoint {
    pub name: Option<String>,
    pub location: Option<PointGeometry>,
    pub description: Option<String>,
}

impl UpdatePoint {
    /// An update with no fields at all is invalid and must be rejected
    /// before anything reaches the database.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_point_from_geojson_body() {
        let body = json!({
            "name": "A",
            "location": { "type": "Point", "coordinates": [12.5, 41.9] }
        });
        let point: CreatePoint = serde_json::from_value(body).unwrap();
        assert_eq!(point.name, "A");
        assert_eq!(point.location.longitude(), 12.5);
        assert_eq!(point.location.latitude(), 41.9);
        assert_eq!(point.description, None);
    }

    #[test]
    fn wrong_geometry_tag_is_rejected() {
        let body = json!({
            "name": "A",
            "location": { "type": "Polygon", "coordinates": [12.5, 41.9] }
        });
        assert!(serde_json::from_value::<CreatePoint>(body).is_err());
    }

    #[test]
    fn point_serializes_as_geojson() {
        let point = Point {
            id: 1,
            name: "A".to_string(),
            location: PointGeometry::new(12.5, 41.9),
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&point).unwrap(),
            json!({
                "id": 1,
                "name": "A",
                "location": { "type": "Point", "coordinates": [12.5, 41.9] }
            })
        );
    }

    #[test]
    fn empty_update_is_detected() {
        let update: UpdatePoint = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());

        let update: UpdatePoint =
            serde_json::from_value(json!({ "name": "B" })).unwrap();
        assert!(!update.is_empty());
    }
}
