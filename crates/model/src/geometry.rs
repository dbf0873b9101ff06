use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// WGS84 longitude/latitude. Every geometry in the system carries this SRID;
/// the codec rejects anything else on both the encode and decode path.
pub const SRID_WGS84: i32 = 4326;

/// A GeoJSON `Point` geometry. Coordinates are `[longitude, latitude]` in
/// decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename = "Point")]
pub struct PointGeometry {
    pub coordinates: [f64; 2],
}

/// A GeoJSON `Polygon` geometry: one or more linear rings, the first being
/// the outer boundary. Every ring must be closed (first pair equals last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename = "Polygon")]
pub struct PolygonGeometry {
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    UnsupportedSrid(i32),
    OpenRing,
    RingTooShort(usize),
    Malformed(String),
}

impl GeometryError {
    fn malformed(why: impl Into<String>) -> Self {
        Self::Malformed(why.into())
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSrid(srid) => {
                write!(f, "unsupported SRID {}, only {} is accepted", srid, SRID_WGS84)
            }
            Self::OpenRing => {
                write!(f, "polygon ring is not closed")
            }
            Self::RingTooShort(len) => {
                write!(f, "polygon ring has {} coordinate pairs, at least 4 are required", len)
            }
            Self::Malformed(why) => {
                write!(f, "malformed geometry text: {}", why)
            }
        }
    }
}

impl std::error::Error for GeometryError {}

impl PointGeometry {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// Renders `SRID=4326;POINT(lon lat)`. Coordinates keep their full
    /// double precision (`Display` for `f64` is round-trip exact).
    pub fn to_ewkt(&self) -> String {
        format!(
            "SRID={};POINT({} {})",
            SRID_WGS84,
            self.coordinates[0],
            self.coordinates[1]
        )
    }
}

impl PolygonGeometry {
    pub fn new(coordinates: Vec<Vec<[f64; 2]>>) -> Self {
        Self { coordinates }
    }

    /// Renders `SRID=4326;POLYGON((x1 y1, ...), ...)`. Fails when a ring has
    /// fewer than 4 coordinate pairs or does not close back on its first pair.
    pub fn to_ewkt(&self) -> Result<String, GeometryError> {
        if self.coordinates.is_empty() {
            return Err(GeometryError::malformed("polygon has no rings"));
        }
        let mut rings = Vec::with_capacity(self.coordinates.len());
        for ring in &self.coordinates {
            validate_ring(ring)?;
            let pairs = ring
                .iter()
                .map(|[x, y]| format!("{} {}", x, y))
                .collect::<Vec<_>>()
                .join(", ");
            rings.push(format!("({})", pairs));
        }
        Ok(format!("SRID={};POLYGON({})", SRID_WGS84, rings.join(", ")))
    }
}

fn validate_ring(ring: &[[f64; 2]]) -> Result<(), GeometryError> {
    if ring.len() < 4 {
        return Err(GeometryError::RingTooShort(ring.len()));
    }
    if ring.first() != ring.last() {
        return Err(GeometryError::OpenRing);
    }
    Ok(())
}

/// A geometry decoded from database text.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(PointGeometry),
    Polygon(PolygonGeometry),
}

impl Geometry {
    /// Parses WKT with an optional `SRID=n;` prefix (EWKT, the output of
    /// `ST_AsEWKT`). A declared SRID other than 4326 is rejected.
    pub fn from_ewkt(text: &str) -> Result<Self, GeometryError> {
        let text = text.trim();
        let body = match text.split_once(';') {
            Some((prefix, rest)) => {
                let srid = parse_srid(prefix)?;
                if srid != SRID_WGS84 {
                    return Err(GeometryError::UnsupportedSrid(srid));
                }
                rest.trim_start()
            }
            None => text,
        };

        let open = body
            .find('(')
            .ok_or_else(|| GeometryError::malformed("missing coordinate list"))?;
        let keyword = body[..open].trim().to_ascii_uppercase();
        let inner = body[open..]
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| GeometryError::malformed("unbalanced parentheses"))?;

        match keyword.as_str() {
            "POINT" => parse_pair(inner).map(|coordinates| {
                Geometry::Point(PointGeometry { coordinates })
            }),
            "POLYGON" => parse_rings(inner).map(|coordinates| {
                Geometry::Polygon(PolygonGeometry { coordinates })
            }),
            other => Err(GeometryError::malformed(format!(
                "unsupported geometry type {:?}",
                other
            ))),
        }
    }

    pub fn into_point(self) -> Result<PointGeometry, GeometryError> {
        match self {
            Geometry::Point(point) => Ok(point),
            Geometry::Polygon(_) => {
                Err(GeometryError::malformed("expected a POINT, found a POLYGON"))
            }
        }
    }

    pub fn into_polygon(self) -> Result<PolygonGeometry, GeometryError> {
        match self {
            Geometry::Polygon(polygon) => Ok(polygon),
            Geometry::Point(_) => {
                Err(GeometryError::malformed("expected a POLYGON, found a POINT"))
            }
        }
    }
}

fn parse_srid(prefix: &str) -> Result<i32, GeometryError> {
    prefix
        .trim()
        .strip_prefix("SRID=")
        .and_then(|raw| raw.trim().parse().ok())
        .ok_or_else(|| GeometryError::malformed("invalid SRID prefix"))
}

fn parse_pair(text: &str) -> Result<[f64; 2], GeometryError> {
    let mut values = text.split_whitespace().map(|raw| {
        raw.parse::<f64>()
            .map_err(|_| GeometryError::malformed(format!("invalid coordinate {:?}", raw)))
    });
    match (values.next(), values.next(), values.next()) {
        (Some(x), Some(y), None) => Ok([x?, y?]),
        _ => Err(GeometryError::malformed(format!(
            "expected two coordinates, got {:?}",
            text
        ))),
    }
}

fn parse_ring(text: &str) -> Result<Vec<[f64; 2]>, GeometryError> {
    let ring = text
        .split(',')
        .map(parse_pair)
        .collect::<Result<Vec<_>, _>>()?;
    validate_ring(&ring)?;
    Ok(ring)
}

fn parse_rings(inner: &str) -> Result<Vec<Vec<[f64; 2]>>, GeometryError> {
    let mut rings = Vec::new();
    let mut rest = inner.trim();
    while !rest.is_empty() {
        let ring_end = rest
            .strip_prefix('(')
            .ok_or_else(|| GeometryError::malformed("expected a ring"))?
            .find(')')
            .ok_or_else(|| GeometryError::malformed("unterminated ring"))?;
        rings.push(parse_ring(&rest[1..ring_end + 1])?);
        rest = rest[ring_end + 2..].trim_start();
        match rest.strip_prefix(',') {
            Some(remainder) => rest = remainder.trim_start(),
            None if rest.is_empty() => break,
            None => return Err(GeometryError::malformed("expected a ring separator")),
        }
    }
    if rings.is_empty() {
        return Err(GeometryError::malformed("polygon has no rings"));
    }
    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_round_trip() {
        let point = PointGeometry::new(12.5, 41.9);
        assert_eq!(point.to_ewkt(), "SRID=4326;POINT(12.5 41.9)");
        assert_eq!(
            Geometry::from_ewkt(&point.to_ewkt()).unwrap(),
            Geometry::Point(point)
        );
    }

    #[test]
    fn point_round_trip_keeps_full_precision() {
        let point = PointGeometry::new(std::f64::consts::PI, -std::f64::consts::E);
        let decoded = Geometry::from_ewkt(&point.to_ewkt())
            .unwrap()
            .into_point()
            .unwrap();
        assert_eq!(decoded, point);
    }

    #[test]
    fn polygon_round_trip_with_hole() {
        let polygon = PolygonGeometry::new(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[2.0, 2.0], [4.0, 2.0], [4.0, 4.0], [2.0, 2.0]],
        ]);
        let ewkt = polygon.to_ewkt().unwrap();
        assert_eq!(
            ewkt,
            "SRID=4326;POLYGON((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 4 2, 4 4, 2 2))"
        );
        assert_eq!(
            Geometry::from_ewkt(&ewkt).unwrap(),
            Geometry::Polygon(polygon)
        );
    }

    #[test]
    fn open_ring_is_rejected() {
        let polygon = PolygonGeometry::new(vec![vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ]]);
        assert_eq!(polygon.to_ewkt(), Err(GeometryError::OpenRing));
    }

    #[test]
    fn short_ring_is_rejected() {
        let polygon =
            PolygonGeometry::new(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]);
        assert_eq!(polygon.to_ewkt(), Err(GeometryError::RingTooShort(3)));
    }

    #[test]
    fn closed_four_point_ring_is_accepted() {
        let polygon = PolygonGeometry::new(vec![vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
        ]]);
        assert!(polygon.to_ewkt().is_ok());
    }

    #[test]
    fn foreign_srid_is_rejected() {
        assert_eq!(
            Geometry::from_ewkt("SRID=3857;POINT(1 2)"),
            Err(GeometryError::UnsupportedSrid(3857))
        );
    }

    #[test]
    fn srid_prefix_is_optional() {
        assert_eq!(
            Geometry::from_ewkt("POINT(1 2)").unwrap(),
            Geometry::Point(PointGeometry::new(1.0, 2.0))
        );
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(Geometry::from_ewkt("LINESTRING(0 0, 1 1)").is_err());
        assert!(Geometry::from_ewkt("POINT(1)").is_err());
        assert!(Geometry::from_ewkt("POINT(a b)").is_err());
        assert!(Geometry::from_ewkt("POLYGON(())").is_err());
        assert!(Geometry::from_ewkt("POLYGON((0 0, 1 0, 1 1, 0 0)").is_err());
        assert!(Geometry::from_ewkt("SRID=what;POINT(1 2)").is_err());
        assert!(Geometry::from_ewkt("").is_err());
    }

    #[test]
    fn decoded_polygon_rings_are_validated() {
        assert_eq!(
            Geometry::from_ewkt("POLYGON((0 0, 1 0, 1 1, 2 2))"),
            Err(GeometryError::OpenRing)
        );
    }
}
