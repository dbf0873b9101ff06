use model::polygon::Polygon;
use sqlx::{Executor, Postgres};

use crate::{data_model::polygon::PolygonRow, DatabaseError, Result};

use super::{convert_error, UpdateBuilder};

/// Name uniqueness is enforced by the `polygons_name_key` constraint; a
/// collision surfaces as `DatabaseError::UniqueViolation`.
pub async fn insert<'c, E>(
    executor: E,
    name: &str,
    shape_ewkt: &str,
    population_density: Option<f64>,
) -> Result<Polygon>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO polygons(
            name,
            shape,
            population_density
        )
        VALUES ($1, ST_GeomFromText($2), $3)
        RETURNING id, name, ST_AsEWKT(shape) AS shape, population_density;
        ",
    )
    .bind(name)
    .bind(shape_ewkt)
    .bind(population_density)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: PolygonRow| row.to_model())
}

pub async fn get<'c, E>(executor: E, id: i32) -> Result<Polygon>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id,
            name,
            ST_AsEWKT(shape) AS shape,
            population_density
        FROM
            polygons
        WHERE
            id = $1;
        ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: PolygonRow| row.to_model())
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<Polygon>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<PolygonRow> = sqlx::query_as(
        "
        SELECT
            id,
            name,
            ST_AsEWKT(shape) AS shape,
            population_density
        FROM
            polygons;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;
    rows.into_iter().map(PolygonRow::to_model).collect()
}

/// Builds assignments only for the supplied fields. Callers must pass at
/// least one change.
pub async fn update<'c, E>(
    executor: E,
    id: i32,
    name: Option<&str>,
    shape_ewkt: Option<&str>,
    population_density: Option<f64>,
) -> Result<Polygon>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = UpdateBuilder::new();
    if let Some(name) = name {
        builder.set("name", name);
    }
    if let Some(shape_ewkt) = shape_ewkt {
        builder.set_wrapped("shape", "ST_GeomFromText", shape_ewkt);
    }
    if let Some(population_density) = population_density {
        builder.set("population_density", population_density);
    }

    let statement = format!(
        "UPDATE polygons SET {} WHERE id = ${} \
         RETURNING id, name, ST_AsEWKT(shape) AS shape, population_density;",
        builder.clause(),
        builder.next_placeholder(),
    );
    builder
        .bind_to(sqlx::query_as(&statement))
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(convert_error)
        .and_then(|row: PolygonRow| row.to_model())
}

pub async fn delete<'c, E>(executor: E, id: i32) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM polygons WHERE id = $1;")
        .bind(id)
        .execute(executor)
        .await
        .map_err(convert_error)?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound);
    }
    Ok(())
}
