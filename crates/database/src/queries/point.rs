use model::point::Point;
use sqlx::{Executor, Postgres};

use crate::{data_model::point::PointRow, DatabaseError, Result};

use super::{convert_error, UpdateBuilder};

pub async fn insert<'c, E>(
    executor: E,
    name: &str,
    location_ewkt: &str,
    description: Option<&str>,
) -> Result<Point>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO points(
            name,
            location,
            description
        )
        VALUES ($1, ST_GeomFromText($2), $3)
        RETURNING id, name, ST_AsEWKT(location) AS location, description;
        ",
    )
    .bind(name)
    .bind(location_ewkt)
    .bind(description)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: PointRow| row.to_model())
}

pub async fn get<'c, E>(executor: E, id: i32) -> Result<Point>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id,
            name,
            ST_AsEWKT(location) AS location,
            description
        FROM
            points
        WHERE
            id = $1;
        ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: PointRow| row.to_model())
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<Point>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<PointRow> = sqlx::query_as(
        "
        SELECT
            id,
            name,
            ST_AsEWKT(location) AS location,
            description
        FROM
            points;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;
    rows.into_iter().map(PointRow::to_model).collect()
}

/// Builds assignments only for the supplied fields. Callers must pass at
/// least one change.
pub async fn update<'c, E>(
    executor: E,
    id: i32,
    name: Option<&str>,
    location_ewkt: Option<&str>,
    description: Option<&str>,
) -> Result<Point>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = UpdateBuilder::new();
    if let Some(name) = name {
        builder.set("name", name);
    }
    if let Some(location_ewkt) = location_ewkt {
        builder.set_wrapped("location", "ST_GeomFromText", location_ewkt);
    }
    if let Some(description) = description {
        builder.set("description", description);
    }

    let statement = format!(
        "UPDATE points SET {} WHERE id = ${} \
         RETURNING id, name, ST_AsEWKT(location) AS location, description;",
        builder.clause(),
        builder.next_placeholder(),
    );
    builder
        .bind_to(sqlx::query_as(&statement))
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(convert_error)
        .and_then(|row: PointRow| row.to_model())
}

pub async fn delete<'c, E>(executor: E, id: i32) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM points WHERE id = $1;")
        .bind(id)
        .execute(executor)
        .await
        .map_err(convert_error)?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound);
    }
    Ok(())
}
