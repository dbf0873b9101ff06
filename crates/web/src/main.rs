use database::{DatabaseConnectionInfo, PgDatabase};
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not connect to database.");

    // web server
    let web_future = start_web_server(WebState { database });

    let _ = web_future.await;
}
