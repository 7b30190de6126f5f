use marketplace::api::{app, State};
use sqlx::{migrate::Migrator, SqlitePool as Pool};

static MIGRATOR: Migrator = sqlx::migrate!();

const DEFAULT_DB_FILE: &str = "sqlite:marketplace.db";
const DEFAULT_PORT: &str = "5555";

#[async_std::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tide::log::start();

    let db_file = std::env::args()
        .nth(1)
        .map(|f| format!("sqlite:{}", f))
        .unwrap_or_else(|| DEFAULT_DB_FILE.into());
    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.into());

    let conn = Pool::connect(&db_file).await?;
    MIGRATOR.run(&conn).await?;

    let app = app(State::new(conn));

    let addr = format!("0.0.0.0:{}", port);
    tide::log::info!("listening on {}", &addr);
    app.listen(addr).await?;
    Ok(())
}
