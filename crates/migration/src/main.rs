use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./fundbook.db?mode=rwc";

enum Action {
    Up,
    Down,
    Fresh,
    Status,
}

fn parse_action(raw: Option<String>) -> Option<Action> {
    match raw.as_deref().unwrap_or("up") {
        "up" => Some(Action::Up),
        "down" => Some(Action::Down),
        "fresh" => Some(Action::Fresh),
        "status" => Some(Action::Status),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(action) = parse_action(std::env::args().nth(1)) else {
        eprintln!("Usage: cargo run -p migration -- [up|down|fresh|status]");
        std::process::exit(2);
    };

    let db_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&db_url).await?;

    match action {
        Action::Up => migration::Migrator::up(&db, None).await?,
        Action::Down => migration::Migrator::down(&db, None).await?,
        Action::Fresh => migration::Migrator::fresh(&db).await?,
        Action::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
