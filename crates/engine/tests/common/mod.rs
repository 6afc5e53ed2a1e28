#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::Database;

use engine::{Engine, Fund, FundNew};
use migration::MigratorTrait;

pub async fn test_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

pub async fn fund(engine: &Engine, name: &str, percentage_bp: i64) -> Fund {
    engine
        .create_fund(FundNew::new(name, percentage_bp))
        .await
        .unwrap()
}
