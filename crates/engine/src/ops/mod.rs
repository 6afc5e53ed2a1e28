use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    Select, sea_query::Expr,
};

use crate::{ResultEngine, util::DateRange};

mod auth;
mod categories;
mod costs;
mod dashboard;
mod distributions;
mod funds;
mod nomenclature;
mod receipts;
mod reports;
mod sponsors;
mod transfers;

pub use dashboard::{ActivityEntry, ActivityKind, DashboardStats};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Restrict `query` to rows whose `column` date falls in `range`.
fn filter_date_range<E>(mut query: Select<E>, column: E::Column, range: &DateRange) -> Select<E>
where
    E: EntityTrait,
{
    if let Some(from) = range.from {
        query = query.filter(column.gte(from));
    }
    if let Some(to) = range.to {
        query = query.filter(column.lte(to));
    }
    query
}

/// Sum an integer `column` over the rows selected by `query`, in SQL.
///
/// SQLite reports an integer overflow of the sum as an error.
async fn sum_column<E, C>(db: &C, query: Select<E>, column: E::Column) -> ResultEngine<i64>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = query
        .select_only()
        .column_as(Expr::col(column).sum(), "total")
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
