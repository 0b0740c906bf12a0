use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

/// Per-day counters that only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Water,
    Steps,
}

impl CounterKind {
    fn table(self) -> &'static str {
        match self {
            CounterKind::Water => "water_logs",
            CounterKind::Steps => "step_logs",
        }
    }

    fn column(self) -> &'static str {
        match self {
            CounterKind::Water => "amount",
            CounterKind::Steps => "steps",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CounterKind::Water => "water",
            CounterKind::Steps => "steps",
        }
    }
}

/// Value for `(user, date)`, creating the zero row when absent.
pub async fn read_or_create(
    db: &PgPool,
    kind: CounterKind,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<i64> {
    let insert = format!(
        "INSERT INTO {t} (user_id, date, {c}) VALUES ($1, $2, 0) \
         ON CONFLICT (user_id, date) DO NOTHING",
        t = kind.table(),
        c = kind.column()
    );
    sqlx::query(&insert).bind(user_id).bind(date).execute(db).await?;

    let select = format!(
        "SELECT {c} FROM {t} WHERE user_id = $1 AND date = $2",
        t = kind.table(),
        c = kind.column()
    );
    let value: i64 = sqlx::query_scalar(&select)
        .bind(user_id)
        .bind(date)
        .fetch_one(db)
        .await?;
    Ok(value)
}

/// Atomically add `delta` to the `(user, date)` counter and return the new total.
pub async fn increment(
    db: &PgPool,
    kind: CounterKind,
    user_id: Uuid,
    date: Date,
    delta: i64,
) -> anyhow::Result<i64> {
    let sql = format!(
        "INSERT INTO {t} AS t (user_id, date, {c}) VALUES ($1, $2, $3) \
         ON CONFLICT (user_id, date) DO UPDATE SET {c} = t.{c} + EXCLUDED.{c} \
         RETURNING {c}",
        t = kind.table(),
        c = kind.column()
    );
    let value: i64 = sqlx::query_scalar(&sql)
        .bind(user_id)
        .bind(date)
        .bind(delta)
        .fetch_one(db)
        .await?;
    Ok(value)
}
