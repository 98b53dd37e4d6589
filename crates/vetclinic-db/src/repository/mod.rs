//! SurrealDB repository implementations.

mod client;
mod medicine;
mod pet;
mod product;
mod provider;
mod vet;

pub use client::SurrealClientRepository;
pub use medicine::SurrealMedicineRepository;
pub use pet::SurrealPetRepository;
pub use product::SurrealProductRepository;
pub use provider::SurrealProviderRepository;
pub use vet::SurrealVetRepository;

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub(crate) total: u64,
}

pub(crate) fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}

/// Total number of rows in `table`.
pub(crate) async fn count<C: Connection>(db: &Surreal<C>, table: &str) -> Result<u64, DbError> {
    let mut result = db
        .query(format!("SELECT count() AS total FROM {table} GROUP ALL"))
        .await?;
    let rows: Vec<CountRow> = result.take(0)?;
    Ok(rows.first().map(|r| r.total).unwrap_or(0))
}

/// Fail with `NotFound` unless `table:id` exists.
pub(crate) async fn ensure_exists<C: Connection>(
    db: &Surreal<C>,
    table: &str,
    id: Uuid,
) -> Result<(), DbError> {
    let id_str = id.to_string();
    let mut result = db
        .query(format!(
            "SELECT count() AS total FROM {table} \
             WHERE id = type::record('{table}', $id) GROUP ALL"
        ))
        .bind(("id", id_str.clone()))
        .await?;
    let rows: Vec<CountRow> = result.take(0)?;
    if rows.first().map(|r| r.total).unwrap_or(0) == 0 {
        return Err(DbError::not_found(table, id_str));
    }
    Ok(())
}

/// A relation table together with the tables at its two ends.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edge {
    pub(crate) relation: &'static str,
    pub(crate) from: &'static str,
    pub(crate) to: &'static str,
}

pub(crate) const PRESCRIBED: Edge = Edge {
    relation: "prescribed",
    from: "pet",
    to: "medicine",
};

pub(crate) const ATTENDED_BY: Edge = Edge {
    relation: "attended_by",
    from: "pet",
    to: "vet",
};

pub(crate) const PURCHASED: Edge = Edge {
    relation: "purchased",
    from: "client",
    to: "product",
};

impl Edge {
    /// Create the edge `from:in_id -> relation -> to:out_id` unless it
    /// already exists. Both ends must exist.
    pub(crate) async fn link<C: Connection>(
        &self,
        db: &Surreal<C>,
        in_id: Uuid,
        out_id: Uuid,
    ) -> Result<(), DbError> {
        ensure_exists(db, self.from, in_id).await?;
        ensure_exists(db, self.to, out_id).await?;

        let relation = self.relation;
        let (from, to) = (self.from, self.to);
        let mut existing = db
            .query(format!(
                "SELECT count() AS total FROM {relation} \
                 WHERE in = type::record('{from}', $in_id) \
                 AND out = type::record('{to}', $out_id) GROUP ALL"
            ))
            .bind(("in_id", in_id.to_string()))
            .bind(("out_id", out_id.to_string()))
            .await?;
        let rows: Vec<CountRow> = existing.take(0)?;
        if rows.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Ok(());
        }

        // RELATE requires literal record-id syntax; the ids are UUIDs.
        db.query(format!(
            "RELATE {from}:`{in_id}` -> {relation} -> {to}:`{out_id}`;"
        ))
        .await?
        .check()?;

        Ok(())
    }

    /// Delete the edges from `in_id` to each of `out_ids`. Ids with no
    /// edge are ignored.
    pub(crate) async fn unlink<C: Connection>(
        &self,
        db: &Surreal<C>,
        in_id: Uuid,
        out_ids: &[Uuid],
    ) -> Result<(), DbError> {
        if out_ids.is_empty() {
            return Ok(());
        }
        let relation = self.relation;
        let (from, to) = (self.from, self.to);
        let targets = out_ids
            .iter()
            .map(|id| format!("{to}:`{id}`"))
            .collect::<Vec<_>>()
            .join(", ");

        db.query(format!(
            "DELETE {relation} WHERE \
             in = type::record('{from}', $in_id) AND out IN [{targets}]"
        ))
        .bind(("in_id", in_id.to_string()))
        .await?
        .check()?;

        Ok(())
    }

    /// `SELECT` over the `to` table restricted to records linked from
    /// `in_id`, oldest first.
    pub(crate) fn targets_query(&self) -> String {
        let relation = self.relation;
        let (from, to) = (self.from, self.to);
        format!(
            "SELECT meta::id(id) AS record_id, * FROM {to} \
             WHERE id IN (\
                 SELECT VALUE out FROM {relation} \
                 WHERE in = type::record('{from}', $in_id)\
             ) \
             ORDER BY created_at ASC"
        )
    }

    /// Statement deleting every edge that touches `table:$id`.
    pub(crate) fn detach_statement(&self, table: &str) -> String {
        let relation = self.relation;
        let side = if table == self.from { "in" } else { "out" };
        format!("DELETE {relation} WHERE {side} = type::record('{table}', $id);")
    }
}
