//! Import orchestration: check rows in sheet order, fan out one task per
//! passing row, join, then commit.

use std::sync::Arc;

use tokio::task::JoinSet;

use super::evaluator::evaluate_row;
use super::report::{FieldError, ValidationReport};
use super::store::{ImportSchema, ImportStore};
use super::tracker::UniquenessTracker;
use super::{ImportError, ImportSummary};
use crate::sheet::{read_sheet, Row, Sheet, SheetFormat};

enum RowOutcome<R> {
    Accepted(R),
    Rejected(Vec<FieldError>),
}

/// Shared handles for the row tasks of one run.
struct RowUnit<S, St> {
    schema: Arc<S>,
    store: Arc<St>,
}

impl<S, St> RowUnit<S, St>
where
    S: ImportSchema,
    St: ImportStore<S::Record>,
{
    /// Store checks and record conversion for a row that already passed the
    /// in-sheet rules.
    async fn process(
        &self,
        row: Row,
        claimed: Vec<(String, String)>,
    ) -> Result<RowOutcome<S::Record>, ImportError> {
        let table = self.schema.table();
        for (field, value) in &claimed {
            if self.store.exists_by_field(table, field, value).await? {
                return Ok(RowOutcome::Rejected(vec![FieldError::already_taken(
                    field, value, row.number,
                )]));
            }
        }

        let number = row.number;
        let schema = Arc::clone(&self.schema);
        let record = tokio::task::spawn_blocking(move || schema.materialize(&row))
            .await
            .map_err(|e| ImportError::Internal(format!("row {number} worker failed: {e}")))?
            .map_err(|message| ImportError::Materialize {
                row: number,
                message,
            })?;

        Ok(RowOutcome::Accepted(record))
    }
}

/// Parse `bytes` as a sheet (`.xlsx` or delimited text) and import it.
pub async fn import_bytes<S, St>(
    schema: Arc<S>,
    store: Arc<St>,
    bytes: &[u8],
) -> Result<ImportSummary, ImportError>
where
    S: ImportSchema,
    St: ImportStore<S::Record>,
{
    tracing::debug!(format = ?SheetFormat::detect(bytes), size = bytes.len(), "Reading sheet");
    let sheet = read_sheet(bytes)?;
    run_import(schema, store, sheet).await
}

/// Validate every row of `sheet` concurrently and, if all pass, insert the
/// resulting records in one batch.
///
/// Returns [`ImportError::Rejected`] with the merged report when any row
/// fails; in that case the store is not written to at all.
pub async fn run_import<S, St>(
    schema: Arc<S>,
    store: Arc<St>,
    sheet: Sheet,
) -> Result<ImportSummary, ImportError>
where
    S: ImportSchema,
    St: ImportStore<S::Record>,
{
    let table = schema.table();
    let rows = sheet.rows.len();
    tracing::info!(table, rows, "Import started");

    let tracker = UniquenessTracker::for_rules(schema.rules());

    // The tracker phase runs here in sheet order so the first occurrence of a
    // repeated value always wins. Only rows that pass it get a task.
    let mut outcomes: Vec<Option<Result<RowOutcome<S::Record>, ImportError>>> =
        Vec::with_capacity(rows);
    let mut tasks = JoinSet::new();
    for (turn, row) in sheet.rows.into_iter().enumerate() {
        let check = evaluate_row(schema.rules(), &row, &tracker);
        if !check.passed() {
            outcomes.push(Some(Ok(RowOutcome::Rejected(check.errors))));
            continue;
        }
        outcomes.push(None);
        let unit = RowUnit {
            schema: Arc::clone(&schema),
            store: Arc::clone(&store),
        };
        tasks.spawn(async move { (turn, unit.process(row, check.claimed).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        let (turn, outcome) =
            joined.map_err(|e| ImportError::Internal(format!("row task failed: {e}")))?;
        outcomes[turn] = Some(outcome);
    }

    let mut report = ValidationReport::new();
    let mut records = Vec::with_capacity(rows);
    for outcome in outcomes.into_iter().flatten() {
        match outcome {
            Ok(RowOutcome::Accepted(record)) => records.push(record),
            Ok(RowOutcome::Rejected(errors)) => report.extend(errors),
            Err(err) => {
                tracing::error!(table, error = %err, "Import aborted");
                return Err(err);
            }
        }
    }

    if !report.is_empty() {
        tracing::info!(table, rows, errors = report.len(), "Import rejected");
        return Err(ImportError::Rejected(report));
    }

    let imported = records.len();
    if imported > 0 {
        if let Err(err) = store.insert_all(records).await {
            tracing::error!(table, error = %err, "Import insert failed");
            return Err(err.into());
        }
    }

    tracing::info!(table, rows, imported, "Import committed");
    Ok(ImportSummary {
        table,
        rows,
        imported,
    })
}
