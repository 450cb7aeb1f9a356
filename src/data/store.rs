use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use super::model::{CellValue, Row, Table};
use super::timestamp::format_timestamp;

/// Inclusive bounds accepted by [`Session::add`].
pub const POWER_MIN: i64 = -100_000;
pub const POWER_MAX: i64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("power {0} is outside the accepted range [-100000, 100000]")]
    OutOfRange(i64),
}

// ---------------------------------------------------------------------------
// Time source
// ---------------------------------------------------------------------------

/// Wall-clock capability used when appending readings.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time of the machine running the app.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

// ---------------------------------------------------------------------------
// Table store
// ---------------------------------------------------------------------------

/// Holder of the one mutable table. Only whole-table reads and writes.
#[derive(Debug, Default)]
pub struct TableStore {
    table: Table,
}

impl TableStore {
    pub fn get(&self) -> &Table {
        &self.table
    }

    /// Replace the table wholesale. No validation.
    pub fn set(&mut self, table: Table) {
        self.table = table;
    }
}

// ---------------------------------------------------------------------------
// Session – the store plus the operations allowed to write it
// ---------------------------------------------------------------------------

/// One user session: owns its store and its clock, shares nothing.
pub struct Session {
    store: TableStore,
    clock: Box<dyn Clock>,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }
}

impl Session {
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            store: TableStore::default(),
            clock,
        }
    }

    pub fn table(&self) -> &Table {
        self.store.get()
    }

    /// Append `(now, power)` after all existing rows.
    pub fn add(&mut self, power: i64) -> Result<&Table, IngestError> {
        if !(POWER_MIN..=POWER_MAX).contains(&power) {
            return Err(IngestError::OutOfRange(power));
        }
        let now = format_timestamp(&self.clock.now());
        let row = Row::new(CellValue::Text(now), CellValue::Integer(power));
        let table = self.store.get().with_row(row);
        self.store.set(table);
        Ok(self.store.get())
    }

    /// Drop every row; the two-column schema is implicit in [`Table`].
    pub fn clear(&mut self) -> &Table {
        self.store.set(Table::new());
        self.store.get()
    }

    /// Editor sink: store `edited` as-is, malformed cells included.
    pub fn apply(&mut self, edited: Table) -> &Table {
        self.store.set(edited);
        self.store.get()
    }
}
