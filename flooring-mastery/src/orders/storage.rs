//! File-backed storage layer for orders
//!
//! # Layout
//!
//! | File | Content |
//! |------|---------|
//! | `<orders_dir>/Orders_MMDDYYYY.txt` | One date partition: header + one order per line |
//! | `<export_file>` | Every order across all dates, date as trailing column |
//!
//! The in-memory index is authoritative between `load()` and `save()`.
//!
//! # Durability
//!
//! Each partition file is rewritten in full on save. There is no atomicity
//! across files: if a write fails part way, partitions written before the
//! failure keep their new content and the rest keep their old content. The
//! error names the file that failed.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use shared::{Order, OrderKey};
use thiserror::Error;

use super::record::{
    self, EXPORT_FILE_HEADER, ORDER_FILE_HEADER, RecordError, format_export_line,
    format_order_line, parse_order_line,
};

/// One reason a load could not apply a file (or the whole directory)
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("cannot read directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: file name does not follow Orders_MMDDYYYY.txt")]
    FileName { path: PathBuf },

    #[error("{path}: missing header line")]
    MissingHeader { path: PathBuf },

    #[error("{path}:{line}: {source}")]
    Record {
        path: PathBuf,
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error("{path}:{line}: order number {number} appears more than once")]
    DuplicateNumber {
        path: PathBuf,
        line: usize,
        number: u32,
    },
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unable to load orders: {}", join_failures(.0))]
    Load(Vec<LoadFailure>),

    /// The file of a date being saved could not be read by the last load
    #[error("Refusing to overwrite {path}: it was not loaded, its orders would be lost")]
    UnreadPartition { path: PathBuf },

    #[error("Unable to save orders to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to export orders to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

fn join_failures(failures: &[LoadFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result of a push or replace
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Accepted,
    /// Nothing changed
    Rejected,
}

impl StoreOutcome {
    pub fn is_accepted(self) -> bool {
        self == StoreOutcome::Accepted
    }
}

/// Order storage backed by a directory of per-date files
///
/// Index: date → (order number → order). A date never maps to an empty
/// partition; removing its last order removes the date.
#[derive(Debug)]
pub struct OrderStorage {
    orders_dir: PathBuf,
    export_file: PathBuf,
    partitions: BTreeMap<NaiveDate, BTreeMap<u32, Order>>,
    /// Dates emptied by `remove` whose file still holds the removed orders
    stale_partitions: BTreeSet<NaiveDate>,
    /// Dates whose file exists but failed to load
    unread_partitions: BTreeSet<NaiveDate>,
}

impl OrderStorage {
    /// Empty storage over `orders_dir`; nothing is read until [`load`](Self::load)
    pub fn new(orders_dir: impl Into<PathBuf>, export_file: impl Into<PathBuf>) -> Self {
        Self {
            orders_dir: orders_dir.into(),
            export_file: export_file.into(),
            partitions: BTreeMap::new(),
            stale_partitions: BTreeSet::new(),
            unread_partitions: BTreeSet::new(),
        }
    }

    pub fn orders_dir(&self) -> &Path {
        &self.orders_dir
    }

    pub fn export_file(&self) -> &Path {
        &self.export_file
    }

    // ========== Load ==========

    /// Read every partition file in the orders directory
    ///
    /// Each file that parses cleanly replaces the in-memory partition of its
    /// date. Files that fail are skipped and reported together once every
    /// file has been visited, so a failure still leaves the good files applied.
    /// The dates of failed files are remembered and [`save`](Self::save)
    /// refuses to overwrite them until a later load reads them cleanly.
    pub fn load(&mut self) -> StorageResult<()> {
        let entries = fs::read_dir(&self.orders_dir).map_err(|source| {
            StorageError::Load(vec![LoadFailure::Directory {
                path: self.orders_dir.clone(),
                source,
            }])
        })?;

        let mut paths = Vec::new();
        let mut failures = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_dir() {
                        tracing::debug!(path = %path.display(), "Skipping subdirectory");
                        continue;
                    }
                    paths.push(path);
                }
                Err(source) => failures.push(LoadFailure::Directory {
                    path: self.orders_dir.clone(),
                    source,
                }),
            }
        }
        paths.sort();

        let mut loaded = 0usize;
        for path in paths {
            match read_partition(&path) {
                Ok((date, partition)) => {
                    tracing::debug!(
                        file = %path.display(),
                        %date,
                        orders = partition.len(),
                        "Loaded order partition"
                    );
                    loaded += partition.len();
                    self.stale_partitions.remove(&date);
                    self.unread_partitions.remove(&date);
                    if partition.is_empty() {
                        self.partitions.remove(&date);
                    } else {
                        self.partitions.insert(date, partition);
                    }
                }
                Err(failure) => {
                    tracing::warn!(error = %failure, "Order file not loaded");
                    if let Some(date) = partition_date(&path) {
                        self.unread_partitions.insert(date);
                    }
                    failures.push(failure);
                }
            }
        }

        tracing::info!(
            orders = loaded,
            dates = self.partitions.len(),
            failed_files = failures.len(),
            "Orders loaded from {}",
            self.orders_dir.display()
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(StorageError::Load(failures))
        }
    }

    // ========== Mutations ==========

    /// Insert a new order; rejected if its key is taken
    pub fn push(&mut self, order: Order) -> StoreOutcome {
        let partition = self.partitions.entry(order.order_date()).or_default();
        if partition.contains_key(&order.order_number()) {
            return StoreOutcome::Rejected;
        }
        self.stale_partitions.remove(&order.order_date());
        partition.insert(order.order_number(), order);
        StoreOutcome::Accepted
    }

    /// Swap in a new version of an existing order; rejected if its key is unknown
    pub fn replace(&mut self, order: Order) -> StoreOutcome {
        match self
            .partitions
            .get_mut(&order.order_date())
            .and_then(|partition| partition.get_mut(&order.order_number()))
        {
            Some(slot) => {
                *slot = order;
                StoreOutcome::Accepted
            }
            None => StoreOutcome::Rejected,
        }
    }

    /// Remove and return an order; `None` (and no change) if absent
    pub fn remove(&mut self, date: NaiveDate, number: u32) -> Option<Order> {
        let partition = self.partitions.get_mut(&date)?;
        let removed = partition.remove(&number)?;
        if partition.is_empty() {
            self.partitions.remove(&date);
            self.stale_partitions.insert(date);
        }
        Some(removed)
    }

    // ========== Queries ==========

    /// Every order, ordered by date then number
    pub fn all_orders(&self) -> Vec<Order> {
        self.iter().cloned().collect()
    }

    /// Orders placed on `date`; empty if there are none
    pub fn orders_on(&self, date: NaiveDate) -> Vec<Order> {
        self.partitions
            .get(&date)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, date: NaiveDate, number: u32) -> Option<Order> {
        self.partitions.get(&date)?.get(&number).cloned()
    }

    pub fn contains(&self, key: OrderKey) -> bool {
        self.partitions
            .get(&key.date)
            .is_some_and(|partition| partition.contains_key(&key.number))
    }

    /// Highest order number across all dates
    pub fn max_order_number(&self) -> Option<u32> {
        self.partitions
            .values()
            .filter_map(|partition| partition.keys().next_back().copied())
            .max()
    }

    pub fn len(&self) -> usize {
        self.partitions.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = &Order> {
        self.partitions.values().flat_map(BTreeMap::values)
    }

    // ========== Persistence ==========

    /// Rewrite the file of every date that has orders
    ///
    /// Files of dates emptied since the last load/save are deleted. Stops at
    /// the first failure; see the module docs for what that leaves on disk.
    ///
    /// Nothing is written if a date to save or delete has a file the last
    /// load could not read.
    pub fn save(&mut self) -> StorageResult<()> {
        if let Some(date) = self
            .partitions
            .keys()
            .chain(&self.stale_partitions)
            .find(|date| self.unread_partitions.contains(*date))
        {
            return Err(StorageError::UnreadPartition {
                path: self.partition_path(*date),
            });
        }

        fs::create_dir_all(&self.orders_dir).map_err(|source| StorageError::Save {
            path: self.orders_dir.clone(),
            source,
        })?;

        for (date, partition) in &self.partitions {
            let path = self.partition_path(*date);
            write_lines(&path, ORDER_FILE_HEADER, partition.values().map(format_order_line))
                .map_err(|source| StorageError::Save {
                    path: path.clone(),
                    source,
                })?;
            tracing::debug!(file = %path.display(), orders = partition.len(), "Saved order partition");
        }

        while let Some(date) = self.stale_partitions.pop_first() {
            let path = self.partition_path(date);
            match fs::remove_file(&path) {
                Ok(()) => tracing::debug!(file = %path.display(), "Removed emptied order partition"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    self.stale_partitions.insert(date);
                    return Err(StorageError::Save { path, source });
                }
            }
        }

        tracing::info!(
            orders = self.len(),
            dates = self.partitions.len(),
            "Orders saved to {}",
            self.orders_dir.display()
        );
        Ok(())
    }

    /// Write every order into the single export file
    pub fn export(&self) -> StorageResult<()> {
        let export_err = |source| StorageError::Export {
            path: self.export_file.clone(),
            source,
        };

        if let Some(parent) = self.export_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(export_err)?;
        }
        write_lines(&self.export_file, EXPORT_FILE_HEADER, self.iter().map(format_export_line))
            .map_err(export_err)?;

        tracing::info!(
            orders = self.len(),
            "Orders exported to {}",
            self.export_file.display()
        );
        Ok(())
    }

    fn partition_path(&self, date: NaiveDate) -> PathBuf {
        self.orders_dir.join(record::partition_file_name(date))
    }
}

fn partition_date(path: &Path) -> Option<NaiveDate> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(record::parse_partition_file_name)
}

/// Parse one partition file into its date and orders
fn read_partition(path: &Path) -> Result<(NaiveDate, BTreeMap<u32, Order>), LoadFailure> {
    let date = partition_date(path).ok_or_else(|| LoadFailure::FileName {
            path: path.to_path_buf(),
        })?;

    let file_err = |source| LoadFailure::File {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(file_err)?);
    let mut lines = reader.lines();

    match lines.next() {
        Some(header) => {
            header.map_err(file_err)?;
        }
        None => {
            return Err(LoadFailure::MissingHeader {
                path: path.to_path_buf(),
            });
        }
    }

    let mut partition = BTreeMap::new();
    for (idx, line) in lines.enumerate() {
        let line = line.map_err(file_err)?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        // header is line 1
        let line_no = idx + 2;

        let order = parse_order_line(line, date).map_err(|source| LoadFailure::Record {
            path: path.to_path_buf(),
            line: line_no,
            source,
        })?;
        let number = order.order_number();
        if partition.insert(number, order).is_some() {
            return Err(LoadFailure::DuplicateNumber {
                path: path.to_path_buf(),
                line: line_no,
                number,
            });
        }
    }

    Ok((date, partition))
}

/// Create/truncate `path` and write the header followed by `lines`
fn write_lines(
    path: &Path,
    header: &str,
    lines: impl Iterator<Item = String>,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{header}")?;
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
