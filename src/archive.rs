//! Archive assembly: conversion outcomes → one ZIP container.
//!
//! The assembler is owned by a single task. The batch collects every outcome
//! first and only then inserts them one by one, so no lock guards the entry
//! table. Outcomes are inserted in submission order (not completion order),
//! which makes collision handling reproducible across runs.
//!
//! ## Collision policy
//!
//! Two uploads named `a.pdf`, or a `x.pdf` whose failure entry clashes with
//! another entry, must not overwrite each other. The first claimant keeps the
//! plain name; later ones get `-2`, `-3`, … inserted before the suffix:
//!
//! ```text
//! a.pdf, a.pdf, a.pdf  →  a.docx, a-2.docx, a-3.docx
//! ```

use crate::error::Pdf2DocxError;
use crate::output::{ArchiveEntry, ConversionOutcome, EntryName, OutcomeKind};
use std::collections::HashSet;
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

struct PendingEntry {
    name: String,
    source_name: String,
    bytes: Vec<u8>,
    success: bool,
}

/// Builds the archive entry table and finalises it into ZIP bytes.
#[derive(Default)]
pub struct ArchiveAssembler {
    entries: Vec<PendingEntry>,
    names: HashSet<String>,
}

impl ArchiveAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a complete outcome set, in submission order.
    pub fn from_outcomes(mut outcomes: Vec<ConversionOutcome>) -> Self {
        outcomes.sort_by_key(|o| o.index);
        let mut assembler = Self::new();
        for outcome in outcomes {
            assembler.insert_outcome(outcome);
        }
        assembler
    }

    /// Insert one outcome; returns the name it was stored under.
    pub fn insert_outcome(&mut self, outcome: ConversionOutcome) -> String {
        let success = outcome.is_success();
        let ConversionOutcome {
            source_name,
            entry_name,
            kind,
            ..
        } = outcome;
        let bytes = match kind {
            OutcomeKind::Succeeded { artifact, .. } => artifact,
            OutcomeKind::Failed { diagnostic, .. } => diagnostic.into_bytes(),
        };
        self.insert(&entry_name, source_name, bytes, success)
    }

    /// Insert raw bytes under `entry_name`, renaming on collision.
    pub fn insert(
        &mut self,
        entry_name: &EntryName,
        source_name: impl Into<String>,
        bytes: Vec<u8>,
        success: bool,
    ) -> String {
        let name = self.unique_name(entry_name);
        debug!("Archive entry '{}' ({} bytes)", name, bytes.len());
        self.names.insert(name.clone());
        self.entries.push(PendingEntry {
            name: name.clone(),
            source_name: source_name.into(),
            bytes,
            success,
        });
        name
    }

    fn unique_name(&self, entry_name: &EntryName) -> String {
        let plain = entry_name.to_string();
        if !self.names.contains(&plain) {
            return plain;
        }
        (2..)
            .map(|n| entry_name.numbered(n))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or(plain)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summary of the entries inserted so far, in insertion order.
    pub fn entries(&self) -> Vec<ArchiveEntry> {
        self.entries
            .iter()
            .map(|e| ArchiveEntry {
                name: e.name.clone(),
                source_name: e.source_name.clone(),
                size: e.bytes.len() as u64,
                success: e.success,
            })
            .collect()
    }

    /// Compress every entry into an in-memory ZIP buffer.
    pub fn finalize(self) -> Result<Vec<u8>, Pdf2DocxError> {
        self.finalize_capped(None)
    }

    /// Like [`finalize`](Self::finalize), but fails once the container would
    /// grow past `max_bytes`.
    pub fn finalize_capped(self, max_bytes: Option<u64>) -> Result<Vec<u8>, Pdf2DocxError> {
        let writer = CappedCursor {
            inner: Cursor::new(Vec::new()),
            limit: max_bytes.unwrap_or(u64::MAX),
        };
        let writer = self.finalize_into(writer)?;
        Ok(writer.inner.into_inner())
    }

    /// Compress every entry into `writer`.
    ///
    /// On error nothing is handed back: the caller never sees a partially
    /// written container.
    pub fn finalize_into<W: Write + Seek>(self, writer: W) -> Result<W, Pdf2DocxError> {
        let count = self.entries.len();
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for entry in &self.entries {
            zip.start_file(entry.name.as_str(), options)
                .map_err(finalization_error)?;
            zip.write_all(&entry.bytes).map_err(finalization_error)?;
        }

        let writer = zip.finish().map_err(finalization_error)?;
        info!("Archive finalised with {} entries", count);
        Ok(writer)
    }
}

// `ZipError::Io` only says "i/o error"; the cause lives in `source()`.
fn finalization_error(e: impl std::error::Error) -> Pdf2DocxError {
    let detail = match e.source() {
        Some(cause) => format!("{e}: {cause}"),
        None => e.to_string(),
    };
    Pdf2DocxError::ArchiveFinalization { detail }
}

/// In-memory buffer that refuses writes past `limit` bytes.
struct CappedCursor {
    inner: Cursor<Vec<u8>>,
    limit: u64,
}

impl Write for CappedCursor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let end = self.inner.position().saturating_add(buf.len() as u64);
        if end > self.limit {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("archive exceeds the {}-byte ceiling", self.limit),
            ));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for CappedCursor {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
