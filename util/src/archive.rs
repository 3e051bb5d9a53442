//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
///
/// A default archiver has no file behind it and silently discards records, which allows modules
/// to run without a session (for example in tests).
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot create the archive file: {0}")]
    CreateError(std::io::Error),

    #[error("Cannot write the archive record: {0}")]
    WriteError(csv::Error),

    #[error("Cannot flush the archive file: {0}")]
    FlushError(std::io::Error)
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a csv.
///
/// To implement this trait, the struct shall have an `Archiver` member per
/// archived quantity. The archivers shall be setup in the struct's `init` or
/// `new` functions. Records must be flat structs, csv cannot write nested
/// records.
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    ///
    /// Any missing parent directories are created.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let mut session_path = session.arch_root.clone();
        session_path.push(path);

        if let Some(parent) = session_path.parent() {
            std::fs::create_dir_all(parent).map_err(ArchiveError::CreateError)?;
        }

        // Create the file, truncating any previous archive, and keep it open for appending
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(session_path)
            .map_err(ArchiveError::CreateError)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Returns true if this archiver writes to a file.
    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), ArchiveError> {
        if let Some(ref mut w) = self.writer {
            w.serialize(record).map_err(ArchiveError::WriteError)?;
            w.flush().map_err(ArchiveError::FlushError)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Record {
        time_s: f64,
        value: f64
    }

    /// The session epoch can only be set once per process, so this is the only test which
    /// starts a session.
    #[test]
    fn test_session_archive() {
        let mut root = std::env::temp_dir();
        root.push(format!("nav_sw_test_{}", std::process::id()));

        let session = Session::new_in("test_exec", root.clone()).unwrap();
        assert!(session.arch_root.is_dir());
        assert!(session.log_file_path.starts_with(&session.session_root));
        assert!(crate::session::get_elapsed_seconds() >= 0.0);
        assert!(crate::session::get_epoch().is_some());

        // Starting a second session is an error
        assert!(Session::new_in("test_exec", root.clone()).is_err());

        let mut a = Archiver::from_path(&session, "module/record.csv").unwrap();
        assert!(a.is_active());
        a.serialise(Record { time_s: 0.5, value: 2.0 }).unwrap();
        a.serialise(Record { time_s: 1.0, value: -1.0 }).unwrap();

        let mut path = session.arch_root.clone();
        path.push("module/record.csv");
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "time_s,value\n0.5,2.0\n1.0,-1.0\n");

        std::fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_inactive_archiver_discards() {
        let mut a = Archiver::default();
        assert!(!a.is_active());
        assert!(a.serialise(Record { time_s: 0.0, value: 1.0 }).is_ok());
    }
}
