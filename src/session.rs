//! Session Module
//!
//! Binds a [`Store`] to an open database file.
//!
//! ## Responsibilities
//! - Create a new file or load an existing one into a store
//! - Persist the store after mutations
//! - Close the file and release the store on `close` or on any error
//!
//! ## Lifecycle
//! ```text
//!   Closed ──open──► Open(reading) ──► Ready ◄──save── Dirty
//!                                        │  ──set/delete─►  │
//!                                        └────close────► Closed ◄─┘
//! ```
//!
//! Any error raised by a session operation closes the session before it is
//! returned. Every later call fails with `SessionClosed`.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::codec::{self, FileHeader};
use crate::command::{Command, Reply};
use crate::config::{Config, FieldPolicy};
use crate::error::{Result, SlotDbError};
use crate::record::{Record, RowId};
use crate::store::Store;
use crate::table::Records;

/// How to open a database file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Truncate or create the file and start from an empty store
    Create,

    /// Load an existing file
    Existing,
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// In-memory store matches the file
    Ready,

    /// In-memory store has changes not yet saved
    Dirty,

    /// File and store released
    Closed,
}

/// An open database file and the store loaded from it
///
/// ## Ownership
/// The session exclusively owns both the file handle and the store. Records
/// returned by `get`/`list` are borrows that end at the next mutating call.
pub struct Session {
    /// Path of the database file
    path: PathBuf,

    /// Session configuration
    config: Config,

    /// Open file handle (`None` once closed)
    file: Option<File>,

    /// Loaded store (`None` once closed)
    store: Option<Store>,

    state: SessionState,
}

impl Session {
    /// Open a database file in the given mode
    pub fn open_with_mode(path: impl AsRef<Path>, mode: OpenMode, config: Config) -> Result<Self> {
        match mode {
            OpenMode::Create => Self::create(path, config),
            OpenMode::Existing => Self::open(path, config),
        }
    }

    /// Create (or truncate) a database file with an empty store
    ///
    /// The header is written before returning, so the file always
    /// describes an empty table of the configured capacity.
    pub fn create(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Validate capacity before touching the file
        let store = Store::from_config(&config)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        let mut session = Self {
            path,
            config,
            file: Some(file),
            store: Some(store),
            state: SessionState::Dirty,
        };
        session.save()?;

        tracing::info!(
            "Created {} (max_data={}, max_rows={})",
            session.path.display(),
            session.config.max_data,
            session.config.max_rows
        );

        Ok(session)
    }

    /// Open an existing database file
    ///
    /// Capacity comes from the file header; `config.max_data` and
    /// `config.max_rows` are ignored.
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new().read(true).write(true).open(&path)?;

        // On error the file handle is dropped (closed) here
        let store = Self::load(&mut file, config.field_policy)?;

        tracing::info!(
            "Opened {} (max_data={}, max_rows={}, current_rows={})",
            path.display(),
            store.max_data(),
            store.max_rows(),
            store.current_rows()
        );

        Ok(Self {
            path,
            config,
            file: Some(file),
            store: Some(store),
            state: SessionState::Ready,
        })
    }

    /// Read the whole file and rebuild the store from it
    fn load(file: &mut File, field_policy: FieldPolicy) -> Result<Store> {
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let mut buf = data.as_slice();

        let header = FileHeader::decode(&mut buf)?;
        let mut store = Store::from_header(&header, field_policy)?;

        for _ in 0..header.current_rows {
            let record = codec::decode_row(&mut buf)?;
            tracing::trace!("Decoded row {}", record.id());
            store.restore(record)?;
        }

        if !buf.is_empty() {
            return Err(SlotDbError::CorruptRecord(format!(
                "{} trailing bytes after {} rows",
                buf.len(),
                header.current_rows
            )));
        }

        Ok(store)
    }

    /// Execute a command
    ///
    /// Routes commands to the matching operation.
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        match command {
            Command::Get { id } => Ok(Reply::Record(self.get(id)?.cloned())),
            Command::Set { id, name, email } => {
                self.set(id, &name, &email)?;
                Ok(Reply::Done)
            }
            Command::Delete { id } => {
                self.delete(id)?;
                Ok(Reply::Done)
            }
            Command::List => Ok(Reply::Records(self.list()?.cloned().collect())),
        }
    }

    /// Get the record in slot `id`, or `None` if the slot is empty
    pub fn get(&mut self, id: RowId) -> Result<Option<&Record>> {
        let checked = self.store()?.get(id).map(|_| ());
        if let Err(e) = checked {
            return Err(self.abort(e));
        }

        self.store()?.get(id)
    }

    /// Fill slot `id`, saving afterwards when autosave is on
    pub fn set(&mut self, id: RowId, name: &str, email: &str) -> Result<()> {
        let outcome = self.store_mut()?.set(id, name, email);
        if let Err(e) = outcome {
            return Err(self.abort(e));
        }

        self.state = SessionState::Dirty;
        self.autosave()
    }

    /// Empty slot `id`, saving afterwards when autosave is on
    ///
    /// Deleting an empty slot changes nothing and writes nothing.
    pub fn delete(&mut self, id: RowId) -> Result<bool> {
        let outcome = self.store_mut()?.delete(id);
        let removed = match outcome {
            Ok(removed) => removed,
            Err(e) => return Err(self.abort(e)),
        };

        if removed {
            self.state = SessionState::Dirty;
            self.autosave()?;
        }
        Ok(removed)
    }

    /// All occupied records in increasing id order
    pub fn list(&self) -> Result<Records<'_>> {
        Ok(self.store()?.list())
    }

    /// Write the whole store to the file
    ///
    /// Rewinds, writes the header and then every occupied row, truncates the
    /// file to the written length and flushes.
    pub fn save(&mut self) -> Result<()> {
        match self.write_store() {
            Ok(written) => {
                self.state = SessionState::Ready;
                tracing::debug!("Saved {} bytes to {}", written, self.path.display());
                Ok(())
            }
            Err(e) => Err(self.abort(e)),
        }
    }

    fn write_store(&mut self) -> Result<u64> {
        let (Some(file), Some(store)) = (self.file.as_mut(), self.store.as_ref()) else {
            return Err(SlotDbError::SessionClosed);
        };

        file.seek(SeekFrom::Start(0))?;
        let mut writer = BufWriter::new(&mut *file);

        let header = store.header().encode()?;
        writer.write_all(&header)?;
        let mut written = header.len() as u64;

        for record in store.list() {
            let row = codec::encode_row(record)?;
            writer.write_all(&row)?;
            written += row.len() as u64;
        }

        writer.flush()?;
        drop(writer);

        // Drop whatever a larger previous save left behind
        file.set_len(written)?;

        if self.config.sync_on_save {
            file.sync_all()?;
        }

        Ok(written)
    }

    /// Close the session
    ///
    /// Saves pending changes first. Closing an already closed session is a
    /// no-op.
    pub fn close(&mut self) -> Result<()> {
        match self.state {
            SessionState::Closed => return Ok(()),
            SessionState::Dirty => self.save()?,
            SessionState::Ready => {}
        }

        self.release();
        tracing::debug!("Closed {}", self.path.display());
        Ok(())
    }

    fn autosave(&mut self) -> Result<()> {
        if self.config.autosave {
            self.save()
        } else {
            Ok(())
        }
    }

    /// Close the session because of `error`, then hand the error back
    fn abort(&mut self, error: SlotDbError) -> SlotDbError {
        if self.state != SessionState::Closed {
            tracing::warn!("Closing {} after error: {}", self.path.display(), error);
            self.release();
        }
        error
    }

    fn release(&mut self) {
        self.file = None;
        self.store = None;
        self.state = SessionState::Closed;
    }

    fn store_mut(&mut self) -> Result<&mut Store> {
        self.store.as_mut().ok_or(SlotDbError::SessionClosed)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the loaded store
    pub fn store(&self) -> Result<&Store> {
        self.store.as_ref().ok_or(SlotDbError::SessionClosed)
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.state == SessionState::Dirty {
            tracing::warn!("Dropping {} with unsaved changes", self.path.display());
        }
    }
}
