// ============================
// crates/backend-lib/src/storage/flat_file.rs
// ============================
//! Flat-file store: one JSON document per record.
//!
//! ```text
//! <root>/users/<hex(username)>.json
//! <root>/tickets/<uuid>.json
//! ```
//!
//! Documents are written to a temp file and fsynced before they become
//! visible. Users are published with `hard_link`, which fails if the target
//! exists, so two registrations for the same username cannot both succeed.
use async_trait::async_trait;
use chrono::Utc;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs as tokio_fs, io::AsyncWriteExt, sync::Mutex};
use tripsync_common::Ticket;
use uuid::Uuid;

use super::{NewTicket, TicketStore, User, UserStore};
use crate::error::StoreError;

const USERS_DIR: &str = "users";
const TICKETS_DIR: &str = "tickets";
const TMP_PREFIX: &str = ".tmp-";

/// Flat-file implementation of the store traits
#[derive(Debug)]
pub struct FlatFileStorage {
    root: PathBuf,
    /// Serialises ticket replace/remove
    ticket_lock: Mutex<()>,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(USERS_DIR))?;
        fs::create_dir_all(root.join(TICKETS_DIR))?;
        Ok(Self {
            root,
            ticket_lock: Mutex::new(()),
        })
    }

    fn user_path(&self, username: &str) -> PathBuf {
        // Hex keeps arbitrary usernames out of path syntax
        let name: String = username.bytes().map(|b| format!("{b:02x}")).collect();
        self.root.join(USERS_DIR).join(format!("{name}.json"))
    }

    /// Path of a ticket document; `None` for ids this store never issues
    fn ticket_path(&self, id: &str) -> Option<PathBuf> {
        let id = Uuid::parse_str(id).ok()?;
        Some(
            self.root
                .join(TICKETS_DIR)
                .join(format!("{}.json", id.hyphenated())),
        )
    }

    /// Write `bytes` to a fresh temp file in `dir` and fsync it
    async fn write_temp(&self, dir: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self
            .root
            .join(dir)
            .join(format!("{TMP_PREFIX}{}", Uuid::new_v4()));

        let mut file = tokio_fs::File::create(&path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(path)
    }

    /// Atomically replace the document at `path`
    async fn replace(&self, path: &Path, ticket: &Ticket) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(ticket)?;
        let tmp = self.write_temp(TICKETS_DIR, &json).await?;
        if let Err(err) = tokio_fs::rename(&tmp, path).await {
            let _ = tokio_fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn read_ticket(path: &Path) -> Result<Option<Ticket>, StoreError> {
        match tokio_fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Every ticket on disk, oldest first
    async fn load_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        let mut entries = tokio_fs::read_dir(self.root.join(TICKETS_DIR)).await?;
        let mut tickets = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_document = path.extension().is_some_and(|ext| ext == "json")
                && !entry.file_name().to_string_lossy().starts_with(TMP_PREFIX);
            if !is_document {
                continue;
            }
            // Removed between listing and reading
            if let Some(ticket) = Self::read_ticket(&path).await? {
                tickets.push(ticket);
            }
        }

        tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tickets)
    }
}

#[async_trait]
impl UserStore for FlatFileStorage {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        match tokio_fs::read(self.user_path(username)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn insert_unique(&self, user: User) -> Result<(), StoreError> {
        let path = self.user_path(&user.username);
        let json = serde_json::to_vec_pretty(&user)?;
        let tmp = self.write_temp(USERS_DIR, &json).await?;

        let linked = tokio_fs::hard_link(&tmp, &path).await;
        let _ = tokio_fs::remove_file(&tmp).await;

        match linked {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::DuplicateKey(user.username))
            },
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl TicketStore for FlatFileStorage {
    async fn insert(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        let ticket = ticket.into_ticket(Uuid::new_v4().to_string(), Utc::now());
        let path = self
            .ticket_path(&ticket.id)
            .ok_or_else(|| StoreError::Unavailable("generated an invalid ticket id".to_string()))?;

        self.replace(&path, &ticket).await?;
        Ok(ticket)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, StoreError> {
        match self.ticket_path(id) {
            Some(path) => Self::read_ticket(&path).await,
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Ticket>, StoreError> {
        let mut tickets = self.load_tickets().await?;
        tickets.retain(|ticket| ticket.username == username);
        Ok(tickets)
    }

    async fn find_all(&self) -> Result<Vec<Ticket>, StoreError> {
        self.load_tickets().await
    }

    async fn update(&self, ticket: Ticket) -> Result<Ticket, StoreError> {
        let path = self
            .ticket_path(&ticket.id)
            .ok_or_else(|| StoreError::Missing(ticket.id.clone()))?;

        let _guard = self.ticket_lock.lock().await;
        if !tokio_fs::try_exists(&path).await? {
            return Err(StoreError::Missing(ticket.id));
        }
        self.replace(&path, &ticket).await?;
        Ok(ticket)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let Some(path) = self.ticket_path(id) else {
            return Ok(false);
        };

        let _guard = self.ticket_lock.lock().await;
        match tokio_fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        match self.ticket_path(id) {
            Some(path) => Ok(tokio_fs::try_exists(&path).await?),
            None => Ok(false),
        }
    }
}
