use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Receipt storage backend kinds
///
/// Defined in core because the configuration layer selects one of these once at
/// startup and the storage crate builds the matching implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Writable, persistent local directory.
    Disk,
    /// Stateless execution environment; bytes land in a scratch directory that
    /// does not survive between invocations.
    Ephemeral,
    /// Durable blob store. Only the seam exists; no implementation ships.
    Remote,
}

impl StorageBackend {
    /// Backend used when `STORAGE_BACKEND` is not set.
    ///
    /// Production deployments run in a stateless environment, everything else
    /// gets a local directory.
    pub fn default_for_environment(is_production: bool) -> Self {
        if is_production {
            StorageBackend::Ephemeral
        } else {
            StorageBackend::Disk
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disk" | "local" => Ok(StorageBackend::Disk),
            "ephemeral" | "memory" | "serverless" => Ok(StorageBackend::Ephemeral),
            "remote" => Ok(StorageBackend::Remote),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Disk => write!(f, "disk"),
            StorageBackend::Ephemeral => write!(f, "ephemeral"),
            StorageBackend::Remote => write!(f, "remote"),
        }
    }
}

/// Opaque identifier of stored receipt bytes.
///
/// For the filesystem backends this is the generated file name
/// (`receipt-<millis>-<random><ext>`); a remote backend may hand back a URL.
/// Stored verbatim in the `payments.receipt_file` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct FileReference(String);

impl FileReference {
    pub fn new(value: impl Into<String>) -> Self {
        FileReference(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for FileReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
