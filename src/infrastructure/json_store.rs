use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

use crate::application::{AppError, AppResult, WatchStore};
use crate::domain::{TargetPrice, Watch};

/// On-disk shape: `{ "<owner_id>": { "collection": .., "target_price": .. } }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct WatchRecord {
    collection: String,
    target_price: TargetPrice,
}

type Records = BTreeMap<String, WatchRecord>;

/// Flat JSON file store. Every mutation rewrites the whole file
/// (temp file + fsync + rename) before the call returns.
pub struct JsonFileWatchStore {
    path: PathBuf,
    records: Mutex<Records>,
}

impl JsonFileWatchStore {
    /// Reads the file, creating an empty one if it does not exist yet.
    /// A file that does not parse is `StorageCorrupt`, never an empty store.
    pub async fn load(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        let records = match tokio::fs::read(&path).await {
            Ok(raw) => serde_json::from_slice::<Records>(&raw)
                .map_err(|e| AppError::StorageCorrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| storage_io(parent, e))?;
                }
                let empty = Records::new();
                write_records(&path, &empty).await?;
                info!(path = %path.display(), "created empty watch store");
                empty
            }
            Err(e) => return Err(storage_io(&path, e)),
        };

        info!(path = %path.display(), watches = records.len(), "watch store loaded");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `f` to a copy, persists it, then swaps it in. On a failed
    /// write the in-memory state is left untouched.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Records) -> T) -> AppResult<T> {
        let mut records = self.records.lock().await;
        let mut next = records.clone();
        let out = f(&mut next);
        if next != *records {
            write_records(&self.path, &next).await?;
            *records = next;
        }
        Ok(out)
    }
}

fn storage_io(path: &Path, e: std::io::Error) -> AppError {
    AppError::StorageIo(format!("{}: {e}", path.display()))
}

async fn write_records(path: &Path, records: &Records) -> AppResult<()> {
    let body = serde_json::to_vec_pretty(records)
        .map_err(|e| AppError::StorageIo(format!("serialize: {e}")))?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    if let Err(e) = replace_file(&tmp, path, &body).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    sync_parent_dir(path).await
}

async fn replace_file(tmp: &Path, path: &Path, body: &[u8]) -> AppResult<()> {
    let mut file = tokio::fs::File::create(tmp)
        .await
        .map_err(|e| storage_io(tmp, e))?;
    file.write_all(body).await.map_err(|e| storage_io(tmp, e))?;
    file.sync_all().await.map_err(|e| storage_io(tmp, e))?;
    drop(file);

    tokio::fs::rename(tmp, path)
        .await
        .map_err(|e| storage_io(path, e))
}

/// Makes the rename itself durable.
#[cfg(unix)]
async fn sync_parent_dir(path: &Path) -> AppResult<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(p) => p,
        None => Path::new("."),
    };
    let handle = tokio::fs::File::open(dir)
        .await
        .map_err(|e| storage_io(dir, e))?;
    handle.sync_all().await.map_err(|e| storage_io(dir, e))
}

#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) -> AppResult<()> {
    Ok(())
}

#[async_trait]
impl WatchStore for JsonFileWatchStore {
    async fn add(&self, watch: Watch) -> AppResult<()> {
        self.mutate(|records| {
            records.insert(
                watch.owner_id,
                WatchRecord {
                    collection: watch.collection,
                    target_price: watch.target_price,
                },
            );
        })
        .await
    }

    async fn remove(&self, owner_id: &str) -> AppResult<()> {
        self.mutate(|records| {
            records.remove(owner_id);
        })
        .await
    }

    async fn remove_watch(&self, watch: &Watch) -> AppResult<bool> {
        self.mutate(|records| {
            let current = records.get(&watch.owner_id);
            let same = current.is_some_and(|r| {
                r.collection == watch.collection && r.target_price == watch.target_price
            });
            if same {
                records.remove(&watch.owner_id);
            }
            same
        })
        .await
    }

    async fn all(&self) -> AppResult<Vec<Watch>> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .map(|(owner_id, r)| Watch {
                owner_id: owner_id.clone(),
                collection: r.collection.clone(),
                target_price: r.target_price,
            })
            .collect())
    }
}
