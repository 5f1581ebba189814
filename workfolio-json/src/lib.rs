use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, error, info, warn};
use workfolio_core::assets::is_external;
use workfolio_core::{
    repo::Repository, AssetStore, CoreError, NewWork, Work, WorkCollection, WorkId, WorkPatch,
};

pub mod paths;
pub mod uploads;

pub use paths::StoreLayout;
pub use uploads::UploadDir;

#[derive(Serialize)]
struct FileImage<'a> {
    works: &'a [Work],
}

/// A store fresh from [`JsonStore::open`]. A backing file that could not be
/// read is reported in `load_error`; the store then starts out empty.
pub struct Opened {
    pub store: JsonStore,
    pub load_error: Option<CoreError>,
}

pub struct JsonStore {
    layout: StoreLayout,
    assets: Arc<dyn AssetStore>,
    state: RwLock<WorkCollection>,
    // held across "mutate in memory + persist"
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub async fn open(layout: StoreLayout) -> Result<Opened, CoreError> {
        let assets = Arc::new(UploadDir::new(layout.uploads_dir.clone()));
        Self::open_with_assets(layout, assets).await
    }

    pub async fn open_with_assets(
        layout: StoreLayout,
        assets: Arc<dyn AssetStore>,
    ) -> Result<Opened, CoreError> {
        let l = layout.clone();
        let (works, load_error) = task::spawn_blocking(move || initialize(&l))
            .await
            .map_err(|e| CoreError::Initialization(e.to_string()))??;
        info!(
            db_file = %layout.db_file.display(),
            uploads_dir = %layout.uploads_dir.display(),
            works = works.len(),
            "work store ready"
        );
        Ok(Opened {
            store: Self {
                layout,
                assets,
                state: RwLock::new(works),
                write_lock: Mutex::new(()),
            },
            load_error,
        })
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    async fn persist(&self, snapshot: Vec<Work>) -> Result<(), CoreError> {
        let path = self.layout.db_file.clone();
        let temp = self.layout.temp_file();
        task::spawn_blocking(move || write_atomic(&path, &temp, &snapshot))
            .await
            .map_err(|e| CoreError::Persist(e.to_string()))?
            .map_err(|e| {
                error!(path = %self.layout.db_file.display(), error = %e, "failed to save works");
                CoreError::Persist(e.to_string())
            })
    }

    async fn remove_image(&self, reference: String) -> Result<(), CoreError> {
        if is_external(&reference) {
            return Ok(());
        }
        let assets = Arc::clone(&self.assets);
        let removal = task::spawn_blocking(move || assets.remove(&reference))
            .await
            .map_err(|e| CoreError::AssetCleanup(e.to_string()))??;
        debug!(?removal, "image cleanup");
        Ok(())
    }
}

fn initialize(layout: &StoreLayout) -> Result<(WorkCollection, Option<CoreError>), CoreError> {
    ensure_dir(&layout.data_dir)?;
    ensure_dir(&layout.uploads_dir)?;

    if !layout.db_file.exists() {
        write_atomic(&layout.db_file, &layout.temp_file(), &[]).map_err(|e| {
            CoreError::Initialization(format!("{}: {e}", layout.db_file.display()))
        })?;
        info!(path = %layout.db_file.display(), "created empty works file");
        return Ok((WorkCollection::new(), None));
    }

    match load(&layout.db_file) {
        Ok(works) => Ok((WorkCollection::from_vec(works), None)),
        Err(e) => {
            warn!(path = %layout.db_file.display(), error = %e, "starting with no works");
            Ok((WorkCollection::new(), Some(e)))
        }
    }
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path)
        .map_err(|e| CoreError::Initialization(format!("{}: {e}", path.display())))
}

fn load(path: &Path) -> Result<Vec<Work>, CoreError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CoreError::Load(format!("{}: {e}", path.display())))?;
    let problem = match parse_works(&text) {
        Ok(works) => match first_duplicate_id(&works) {
            None => return Ok(works),
            Some(id) => format!("duplicate work id {id}"),
        },
        Err(e) => e.to_string(),
    };
    let kept = preserve_unreadable(path);
    Err(CoreError::Load(format!("{}: {problem}{kept}", path.display())))
}

fn first_duplicate_id(works: &[Work]) -> Option<WorkId> {
    let mut seen = HashSet::with_capacity(works.len());
    works.iter().map(|w| w.id).find(|id| !seen.insert(*id))
}

/// Works under the top-level `works` key; anything other than an array
/// there counts as no works.
fn parse_works(text: &str) -> Result<Vec<Work>, serde_json::Error> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(mut map) => match map.remove("works") {
            Some(works @ Value::Array(_)) => serde_json::from_value(works),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

/// Copies an unparseable backing file aside so the next save cannot
/// overwrite it. Returns a note for the load error message.
fn preserve_unreadable(path: &Path) -> String {
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".corrupt-{ts}"));
    match fs::copy(path, &name) {
        Ok(_) => format!(" (kept as {})", Path::new(&name).display()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not keep unreadable works file");
            String::new()
        }
    }
}

/// Writes `works` to `temp`, syncs it and renames it over `path`. On any
/// failure the temp file is removed and `path` is left as it was.
fn write_atomic(path: &Path, temp: &Path, works: &[Work]) -> Result<(), io::Error> {
    let json = serde_json::to_vec_pretty(&FileImage { works }).map_err(io::Error::other)?;
    let written = write_synced(temp, &json).and_then(|()| fs::rename(temp, path));
    if written.is_err() {
        let _ = fs::remove_file(temp);
    }
    written
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), io::Error> {
    let mut f = fs::File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}

use async_trait::async_trait;

#[async_trait]
impl Repository for JsonStore {
    async fn list_works(&self) -> Result<Vec<Work>, CoreError> {
        let s = self.state.read();
        Ok(s.as_slice().to_vec())
    }

    async fn get_work(&self, id: WorkId) -> Result<Work, CoreError> {
        let s = self.state.read();
        s.get(id).cloned()
    }

    async fn create_work(&self, new: NewWork) -> Result<Work, CoreError> {
        let _guard = self.write_lock.lock().await;
        let (work, snapshot) = {
            let mut s = self.state.write();
            let work = s.insert(new, Utc::now())?;
            (work, s.as_slice().to_vec())
        };
        self.persist(snapshot).await?;
        Ok(work)
    }

    async fn update_work(&self, id: WorkId, patch: WorkPatch) -> Result<Work, CoreError> {
        let _guard = self.write_lock.lock().await;
        let (work, snapshot) = {
            let mut s = self.state.write();
            let work = s.update(id, &patch, Utc::now())?;
            (work, s.as_slice().to_vec())
        };
        self.persist(snapshot).await?;
        Ok(work)
    }

    async fn remove_work(&self, id: WorkId) -> Result<(), CoreError> {
        let _guard = self.write_lock.lock().await;
        let image_url = self.state.read().get(id)?.image_url.clone();
        // image goes first: a crash before the save leaves a record with a
        // missing image rather than an orphaned file
        self.remove_image(image_url).await?;
        let snapshot = {
            let mut s = self.state.write();
            s.remove(id)?;
            s.as_slice().to_vec()
        };
        self.persist(snapshot).await
    }

    async fn store_uploaded_image(
        &self,
        bytes: &[u8],
        original_filename: &str,
    ) -> Result<String, CoreError> {
        let assets = Arc::clone(&self.assets);
        let bytes = bytes.to_vec();
        let name = original_filename.to_string();
        task::spawn_blocking(move || assets.store(&bytes, &name))
            .await
            .map_err(|e| CoreError::UploadIo(e.to_string()))?
    }
}
