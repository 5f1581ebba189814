use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DATA_DIR_NAME: &str = "data";
pub const UPLOADS_DIR_NAME: &str = "uploads";
pub const DB_FILE_NAME: &str = "works.json";

/// Filesystem locations the store reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreLayout {
    pub base_dir: PathBuf,
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub db_file: PathBuf,
}

impl StoreLayout {
    /// `works.json.temp`, the write buffer renamed over the backing file.
    pub fn temp_file(&self) -> PathBuf {
        let mut s = self.db_file.as_os_str().to_owned();
        s.push(".temp");
        PathBuf::from(s)
    }
}

pub fn resolve(is_production: bool) -> StoreLayout {
    resolve_in(base_dir(is_production))
}

pub fn resolve_in(base_dir: impl Into<PathBuf>) -> StoreLayout {
    resolve_with(base_dir, DATA_DIR_NAME, UPLOADS_DIR_NAME)
}

/// Directory names are joined onto `base_dir`, so absolute ones replace it.
pub fn resolve_with(
    base_dir: impl Into<PathBuf>,
    data_dir: impl AsRef<Path>,
    uploads_dir: impl AsRef<Path>,
) -> StoreLayout {
    let base_dir = base_dir.into();
    let data_dir = base_dir.join(data_dir);
    let uploads_dir = base_dir.join(uploads_dir);
    let db_file = data_dir.join(DB_FILE_NAME);
    StoreLayout {
        base_dir,
        data_dir,
        uploads_dir,
        db_file,
    }
}

/// Production runs out of the deployed application root; development out
/// of the working directory.
pub fn base_dir(is_production: bool) -> PathBuf {
    if is_production {
        app_root()
    } else {
        current_dir()
    }
}

fn app_root() -> PathBuf {
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        return dir;
    }
    // org = "workfolio", app = "Workfolio"
    if let Some(pd) = ProjectDirs::from("com", "workfolio", "Workfolio") {
        return pd.data_dir().to_path_buf();
    }
    current_dir()
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_layout_under_base() {
        let l = resolve_in("/srv/app");
        assert_eq!(l.base_dir, PathBuf::from("/srv/app"));
        assert_eq!(l.data_dir, PathBuf::from("/srv/app/data"));
        assert_eq!(l.uploads_dir, PathBuf::from("/srv/app/uploads"));
        assert_eq!(l.db_file, PathBuf::from("/srv/app/data/works.json"));
        assert_eq!(l.temp_file(), PathBuf::from("/srv/app/data/works.json.temp"));
    }

    #[test]
    fn custom_dir_names() {
        let l = resolve_with("/srv/app", "state", "/var/uploads");
        assert_eq!(l.db_file, PathBuf::from("/srv/app/state/works.json"));
        assert_eq!(l.uploads_dir, PathBuf::from("/var/uploads"));
    }

    #[test]
    fn production_uses_executable_directory() {
        let l = resolve(true);
        let exe = std::env::current_exe().unwrap();
        assert_eq!(l.base_dir, exe.parent().unwrap());
        assert_eq!(l.data_dir.parent().unwrap(), l.base_dir);
        assert_eq!(l.uploads_dir.parent().unwrap(), l.base_dir);
        assert_eq!(l.db_file, l.base_dir.join("data").join(DB_FILE_NAME));
        assert_eq!(base_dir(true), l.base_dir);
    }

    #[test]
    fn development_uses_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve(false), resolve_in(cwd));
    }
}
