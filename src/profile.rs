use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Decorative user identity shown in the home header. Display data only:
/// the session engine never reads it, and quiz results never write it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub name: String,
    pub id: String,
    pub points: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Guest".to_string(),
            id: "0000".to_string(),
            points: 0,
        }
    }
}

pub trait ProfileStore {
    fn load(&self) -> Profile;
    fn save(&self, profile: &Profile) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "kwiz") {
            pd.config_dir().join("profile.json")
        } else {
            PathBuf::from("kwiz_profile.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self) -> Profile {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(profile) = serde_json::from_slice::<Profile>(&bytes) {
                return profile;
            }
        }
        Profile::default()
    }

    fn save(&self, profile: &Profile) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(profile).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
