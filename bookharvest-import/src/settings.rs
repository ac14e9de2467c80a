//! Run settings: database location, paging limits, and the genre sweeps.
//!
//! Settings live in `<config_dir>/bookharvest/config.toml` next to the
//! `[hardcover]` API table:
//!
//! ```toml
//! [database]
//! path = "/var/lib/bookharvest/catalog.db"
//!
//! [collect]
//! per_page = 50
//! max_pages = 50
//! page_delay_ms = 1100
//!
//! [[sweeps]]
//! name = "top"
//! per_genre = 300
//! genres = ["Fiction", "Fantasy"]
//! ```
//!
//! Every table is optional; missing values fall back to the defaults below.

use std::path::{Path, PathBuf};

use bookharvest_hardcover::CollectOptions;
use bookharvest_hardcover::collect::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_DELAY, DEFAULT_PER_PAGE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Duration;

/// Overrides the database path from the config file.
pub const DATABASE_ENV: &str = "BOOKHARVEST_DATABASE";

/// Genres swept first, with the larger per-genre target.
pub const TOP_GENRES: [&str; 18] = [
    "Fiction",
    "Fantasy",
    "Young Adult",
    "Adventure",
    "Science Fiction",
    "Classics",
    "Comics",
    "History",
    "LGBTQ",
    "Romance",
    "War",
    "Juvenile Fiction",
    "Comics & Graphic Novels",
    "Biography",
    "Mystery",
    "Dystopian",
    "Religion",
    "General",
];
pub const TOP_GENRES_TARGET: usize = 300;

/// Genres swept second.
pub const MORE_GENRES: [&str; 22] = [
    "Biography & Autobiography",
    "Juvenile Nonfiction",
    "Aliens",
    "Space",
    "Business & Economics",
    "Philosophy",
    "Nonfiction",
    "Young Adult Fiction",
    "Science",
    "Thriller",
    "Computers",
    "Psychology",
    "Suspense",
    "Poetry",
    "Literature",
    "Humor",
    "Politics",
    "Social Science",
    "Travel",
    "Mathematics",
    "Cooking",
    "Political Science",
];
pub const MORE_GENRES_TARGET: usize = 200;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSettings {
    pub database: PathBuf,
    pub collect: CollectSettings,
    pub sweeps: Vec<Sweep>,
}

/// Paging limits shared by every genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectSettings {
    pub per_page: u32,
    pub max_pages: u32,
    pub page_delay_ms: u64,
}

impl Default for CollectSettings {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            page_delay_ms: DEFAULT_PAGE_DELAY.as_millis() as u64,
        }
    }
}

impl CollectSettings {
    /// Collector options for a genre with the given target count.
    pub fn options_for(&self, target: usize) -> CollectOptions {
        CollectOptions {
            target,
            per_page: self.per_page,
            max_pages: self.max_pages,
            page_delay: Duration::from_millis(self.page_delay_ms),
        }
    }
}

/// A named, ordered list of genres sharing one per-genre target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Sweep {
    pub name: String,
    pub per_genre: usize,
    pub genres: Vec<String>,
}

impl Sweep {
    fn from_static(name: &str, per_genre: usize, genres: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            per_genre,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }
}

/// The two built-in sweeps, in run order.
pub fn default_sweeps() -> Vec<Sweep> {
    vec![
        Sweep::from_static("top", TOP_GENRES_TARGET, &TOP_GENRES),
        Sweep::from_static("more", MORE_GENRES_TARGET, &MORE_GENRES),
    ]
}

/// Default database location: `<data_dir>/bookharvest/catalog.db`.
pub fn default_database_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("bookharvest").join("catalog.db")
}

/// The settings file as written on disk.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub database: Option<DatabaseSection>,
    #[serde(default)]
    pub collect: Option<CollectSettings>,
    #[serde(default)]
    pub sweeps: Option<Vec<Sweep>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DatabaseSection {
    pub path: Option<PathBuf>,
}

impl HarvestSettings {
    /// Load settings from `config_file` (or the default location) and the
    /// process environment.
    ///
    /// Database path priority: `database_override` > `$BOOKHARVEST_DATABASE`
    /// > `[database].path` > [`default_database_path`].
    ///
    /// An explicit `config_file` must exist; the default location may not.
    pub fn load(
        config_file: Option<&Path>,
        database_override: Option<PathBuf>,
    ) -> Result<Self, SettingsError> {
        let file = match config_file {
            Some(path) => read_settings_file(path)?
                .ok_or_else(|| SettingsError::NotFound(path.to_path_buf()))?,
            None => match bookharvest_hardcover::config_path() {
                Some(path) => read_settings_file(&path)?.unwrap_or_default(),
                None => SettingsFile::default(),
            },
        };
        Self::resolve(file, database_override, |var| std::env::var(var).ok())
    }

    /// Merge a parsed settings file with overrides and validate the result.
    pub fn resolve(
        file: SettingsFile,
        database_override: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let database = database_override
            .or_else(|| {
                env(DATABASE_ENV)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| file.database.and_then(|d| d.path))
            .unwrap_or_else(default_database_path);

        let settings = Self {
            database,
            collect: file.collect.unwrap_or_default(),
            sweeps: file.sweeps.unwrap_or_else(default_sweeps),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check paging limits and sweep definitions.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.collect.per_page == 0 {
            return Err(SettingsError::Invalid(
                "collect.per_page must be at least 1".into(),
            ));
        }
        if self.collect.max_pages == 0 {
            return Err(SettingsError::Invalid(
                "collect.max_pages must be at least 1".into(),
            ));
        }
        for sweep in &self.sweeps {
            if sweep.per_genre == 0 {
                return Err(SettingsError::Invalid(format!(
                    "sweep '{}' must collect at least 1 book per genre",
                    sweep.name
                )));
            }
            if sweep.genres.iter().all(|g| g.trim().is_empty()) {
                return Err(SettingsError::Invalid(format!(
                    "sweep '{}' has no genres",
                    sweep.name
                )));
            }
        }
        Ok(())
    }

    /// Total number of genre runs across all sweeps.
    pub fn genre_count(&self) -> usize {
        self.sweeps.iter().map(|s| s.genres.len()).sum()
    }
}

/// Read and parse a settings file. A missing file is not an error.
pub fn read_settings_file(path: &Path) -> Result<Option<SettingsFile>, SettingsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
