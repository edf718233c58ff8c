use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::{ExpenseError, Result},
    utils::{ensure_dir, PathResolver},
};

const TMP_SUFFIX: &str = "tmp";
const DATA_FILE_ENV: &str = "EXPENSE_TRACKER_FILE";

pub const DEFAULT_DATA_FILE: &str = "expense.csv";
pub const DEFAULT_CURRENCY_LABEL: &str = "₹";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Expense file; relative paths resolve against the working directory.
    pub data_file: PathBuf,
    pub currency_label: String,
    /// Fixed chart width in columns; detected from the terminal when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_width: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            currency_label: DEFAULT_CURRENCY_LABEL.into(),
            chart_width: None,
        }
    }
}

impl Config {
    /// Applies `EXPENSE_TRACKER_FILE` on top of the stored settings.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = env::var_os(DATA_FILE_ENV) {
            if !path.is_empty() {
                self.data_file = PathBuf::from(path);
            }
        }
        self
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_label, amount)
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: PathResolver::config_file_in(&base),
        }
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)
            .map_err(|err| ExpenseError::storage(&self.path, err))?;
        serde_json::from_str(&data).map_err(|err| {
            ExpenseError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    /// Loads the config, writing the defaults out first when no file exists yet.
    pub fn load_or_init(&self) -> Result<Config> {
        if self.path.exists() {
            return self.load();
        }
        let config = Config::default();
        self.save(&config)?;
        tracing::info!(path = %self.path.display(), "wrote default configuration");
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path).map_err(|err| ExpenseError::storage(&self.path, err))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path).map_err(|err| ExpenseError::storage(path, err))?;
    file.write_all(data.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|err| ExpenseError::storage(path, err))
}
