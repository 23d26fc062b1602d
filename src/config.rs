use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const ROOT_ENV: &str = "LOCALE_VIEWER_ROOT";

const TEMPLATE_PATH: &str = "assets/json/template.json";
const FILE_LIST_PATH: &str = "assets/json/file-list.json";
const LOCALE_DIR: &str = "assets/locale";

fn default_root() -> String {
    std::env::var(ROOT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| ".".to_string())
}

fn under_root(rel: &str) -> String {
    join_path(&default_root(), rel)
}

fn default_template_path() -> String {
    under_root(TEMPLATE_PATH)
}

fn default_file_list_path() -> String {
    under_root(FILE_LIST_PATH)
}

fn default_locale_dir() -> String {
    under_root(LOCALE_DIR)
}

/// Where the viewer finds its assets. Paths may be filesystem paths or
/// http(s) URLs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    #[serde(default = "default_template_path", alias = "template")]
    pub template_path: String,

    #[serde(default = "default_file_list_path", alias = "file_list")]
    pub file_list_path: String,

    #[serde(default = "default_locale_dir", alias = "locale_root")]
    pub locale_dir: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            template_path: default_template_path(),
            file_list_path: default_file_list_path(),
            locale_dir: default_locale_dir(),
        }
    }
}

impl ViewerConfig {
    pub fn locale_path(&self, file_name: &str) -> String {
        join_path(&self.locale_dir, file_name)
    }
}

/// Joins with `/` for URLs and with the platform separator otherwise.
pub fn join_path(base: &str, name: &str) -> String {
    if is_remote(base) {
        format!("{}/{}", base.trim_end_matches('/'), name)
    } else {
        PathBuf::from(base).join(name).to_string_lossy().to_string()
    }
}

pub fn is_remote(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
