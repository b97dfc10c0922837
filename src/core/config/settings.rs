use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::paths::AppPaths;

const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub timeout_secs: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 2 }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    server: ServerSettings,
    completion: CompletionSettings,
    retrieval: RetrievalSettings,
    model_dir: Option<PathBuf>,
}

/// Resolved application configuration.
///
/// Loaded once at startup from an optional `config.yml` plus the
/// `GROQ_API_KEY` environment variable. A missing or empty key fails the
/// load; every other field has a built-in default.
#[derive(Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub completion: CompletionSettings,
    pub retrieval: RetrievalSettings,
    pub model_dir: PathBuf,
    pub groq_api_key: String,
}

// The API key never appears in Debug output.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("server", &self.server)
            .field("completion", &self.completion)
            .field("retrieval", &self.retrieval)
            .field("model_dir", &self.model_dir)
            .field("groq_api_key", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    pub fn load(paths: &AppPaths) -> Result<Self> {
        let file = read_settings(&config_path(paths))?;

        let groq_api_key = env::var(GROQ_API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| format!("{} is not set", GROQ_API_KEY_VAR))?;

        let model_dir_override = env::var("BANTER_MODEL_DIR").ok().map(PathBuf::from);

        Self::assemble(file, groq_api_key, model_dir_override, paths)
    }

    fn assemble(
        file: SettingsFile,
        groq_api_key: String,
        model_dir_override: Option<PathBuf>,
        paths: &AppPaths,
    ) -> Result<Self> {
        if file.retrieval.top_k == 0 {
            bail!("retrieval.top_k must be at least 1");
        }

        let model_dir = model_dir_override
            .or(file.model_dir)
            .unwrap_or_else(|| paths.model_dir.clone());

        Ok(Self {
            server: file.server,
            completion: file.completion,
            retrieval: file.retrieval,
            model_dir,
            groq_api_key,
        })
    }

    /// Configuration with built-in defaults and no API key (for testing).
    pub fn offline() -> Self {
        Self {
            server: ServerSettings::default(),
            completion: CompletionSettings::default(),
            retrieval: RetrievalSettings::default(),
            model_dir: PathBuf::new(),
            groq_api_key: String::new(),
        }
    }
}

fn config_path(paths: &AppPaths) -> PathBuf {
    if let Ok(path) = env::var("BANTER_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    let user_config = paths.user_data_dir.join("config.yml");
    if user_config.exists() {
        return user_config;
    }

    paths.project_root.join("config.yml")
}

fn read_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_for(dir: &Path) -> AppPaths {
        AppPaths {
            project_root: dir.to_path_buf(),
            user_data_dir: dir.to_path_buf(),
            log_dir: dir.join("logs"),
            model_dir: dir.join("models").join("all-MiniLM-L6-v2"),
        }
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let file = read_settings(&dir.path().join("config.yml")).unwrap();

        assert_eq!(file.server.port, 8000);
        assert_eq!(file.completion.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(file.completion.model, "llama-3.3-70b-versatile");
        assert_eq!(file.retrieval.top_k, 2);
    }

    #[test]
    fn yaml_overrides_defaults_per_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "server:\n  port: 9001\ncompletion:\n  model: test-model\n  temperature: 0.2\nretrieval:\n  top_k: 4\n",
        )
        .unwrap();

        let file = read_settings(&path).unwrap();

        assert_eq!(file.server.port, 9001);
        assert_eq!(file.completion.model, "test-model");
        assert_eq!(file.completion.temperature, Some(0.2));
        assert_eq!(file.retrieval.top_k, 4);
        assert_eq!(file.completion.base_url, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "server: [not, a, map\n").unwrap();

        assert!(read_settings(&path).is_err());
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = SettingsFile {
            retrieval: RetrievalSettings { top_k: 0 },
            ..SettingsFile::default()
        };

        let err = AppConfig::assemble(file, "key".to_string(), None, &paths_for(dir.path()))
            .unwrap_err();

        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn model_dir_falls_back_to_app_paths() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_for(dir.path());

        let config =
            AppConfig::assemble(SettingsFile::default(), "key".to_string(), None, &paths).unwrap();

        assert_eq!(config.model_dir, paths.model_dir);
    }

    #[test]
    fn model_dir_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_for(dir.path());
        let override_dir = dir.path().join("elsewhere");

        let config = AppConfig::assemble(
            SettingsFile::default(),
            "key".to_string(),
            Some(override_dir.clone()),
            &paths,
        )
        .unwrap();

        assert_eq!(config.model_dir, override_dir);
    }

    #[test]
    fn debug_output_omits_the_api_key() {
        let dir = tempfile::tempdir().unwrap();

        let config = AppConfig::assemble(
            SettingsFile::default(),
            "sk-very-secret".to_string(),
            None,
            &paths_for(dir.path()),
        )
        .unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
