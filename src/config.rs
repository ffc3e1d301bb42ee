use log::warn;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory names skipped at any depth by the source scan.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".venv",
    "venv",
    "env",
    "virtualenv",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".tox",
    ".nox",
    ".eggs",
    "build",
    "dist",
    "site-packages",
    "node_modules",
];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub source_extensions: Vec<String>,
    pub doc_extensions: Vec<String>,
    pub excluded_dirs: Vec<String>,
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            source_extensions: crate::parsers::treesitter::languages::get_supported_extensions()
                .into_iter()
                .map(String::from)
                .collect(),
            doc_extensions: vec!["md".into(), "markdown".into(), "txt".into()],
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            follow_links: false,
        }
    }
}

impl ScanOptions {
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }

    pub fn is_source_extension(&self, ext: &str) -> bool {
        self.source_extensions.iter().any(|e| e == ext)
    }

    pub fn is_doc_extension(&self, ext: &str) -> bool {
        self.doc_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Disabled,
}

/// Settings for the optional text-generation service.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub use_proxy: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Disabled,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_proxy: true,
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match non_empty("DOCAUDIT_LLM")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("off") | Some("none") | Some("disabled") | Some("0") | Some("false") => {
                Provider::Disabled
            }
            None | Some("openai") => Provider::OpenAi,
            Some(other) => {
                warn!(
                    "Unrecognized DOCAUDIT_LLM value {:?}, using openai (expected openai or off)",
                    other
                );
                Provider::OpenAi
            }
        };

        let timeout_secs = match non_empty("DOCAUDIT_LLM_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "Invalid DOCAUDIT_LLM_TIMEOUT_SECS {:?}, defaulting to {}s",
                    raw,
                    DEFAULT_TIMEOUT_SECS
                );
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            provider,
            // Some clients read OPENAI_KEY instead of OPENAI_API_KEY
            api_key: non_empty("OPENAI_API_KEY").or_else(|| non_empty("OPENAI_KEY")),
            base_url: non_empty("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: 0.0,
            timeout: Duration::from_secs(timeout_secs),
            use_proxy: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditConfig {
    pub scan: ScanOptions,
    pub generator: GeneratorConfig,
}

impl AuditConfig {
    pub fn from_env() -> Self {
        Self {
            scan: ScanOptions::default(),
            generator: GeneratorConfig::from_env(),
        }
    }
}
