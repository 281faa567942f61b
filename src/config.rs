use std::path::PathBuf;
use std::time::Duration;

/// KEGG reconstruct tool entry page.
pub const KEGG_MAPPER_URL: &str = "https://www.genome.jp/kegg/mapper/reconstruct.html";

#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// URL of the pathway mapping tool.
    pub base_url: String,
    /// Chrome/Chromium executable. Falls back to the `CHROME_PATH` /
    /// `CHROMIUM_PATH` environment variables, then plain `chromium`.
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    /// Capture screenshots at pipeline milestones.
    pub debug: bool,
    /// CDP request timeout.
    pub timeout: Duration,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            base_url: KEGG_MAPPER_URL.to_string(),
            chrome_path: None,
            headless: true,
            debug: false,
            timeout: Duration::from_secs(60),
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
