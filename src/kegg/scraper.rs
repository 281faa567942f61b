use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use chrono::Utc;
use futures::StreamExt;
use select::document::Document;
use select::predicate::Name;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::MapperConfig;
use crate::error::ToolsError;
use crate::traits::Mapper;

use super::types::PathwayRecord;

const GENOME_BASE_URL: &str = "https://www.genome.jp";

// Absolute locations of the reconstruct form's controls.
const EXEC_LINK_XPATH: &str = "/html/body/div[1]/ul/form/li[4]/a";
const VIEW_OPTION_XPATH: &str = "/html/body/div[2]/form/label[3]/input";
const VIEW_SUBMIT_XPATH: &str = "/html/body/div[2]/form/input[1]";

/// Settle time between form interactions.
const STEP_WAIT_SECS: u64 = 3;

/// Browser session against the KEGG reconstruct tool.
pub struct KeggMapper {
    config: MapperConfig,
    browser: Option<Browser>,
    page: Option<Arc<Page>>,
}

impl KeggMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            browser: None,
            page: None,
        }
    }

    fn get_page(&self) -> Result<&Arc<Page>, ToolsError> {
        self.page
            .as_ref()
            .ok_or_else(|| ToolsError::BrowserInit("browser is not initialized".into()))
    }

    /// Click the node at an absolute XPath via in-page JavaScript.
    async fn click_xpath(&self, page: &Page, xpath: &str, what: &str) -> Result<(), ToolsError> {
        let script = format!(
            r#"
            (function() {{
                var node = document.evaluate(
                    "{xpath}", document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null
                ).singleNodeValue;
                if (node) {{
                    node.click();
                    return true;
                }}
                return false;
            }})()
            "#
        );

        let clicked: bool = page
            .evaluate(script.as_str())
            .await
            .map_err(|e| ToolsError::JavaScript(e.to_string()))?
            .into_value()
            .unwrap_or(false);

        if !clicked {
            return Err(ToolsError::ElementNotFound(format!("{what} ({xpath})")));
        }
        debug!("Clicked {}", what);
        Ok(())
    }

    /// Capture a full-page screenshot at a pipeline milestone (debug mode).
    async fn debug_screenshot(&self, page: &Page, step: &str) {
        if !self.config.debug {
            return;
        }
        if let Ok(screenshot) = page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
        {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
            debug!("{} screenshot: data:image/png;base64,{}", step, encoded);

            let filename = std::env::temp_dir().join(format!(
                "kegg_mapper_{step}_{}.png",
                Utc::now().format("%Y%m%d_%H%M%S")
            ));
            if let Err(e) = std::fs::write(&filename, &screenshot) {
                warn!("Failed to write screenshot {:?}: {}", filename, e);
            }
        }
    }
}

#[async_trait]
impl Mapper for KeggMapper {
    async fn initialize(&mut self) -> Result<(), ToolsError> {
        info!("Initializing browser for pathway mapper...");

        // Unique profile dir: parallel sessions must not share browser state.
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("kegg-mapper-{unique_id}"));

        let chrome_path = match &self.config.chrome_path {
            Some(path) => path.display().to_string(),
            None => std::env::var("CHROME_PATH")
                .or_else(|_| std::env::var("CHROMIUM_PATH"))
                .unwrap_or_else(|_| "chromium".to_string()),
        };

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(&user_data_dir)
            .window_size(1280, 800);

        if !self.config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .no_sandbox()
            .request_timeout(self.config.timeout)
            .arg("--disable-extensions")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        let browser_config = builder
            .build()
            .map_err(|e| ToolsError::BrowserInit(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ToolsError::BrowserInit(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ToolsError::BrowserInit(e.to_string()))?;

        self.browser = Some(browser);
        self.page = Some(Arc::new(page));

        info!("Browser initialized");
        Ok(())
    }

    async fn submit(&mut self, gene_list: &Path) -> Result<(), ToolsError> {
        let page = self.get_page()?.clone();
        info!("Submitting gene list {:?}", gene_list);

        let input_path = gene_list
            .canonicalize()
            .map_err(|e| ToolsError::Upload(format!("{}: {e}", gene_list.display())))?;

        page.goto(self.config.base_url.as_str())
            .await
            .map_err(|e| ToolsError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ToolsError::Navigation(e.to_string()))?;
        debug!("Mapper page loaded");

        // Attach the gene list to the upload field.
        let upload = page
            .find_element("input[type='file']")
            .await
            .map_err(|e| ToolsError::ElementNotFound(format!("file input: {e}")))?;
        let params = SetFileInputFilesParams {
            files: vec![input_path.display().to_string()],
            node_id: None,
            backend_node_id: Some(upload.backend_node_id.clone()),
            object_id: None,
        };
        page.execute(params)
            .await
            .map_err(|e| ToolsError::Upload(e.to_string()))?;
        debug!("Gene list attached");

        page.find_element("input[type='submit']")
            .await
            .map_err(|e| ToolsError::ElementNotFound(format!("submit button: {e}")))?
            .click()
            .await
            .map_err(|e| ToolsError::Navigation(format!("submit click: {e}")))?;
        sleep(Duration::from_secs(STEP_WAIT_SECS)).await;
        self.debug_screenshot(&page, "submit").await;

        self.click_xpath(&page, EXEC_LINK_XPATH, "exec link").await?;
        sleep(Duration::from_secs(STEP_WAIT_SECS)).await;

        self.click_xpath(&page, VIEW_OPTION_XPATH, "view option").await?;
        sleep(Duration::from_secs(STEP_WAIT_SECS)).await;

        self.click_xpath(&page, VIEW_SUBMIT_XPATH, "view submit").await?;
        sleep(Duration::from_secs(STEP_WAIT_SECS)).await;

        info!("Gene list submitted");
        Ok(())
    }

    async fn collect(&mut self) -> Result<Vec<PathwayRecord>, ToolsError> {
        let page = self.get_page()?.clone();
        info!("Collecting mapper results...");
        self.debug_screenshot(&page, "collect").await;

        let html: String = page
            .evaluate(
                r#"
                (function() {
                    var div = document.getElementById('list');
                    return div ? div.innerHTML : '';
                })()
                "#,
            )
            .await
            .map_err(|e| ToolsError::JavaScript(e.to_string()))?
            .into_value()
            .unwrap_or_default();

        if html.is_empty() {
            return Err(ToolsError::ElementNotFound("result list (#list)".into()));
        }

        let records = parse_results(&html)?;
        info!("Collected {} pathway records", records.len());
        Ok(records)
    }

    async fn close(&mut self) -> Result<(), ToolsError> {
        info!("Closing browser...");
        self.page = None;
        self.browser = None;
        Ok(())
    }
}

/// Parse the scraped `#list` fragment into pathway records.
///
/// For each `<li>`: id and href come from the first child anchor, the entry
/// name is the second child's text minus its trailing character, the state
/// is the fourth child's text minus its leading character, the section title
/// is the grandparent's first child, and the top-level title is the
/// great-grandparent's second child. Anything else is a
/// [`ToolsError::Parse`].
pub fn parse_results(html: &str) -> Result<Vec<PathwayRecord>, ToolsError> {
    let document = Document::from(html);
    let mut records = Vec::new();

    for li in document.find(Name("li")) {
        let section = li
            .parent()
            .and_then(|p| p.parent())
            .ok_or_else(|| ToolsError::Parse("list entry without enclosing section".into()))?;
        let title = section
            .children()
            .next()
            .map(|n| n.text().trim().to_string())
            .ok_or_else(|| ToolsError::Parse("section without a title".into()))?;
        let big_title = section
            .parent()
            .and_then(|g| g.children().nth(1))
            .map(|n| n.text().trim().to_string())
            .ok_or_else(|| ToolsError::Parse("section without a top-level title".into()))?;

        let children: Vec<_> = li.children().collect();
        let anchor = children
            .first()
            .ok_or_else(|| ToolsError::Parse("empty list entry".into()))?;
        let href = anchor
            .attr("href")
            .ok_or_else(|| ToolsError::Parse("list entry without an anchor href".into()))?;

        let text = children
            .get(1)
            .map(|n| n.text())
            .ok_or_else(|| ToolsError::Parse("list entry without a name".into()))?;
        let state = children
            .get(3)
            .map(|n| n.text())
            .ok_or_else(|| ToolsError::Parse("list entry without a state".into()))?;

        records.push(PathwayRecord {
            id: anchor.text().trim().to_string(),
            link: format!("{GENOME_BASE_URL}{href}"),
            text: trim_last(text.trim()).to_string(),
            state: skip_first(state.trim()).to_string(),
            title,
            big_title,
        });
    }

    Ok(records)
}

fn trim_last(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next_back();
    chars.as_str()
}

fn skip_first(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    // One section with two entries, written without inter-tag whitespace so
    // child positions match the live tool's markup.
    const RESULT_FRAGMENT: &str = "<div><a name=\"top\"></a><h2>Metabolism</h2>\
<div><b>Carbohydrate metabolism</b>\
<ul>\
<li><a href=\"/pathway/map00010+K00844\">map00010</a>Glycolysis / Gluconeogenesis;<i></i>(2 / 45)</li>\
<li><a href=\"/pathway/map00020+K01647\">map00020</a>Citrate cycle (TCA cycle);<i></i>(1 / 30)</li>\
</ul>\
</div></div>";

    #[test]
    fn test_parse_results() {
        let records = parse_results(RESULT_FRAGMENT).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.id, "map00010");
        assert_eq!(first.link, "https://www.genome.jp/pathway/map00010+K00844");
        assert_eq!(first.text, "Glycolysis / Gluconeogenesis");
        assert_eq!(first.state, "2 / 45)");
        assert_eq!(first.title, "Carbohydrate metabolism");
        assert_eq!(first.big_title, "Metabolism");

        assert_eq!(records[1].id, "map00020");
        assert_eq!(records[1].text, "Citrate cycle (TCA cycle)");
    }

    #[test]
    fn test_parse_results_empty_fragment() {
        assert!(parse_results("<div></div>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_results_entry_without_anchor() {
        let html = "<div><a name=\"top\"></a><h2>Metabolism</h2>\
<div><b>Carbohydrate metabolism</b><ul><li>no anchor here</li></ul></div></div>";
        assert!(matches!(
            parse_results(html),
            Err(ToolsError::Parse(_))
        ));
    }

    #[test]
    fn test_trim_helpers() {
        assert_eq!(trim_last("Glycolysis;"), "Glycolysis");
        assert_eq!(skip_first("(complete"), "complete");
        assert_eq!(trim_last(""), "");
        assert_eq!(skip_first(""), "");
    }

    #[test]
    fn test_mapper_new() {
        let mapper = KeggMapper::new(MapperConfig::default());
        assert!(mapper.browser.is_none());
        assert!(mapper.page.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = MapperConfig::new()
            .with_base_url("https://example.org/mapper")
            .with_headless(false)
            .with_debug(true)
            .with_timeout(Duration::from_secs(120));

        assert_eq!(config.base_url, "https://example.org/mapper");
        assert!(!config.headless);
        assert!(config.debug);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
