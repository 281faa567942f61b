use async_trait::async_trait;
use std::path::Path;

use crate::error::ToolsError;
use crate::kegg::PathwayRecord;

#[async_trait]
pub trait Mapper: Send + Sync {
    /// Launch the browser.
    async fn initialize(&mut self) -> Result<(), ToolsError>;

    /// Upload a gene list and drive the tool to the result view.
    async fn submit(&mut self, gene_list: &Path) -> Result<(), ToolsError>;

    /// Scrape the result list.
    async fn collect(&mut self) -> Result<Vec<PathwayRecord>, ToolsError>;

    /// Release browser resources.
    async fn close(&mut self) -> Result<(), ToolsError>;

    /// Full pipeline: initialize → submit → collect → close.
    async fn execute(&mut self, gene_list: &Path) -> Result<Vec<PathwayRecord>, ToolsError> {
        self.initialize().await?;
        self.submit(gene_list).await?;
        let records = self.collect().await?;
        self.close().await?;
        Ok(records)
    }
}
