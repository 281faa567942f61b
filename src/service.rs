use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{stream, StreamExt};
use tower::Service;
use tracing::info;

use crate::config::MapperConfig;
use crate::error::ToolsError;
use crate::kegg::{save_records, KeggMapper, PathwayRecord};
use crate::traits::Mapper;

/// One mapping request: a gene-list file in, a result file out.
#[derive(Debug, Clone)]
pub struct MapRequest {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub headless: bool,
}

impl MapRequest {
    pub fn new(input_file: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            output_file: output_file.into(),
            headless: true,
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl From<&MapRequest> for MapperConfig {
    fn from(req: &MapRequest) -> Self {
        MapperConfig::new().with_headless(req.headless)
    }
}

/// Result of one mapping request.
#[derive(Debug)]
pub struct MapResult {
    pub records: Vec<PathwayRecord>,
    pub output_path: PathBuf,
}

/// Mapper pipeline behind a tower::Service.
#[derive(Debug, Clone, Default)]
pub struct MapperService {
    // Room for rate limiting / caching later.
}

impl MapperService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<MapRequest> for MapperService {
    type Response = MapResult;
    type Error = ToolsError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: MapRequest) -> Self::Future {
        info!("Mapping request received: input={:?}", req.input_file);

        Box::pin(async move {
            let config: MapperConfig = (&req).into();
            let mut mapper = KeggMapper::new(config);

            let records = mapper.execute(&req.input_file).await?;
            save_records(&records, &req.output_file)?;

            info!(
                "Mapping complete: input={:?}, records={}, output={:?}",
                req.input_file,
                records.len(),
                req.output_file
            );

            Ok(MapResult {
                records,
                output_path: req.output_file,
            })
        })
    }
}

/// Run independent mapping requests over a bounded worker pool.
///
/// Each request gets its own browser session; a failed session never aborts
/// its siblings. Results are paired with the request's input file and come
/// back in completion order.
pub async fn map_all(
    requests: Vec<MapRequest>,
    max_workers: usize,
) -> Vec<(PathBuf, Result<MapResult, ToolsError>)> {
    stream::iter(requests)
        .map(|req| async move {
            let input = req.input_file.clone();
            let mut service = MapperService::new();
            let result = service.call(req).await;
            (input, result)
        })
        .buffer_unordered(max_workers.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_request_builder() {
        let req = MapRequest::new("genelist.txt", "genelist_out.csv").with_headless(false);

        assert_eq!(req.input_file, PathBuf::from("genelist.txt"));
        assert_eq!(req.output_file, PathBuf::from("genelist_out.csv"));
        assert!(!req.headless);
    }

    #[test]
    fn test_map_request_to_config() {
        let req = MapRequest::new("genelist.txt", "out.csv");
        let config: MapperConfig = (&req).into();

        assert!(config.headless);
        assert_eq!(config.base_url, crate::config::KEGG_MAPPER_URL);
    }

    #[tokio::test]
    async fn test_map_all_empty() {
        assert!(map_all(Vec::new(), 8).await.is_empty());
    }
}
