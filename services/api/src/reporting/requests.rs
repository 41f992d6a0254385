use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TopRisksQuery {
    pub limit: Option<usize>,
}
