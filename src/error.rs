use thiserror::Error;

use crate::api::SeriesId;
use crate::scene::NodeId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown scene node: {0:?}")]
    UnknownNode(NodeId),

    #[error("unknown series: {0:?}")]
    UnknownSeries(SeriesId),

    #[error("invalid scene operation: {0}")]
    InvalidSceneOperation(String),
}
