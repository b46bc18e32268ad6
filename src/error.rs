//! 地图生成错误类型

use thiserror::Error;

/// 地图生成流程中的错误
///
/// 所有错误都只影响当前这一次生成请求，调用方可以直接发起下一次生成。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    /// 参数不合法（负数数量、退化的噪声区间、非有限值等）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 站点集合无法构成 Voronoi 图（为空或不同点少于两个）
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
