//! 错误类型
//!
//! 只有加载失败、配置错误和输出失败会向上传播；
//! 单行解析失败与单个事件的渲染失败不会中断回放。

use std::path::PathBuf;

use crate::trace::EventKind;

pub type VizResult<T> = Result<T, VizError>;

/// 会话级错误
#[derive(thiserror::Error, Debug)]
pub enum VizError {
    /// trace 文件缺失或不可读：不启动回放
    #[error("failed to load trace '{path}': {source}")]
    TraceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to write frame '{path}': {source}")]
    FrameWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VizError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// 单个事件的渲染错误：记录日志后跳过该事件
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("no surface registered for entity '{0}'")]
    UnknownEntity(String),

    #[error("{kind} event expects {expected} coordinates, got {got}")]
    Arity {
        kind: EventKind,
        expected: usize,
        got: usize,
    },
}
