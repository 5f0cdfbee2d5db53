//! 错误类型定义
//!
//! 区分三类故障：配置错误（构造期致命）、转换错误（结构性非法输入，立即失败）、
//! 分支操作错误。字段验证失败不属于错误，以 `ValidateError` 数据形式返回。

use thiserror::Error;

/// 统一错误类型
#[derive(Error, Debug)]
pub enum QuickModelError {
    /// 配置错误（字段/模型构造期的契约违反，如未绑定模型的 ModelSet）
    #[error("配置错误: {message}")]
    ConfigError { message: String },

    /// 数据转换错误（结构性非法输入，无法产生可供验证的内部值）
    #[error("数据转换失败: 字段 '{field}': {message}")]
    ConversionError { field: String, message: String },

    /// 序列化错误
    #[error("序列化失败: {message}")]
    SerializationError { message: String },

    /// 分支操作错误（如在未备份时执行恢复）
    #[error("分支操作失败: {message}")]
    BranchError { message: String },
}

/// 统一结果类型
pub type QuickModelResult<T> = Result<T, QuickModelError>;

impl From<serde_json::Error> for QuickModelError {
    fn from(e: serde_json::Error) -> Self {
        QuickModelError::SerializationError {
            message: e.to_string(),
        }
    }
}

/// 便捷宏：快速构造错误
///
/// 用法：
/// - `model_error!(config, "消息")`
/// - `model_error!(conversion, "字段名", "消息")`
/// - `model_error!(serialization, "消息")`
/// - `model_error!(branch, "消息")`
#[macro_export]
macro_rules! model_error {
    (config, $msg:expr) => {
        $crate::error::QuickModelError::ConfigError {
            message: $msg.to_string(),
        }
    };
    (conversion, $field:expr, $msg:expr) => {
        $crate::error::QuickModelError::ConversionError {
            field: $field.to_string(),
            message: $msg.to_string(),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::QuickModelError::SerializationError {
            message: $msg.to_string(),
        }
    };
    (branch, $msg:expr) => {
        $crate::error::QuickModelError::BranchError {
            message: $msg.to_string(),
        }
    };
}
