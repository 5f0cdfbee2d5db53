//! 验证器协议模块
//!
//! 验证器是纯函数：接收一个内部值，合法时返回 `None`，否则返回错误负载。
//! 字段级验证遇到第一个失败即停止；模型级验证收集所有失败字段；
//! 列表与模型集合按索引收集失败元素（稀疏映射，保留原始位置）。

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::QuickModelResult;
use crate::model_error;
use crate::types::FieldValue;

/// 验证错误负载
///
/// 单个字段返回 `Message`；模型级收集为 `Fields`（字段名 -> 错误）；
/// 列表/模型集合级收集为 `Items`（索引 -> 错误，仅含失败项）。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValidateError {
    /// 单条错误消息
    Message(String),
    /// 按字段名收集的错误映射
    Fields(BTreeMap<String, ValidateError>),
    /// 按索引收集的稀疏错误映射（仅失败元素有条目）
    Items(BTreeMap<usize, ValidateError>),
    /// 错误序列
    List(Vec<ValidateError>),
}

impl ValidateError {
    /// 构造单条消息错误
    pub fn message(msg: impl Into<String>) -> Self {
        ValidateError::Message(msg.into())
    }
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateError::Message(msg) => write!(f, "{}", msg),
            other => {
                let json = serde_json::to_string(other).unwrap_or_default();
                write!(f, "{}", json)
            }
        }
    }
}

impl From<&str> for ValidateError {
    fn from(msg: &str) -> Self {
        ValidateError::Message(msg.to_string())
    }
}

impl From<String> for ValidateError {
    fn from(msg: String) -> Self {
        ValidateError::Message(msg)
    }
}

/// 验证器函数契约：合法返回 `None`，非法返回错误负载
pub type ValidatorFn = dyn Fn(&FieldValue) -> Option<ValidateError> + Send + Sync;

/// 可共享的验证器句柄
pub type Validator = Arc<ValidatorFn>;

/// 将闭包包装为验证器
pub fn validator<F>(f: F) -> Validator
where
    F: Fn(&FieldValue) -> Option<ValidateError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 便捷验证器：字符串最大长度
pub fn max_length(max: usize) -> Validator {
    validator(move |v| match v {
        FieldValue::String(s) if s.chars().count() > max => Some(ValidateError::message(
            format!("字符串长度不能超过{}", max),
        )),
        _ => None,
    })
}

/// 便捷验证器：字符串最小长度
pub fn min_length(min: usize) -> Validator {
    validator(move |v| match v {
        FieldValue::String(s) if s.chars().count() < min => Some(ValidateError::message(
            format!("字符串长度不能少于{}", min),
        )),
        _ => None,
    })
}

/// 便捷验证器：数值下限（对 Int/Float 生效）
pub fn min_value(min: f64) -> Validator {
    validator(move |v| {
        let below = match v {
            FieldValue::Int(i) => int_lt(*i, min),
            FieldValue::Float(f) => *f < min,
            _ => return None,
        };
        if below {
            Some(ValidateError::message(format!("数值不能小于{}", min)))
        } else {
            None
        }
    })
}

/// 便捷验证器：数值上限（对 Int/Float 生效）
pub fn max_value(max: f64) -> Validator {
    validator(move |v| {
        let above = match v {
            FieldValue::Int(i) => int_gt(*i, max),
            FieldValue::Float(f) => *f > max,
            _ => return None,
        };
        if above {
            Some(ValidateError::message(format!("数值不能大于{}", max)))
        } else {
            None
        }
    })
}

/// i64 与 f64 边界的精确小于比较
///
/// i64 直接转 f64 在 2^53 以上会截断，边界附近的整数会被误判；
/// 改为取边界的整数部分（落在 i64 范围内时转换无损）做整数比较。
fn int_lt(i: i64, bound: f64) -> bool {
    if bound.is_nan() {
        return false;
    }
    if bound >= i64::MAX as f64 {
        return true;
    }
    if bound < i64::MIN as f64 {
        return false;
    }
    let floor = bound.floor();
    i < floor as i64 || (i == floor as i64 && floor < bound)
}

/// i64 与 f64 边界的精确大于比较
fn int_gt(i: i64, bound: f64) -> bool {
    if bound.is_nan() {
        return false;
    }
    if bound >= i64::MAX as f64 {
        return false;
    }
    if bound < i64::MIN as f64 {
        return true;
    }
    let ceil = bound.ceil();
    i > ceil as i64 || (i == ceil as i64 && ceil > bound)
}

/// 便捷验证器：正则匹配
///
/// 正则表达式在构造期编译，非法模式立即返回配置错误。
pub fn matches_pattern(pattern: &str) -> QuickModelResult<Validator> {
    let re = regex::Regex::new(pattern)
        .map_err(|e| model_error!(config, format!("正则表达式无效: {}", e)))?;
    Ok(validator(move |v| match v {
        FieldValue::String(s) if !re.is_match(s) => Some(ValidateError::message(
            format!("字符串不匹配正则表达式: {}", re.as_str()),
        )),
        _ => None,
    }))
}
