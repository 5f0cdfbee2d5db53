//! 内部值类型
//!
//! `FieldValue` 是字段的内部表示：强类型的内存值（如 Decimal、DateTime、嵌套模型实例）。
//! 外部表示统一使用 `serde_json::Value`，两者之间由字段负责双向转换。

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::model::{ModelInstance, ModelSet};

/// 通用内部值类型
#[derive(Clone, PartialEq)]
pub enum FieldValue {
    /// 空值
    Null,
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    String(String),
    /// 绝对时间点（UTC）
    DateTime(DateTime<Utc>),
    /// 任意精度十进制
    Decimal(Decimal),
    /// 数组
    Array(Vec<FieldValue>),
    /// 普通对象/文档
    Object(HashMap<String, FieldValue>),
    /// 嵌套模型实例
    Model(Box<ModelInstance>),
    /// 嵌套模型集合
    Set(Box<ModelSet>),
}

impl FieldValue {
    /// 获取数据类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::Decimal(_) => "decimal",
            FieldValue::Array(_) => "array",
            FieldValue::Object(_) => "object",
            FieldValue::Model(_) => "model",
            FieldValue::Set(_) => "model_set",
        }
    }

    /// 判断是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// 从 JSON 值做无类型提示的通用转换
    ///
    /// 字段级转换在此基础上按字段类型细化（如时间戳解析、十进制解析）；
    /// 无法细化的值按原样保留，交由后续验证判定。
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => FieldValue::Null,
            JsonValue::Bool(b) => FieldValue::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::Null
                }
            }
            JsonValue::String(s) => FieldValue::String(s.clone()),
            JsonValue::Array(arr) => {
                FieldValue::Array(arr.iter().map(FieldValue::from_json).collect())
            }
            JsonValue::Object(obj) => FieldValue::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// 转换为 JSON 值（通用回退路径）
    ///
    /// 时间戳/日期时间/十进制等字段的外部表示由字段自身决定，
    /// 此方法仅提供与字段配置无关的规范转换。
    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Null => JsonValue::Null,
            FieldValue::Bool(b) => JsonValue::Bool(*b),
            FieldValue::Int(i) => JsonValue::Number(serde_json::Number::from(*i)),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            FieldValue::String(s) => JsonValue::String(s.clone()),
            FieldValue::DateTime(dt) => {
                JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            FieldValue::Decimal(d) => JsonValue::String(d.to_string()),
            FieldValue::Array(arr) => {
                JsonValue::Array(arr.iter().map(FieldValue::to_json).collect())
            }
            FieldValue::Object(obj) => JsonValue::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            FieldValue::Model(inst) => inst.to_representation(),
            FieldValue::Set(set) => set.to_representation(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            FieldValue::Decimal(d) => write!(f, "{}", d),
            other => {
                let json_str = serde_json::to_string(&other.to_json()).unwrap_or_default();
                write!(f, "{}", json_str)
            }
        }
    }
}

impl std::fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug 与 Display 保持一致，显示实际值而不是类型构造函数
        write!(f, "{}", self)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::Array(value)
    }
}

impl From<ModelInstance> for FieldValue {
    fn from(value: ModelInstance) -> Self {
        FieldValue::Model(Box::new(value))
    }
}

impl From<ModelSet> for FieldValue {
    fn from(value: ModelSet) -> Self {
        FieldValue::Set(Box::new(value))
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}
