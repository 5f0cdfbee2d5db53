//! 字段类型定义模块
//!
//! 字段是模型属性的声明式单元：类型、默认值、验证规则，
//! 以及外部表示（JSON）与内部表示（FieldValue）之间的双向转换。

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::error::QuickModelResult;
use crate::model::model_set::{ModelSet, ModelSetType};
use crate::model::schema::ModelSchema;
use crate::types::FieldValue;
use crate::utils::timezone::{format_in_zone, naive_in_zone_to_utc, zoned_epoch_millis, ZoneOffset};
use crate::validators::{ValidateError, Validator};

/// 日期时间字段的默认格式模式
pub const DEFAULT_DATETIME_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";
/// 日期字段的默认格式模式
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd";

/// 默认值工厂：每次调用产生全新的值，避免可变默认值在实例间共享
pub type DefaultFactory = Arc<dyn Fn() -> FieldValue + Send + Sync>;

/// 嵌套模型字段的目标类型
#[derive(Clone)]
pub enum ModelType {
    /// 单个嵌套模型
    Model(ModelSchema),
    /// 嵌套模型集合
    Set(ModelSetType),
}

impl std::fmt::Debug for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelType::Model(schema) => write!(f, "Model({})", schema.name()),
            ModelType::Set(ty) => write!(f, "Set({})", ty.name()),
        }
    }
}

/// 字段类型枚举
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// 字符串类型
    String,
    /// 整数类型
    Integer,
    /// 浮点数类型
    Float,
    /// 布尔类型
    Boolean,
    /// 时间戳类型（外部表示为按时区调整的毫秒数）
    Timestamp {
        /// 已验证的时区偏移，None 表示本地时区
        time_zone: Option<ZoneOffset>,
    },
    /// 日期时间类型（外部表示为格式化字符串）
    DateTime {
        format: String,
        time_zone: Option<ZoneOffset>,
    },
    /// 日期类型（日期时间的短格式细化）
    Date {
        format: String,
        time_zone: Option<ZoneOffset>,
    },
    /// 任意精度十进制类型
    Decimal,
    /// JSON 透传类型（接受任何值）
    Json,
    /// 列表类型（同构集合，元素由 child 字段描述）
    List { child: Box<Field> },
    /// 嵌套模型类型
    Model { target: ModelType },
}

/// 字段定义
///
/// 一旦挂入模型 schema，名称与 source 不再变化；
/// 验证器与默认值仅在构造期由调用方配置。
#[derive(Clone)]
pub struct Field {
    /// 字段类型
    pub kind: FieldKind,
    /// 外部名称（默认与属性名相同）
    pub source: Option<String>,
    /// 调用方附加的验证器（在内置验证器之后按声明顺序执行）
    pub validators: Vec<Validator>,
    /// 是否允许空值
    pub nullable: bool,
    /// 是否只读（只读字段不出现在外部表示中）
    pub readonly: bool,
    default: Option<DefaultFactory>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("nullable", &self.nullable)
            .field("readonly", &self.readonly)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl Field {
    /// 创建新的字段定义
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            source: None,
            validators: Vec::new(),
            nullable: false,
            readonly: false,
            default: None,
        }
    }

    /// 设置外部名称（wire 侧与内部属性名不同时使用）
    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// 设置为可空字段
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// 设置为只读字段
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// 附加一个验证器
    pub fn validator(mut self, v: Validator) -> Self {
        self.validators.push(v);
        self
    }

    /// 附加一组验证器
    pub fn validators(mut self, vs: Vec<Validator>) -> Self {
        self.validators.extend(vs);
        self
    }

    /// 设置默认值（存储值本身，每次取默认时深拷贝）
    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        self.default = Some(Arc::new(move || value.clone()));
        self
    }

    /// 设置默认值工厂（每次取默认时调用，适合"当前时间"这类动态默认）
    pub fn default_factory<F>(mut self, f: F) -> Self
    where
        F: Fn() -> FieldValue + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(f));
        self
    }

    /// 将本字段包装为列表字段的元素（对应声明侧的 many 选项）
    pub fn many(self) -> Self {
        Field::new(FieldKind::List {
            child: Box::new(self),
        })
    }

    /// 计算字段默认值
    ///
    /// 默认值是按需计算的：嵌套模型返回全新实例，时间字段返回当前时间，
    /// 保证不同模型实例之间不会共享同一个可变默认对象。
    pub fn default_value_of(&self) -> FieldValue {
        if let Some(factory) = &self.default {
            return factory();
        }
        match &self.kind {
            FieldKind::String => FieldValue::String(String::new()),
            FieldKind::Integer => FieldValue::Int(0),
            FieldKind::Float => FieldValue::Float(0.0),
            FieldKind::Boolean => FieldValue::Bool(false),
            FieldKind::Timestamp { .. }
            | FieldKind::DateTime { .. }
            | FieldKind::Date { .. } => FieldValue::DateTime(Utc::now()),
            FieldKind::Decimal => FieldValue::Decimal(Decimal::ZERO),
            FieldKind::Json => FieldValue::Null,
            FieldKind::List { .. } => FieldValue::Array(Vec::new()),
            FieldKind::Model { target } => match target {
                ModelType::Model(schema) => FieldValue::Model(Box::new(schema.create_default())),
                ModelType::Set(ty) => FieldValue::Set(Box::new(ModelSet::empty(ty.clone()))),
            },
        }
    }

    /// 将外部数据转换为内部表示
    ///
    /// 纯转换，无副作用。可解析失败的值按通用转换原样保留，由后续验证判定；
    /// 结构性非法输入（如向模型集合传入非数组）立即返回转换错误。
    pub fn to_internal_value(&self, data: &JsonValue) -> QuickModelResult<FieldValue> {
        if data.is_null() {
            return Ok(FieldValue::Null);
        }
        match &self.kind {
            FieldKind::Timestamp { .. } | FieldKind::DateTime { .. } | FieldKind::Date { .. } => {
                Ok(self.parse_temporal(data))
            }
            FieldKind::Decimal => Ok(parse_decimal(data)),
            FieldKind::List { child } => match data {
                JsonValue::Array(arr) => {
                    let mut items = Vec::with_capacity(arr.len());
                    for item in arr {
                        items.push(child.to_internal_value(item)?);
                    }
                    Ok(FieldValue::Array(items))
                }
                // 非数组按通用转换保留，由列表验证器报错
                other => Ok(FieldValue::from_json(other)),
            },
            FieldKind::Model { target } => match target {
                ModelType::Model(schema) => {
                    Ok(FieldValue::Model(Box::new(schema.create(Some(data))?)))
                }
                ModelType::Set(ty) => Ok(FieldValue::Set(Box::new(ty.create(Some(data))?))),
            },
            _ => Ok(FieldValue::from_json(data)),
        }
    }

    /// 将内部表示转换为外部数据
    ///
    /// 空值直接短路为 JSON null。
    pub fn to_representation(&self, value: &FieldValue) -> JsonValue {
        if value.is_null() {
            return JsonValue::Null;
        }
        match (&self.kind, value) {
            (FieldKind::Timestamp { time_zone }, FieldValue::DateTime(dt)) => {
                let zone = resolve_zone(time_zone);
                JsonValue::Number(serde_json::Number::from(zoned_epoch_millis(dt, &zone)))
            }
            (FieldKind::DateTime { format, time_zone }, FieldValue::DateTime(dt))
            | (FieldKind::Date { format, time_zone }, FieldValue::DateTime(dt)) => {
                let zone = resolve_zone(time_zone);
                JsonValue::String(format_in_zone(dt, &zone, format))
            }
            (FieldKind::Decimal, FieldValue::Decimal(d)) => JsonValue::String(d.to_string()),
            (FieldKind::List { child }, FieldValue::Array(items)) => {
                JsonValue::Array(items.iter().map(|v| child.to_representation(v)).collect())
            }
            (FieldKind::Model { .. }, FieldValue::Model(inst)) => inst.to_representation(),
            (FieldKind::Model { .. }, FieldValue::Set(set)) => set.to_representation(),
            _ => value.to_json(),
        }
    }

    /// 运行字段验证器
    ///
    /// 空值处理先于一切验证：空值 + 可空 → 合法；空值 + 不可空 → "必填"错误。
    /// 随后依次运行该字段类型的内置验证器与调用方验证器，遇到第一个失败即返回。
    /// 列表字段例外：逐元素验证并按索引收集所有失败项。
    pub fn run_validators(&self, value: &FieldValue) -> Option<ValidateError> {
        if value.is_null() {
            if self.nullable {
                return None;
            }
            return Some(ValidateError::message("必填字段不能为空"));
        }

        if let FieldKind::List { child } = &self.kind {
            return self.run_list_validators(child, value);
        }

        if let Some(error) = self.run_builtin_validators(value) {
            return Some(error);
        }
        for v in &self.validators {
            if let Some(error) = v(value) {
                return Some(error);
            }
        }
        None
    }

    /// 列表字段验证：先检查数组形状，再逐元素委托 child 并按索引收集失败项
    fn run_list_validators(&self, child: &Field, value: &FieldValue) -> Option<ValidateError> {
        let items = match value {
            FieldValue::Array(items) => items,
            other => {
                return Some(ValidateError::message(format!(
                    "必须是数组类型，实际收到: {}",
                    other.type_name()
                )));
            }
        };
        let mut errors = std::collections::BTreeMap::new();
        for (index, item) in items.iter().enumerate() {
            if let Some(error) = child.run_validators(item) {
                errors.insert(index, error);
            }
        }
        if !errors.is_empty() {
            return Some(ValidateError::Items(errors));
        }
        for v in &self.validators {
            if let Some(error) = v(value) {
                return Some(error);
            }
        }
        None
    }

    /// 各字段类型自带的完整内置验证器集合（仅做运行时类型检查）
    fn run_builtin_validators(&self, value: &FieldValue) -> Option<ValidateError> {
        match &self.kind {
            FieldKind::String => match value {
                FieldValue::String(_) => None,
                other => Some(type_mismatch("字符串", other)),
            },
            FieldKind::Integer => match value {
                FieldValue::Int(_) => None,
                // 浮点输入要求必须是整数值
                FieldValue::Float(f) if f.fract() == 0.0 => None,
                other => Some(type_mismatch("整数", other)),
            },
            FieldKind::Float => match value {
                FieldValue::Float(_) | FieldValue::Int(_) => None,
                other => Some(type_mismatch("浮点数", other)),
            },
            FieldKind::Boolean => match value {
                FieldValue::Bool(_) => None,
                other => Some(type_mismatch("布尔", other)),
            },
            FieldKind::Timestamp { .. } | FieldKind::DateTime { .. } | FieldKind::Date { .. } => {
                match value {
                    FieldValue::DateTime(_) => None,
                    other => Some(type_mismatch("日期时间", other)),
                }
            }
            FieldKind::Decimal => match value {
                FieldValue::Decimal(_) => None,
                other => Some(type_mismatch("十进制数", other)),
            },
            FieldKind::Json => None,
            FieldKind::List { .. } => None,
            FieldKind::Model { .. } => match value {
                // 嵌套实例需通过自身的验证
                FieldValue::Model(inst) => inst.run_validators().map(ValidateError::Fields),
                FieldValue::Set(set) => set.run_validators().map(ValidateError::Items),
                other => Some(ValidateError::message(format!(
                    "必须是模型实例，实际收到: {}",
                    other.type_name()
                ))),
            },
        }
    }

    /// 解析时间类输入：毫秒时间戳、RFC3339、或按字段时区解释的 naive 字符串
    fn parse_temporal(&self, data: &JsonValue) -> FieldValue {
        let zone = match &self.kind {
            FieldKind::Timestamp { time_zone }
            | FieldKind::DateTime { time_zone, .. }
            | FieldKind::Date { time_zone, .. } => resolve_zone(time_zone),
            _ => ZoneOffset::local(),
        };
        match data {
            JsonValue::Number(n) => {
                if let Some(millis) = n.as_i64() {
                    if let Some(dt) = Utc.timestamp_millis_opt(millis).single() {
                        return FieldValue::DateTime(dt);
                    }
                }
                FieldValue::from_json(data)
            }
            JsonValue::String(s) => parse_temporal_string(s, &zone)
                .map(FieldValue::DateTime)
                .unwrap_or_else(|| FieldValue::String(s.clone())),
            other => FieldValue::from_json(other),
        }
    }
}

/// 解析时区配置：None 表示解析环境的本地时区
fn resolve_zone(time_zone: &Option<ZoneOffset>) -> ZoneOffset {
    time_zone.clone().unwrap_or_else(ZoneOffset::local)
}

fn type_mismatch(expected: &str, actual: &FieldValue) -> ValidateError {
    ValidateError::message(format!(
        "必须是{}类型，实际收到: {}",
        expected,
        actual.type_name()
    ))
}

/// 按多种常见格式解析时间字符串
fn parse_temporal_string(s: &str, zone: &ZoneOffset) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive_in_zone_to_utc(naive, zone));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(naive_in_zone_to_utc(naive, zone));
    }
    None
}

/// 解析十进制输入：整数、浮点数或字符串
fn parse_decimal(data: &JsonValue) -> FieldValue {
    match data {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                return FieldValue::Decimal(Decimal::from(i));
            }
            if let Some(f) = n.as_f64() {
                if let Some(d) = Decimal::from_f64_retain(f) {
                    return FieldValue::Decimal(d);
                }
            }
            FieldValue::from_json(data)
        }
        JsonValue::String(s) => match s.parse::<Decimal>() {
            Ok(d) => FieldValue::Decimal(d),
            Err(_) => FieldValue::String(s.clone()),
        },
        other => FieldValue::from_json(other),
    }
}
