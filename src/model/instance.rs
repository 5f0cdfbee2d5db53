//! 模型实例模块
//!
//! 实例是属性袋：键为 schema 的字段名，值为内部表示。
//! `errors` 是瞬态的验证结果，每次 validate/run_validators 整体替换，从不部分合并。

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::error::QuickModelResult;
use crate::model::schema::ModelSchema;
use crate::model::traits::Snapshot;
use crate::types::FieldValue;
use crate::validators::ValidateError;

/// 模型实例
#[derive(Clone)]
pub struct ModelInstance {
    schema: ModelSchema,
    attrs: BTreeMap<String, FieldValue>,
    /// 最近一次验证的错误映射（字段名 -> 错误），验证通过时为 None
    pub errors: Option<BTreeMap<String, ValidateError>>,
}

impl ModelInstance {
    pub(crate) fn from_parts(schema: ModelSchema, attrs: BTreeMap<String, FieldValue>) -> Self {
        Self {
            schema,
            attrs,
            errors: None,
        }
    }

    /// 实例所属的 schema
    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    /// 读取属性值
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.attrs.get(name)
    }

    /// 写入属性值
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    /// 属性映射
    pub fn attrs(&self) -> &BTreeMap<String, FieldValue> {
        &self.attrs
    }

    /// 转换为外部表示
    pub fn to_representation(&self) -> JsonValue {
        self.schema.to_representation(&self.attrs)
    }

    /// 运行全部字段验证器，返回失败字段的错误映射
    pub fn run_validators(&self) -> Option<BTreeMap<String, ValidateError>> {
        self.schema.run_validators(&self.attrs)
    }

    /// 验证当前实例
    ///
    /// 错误结构整体替换到 `errors` 上供调用方检视；验证本身从不抛出。
    pub fn validate(&mut self) -> bool {
        self.errors = self.run_validators();
        self.errors.is_none()
    }

    /// 用外部数据就地覆盖属性
    ///
    /// 只覆盖 data 中出现的键，未出现的属性保持原值不变。
    pub fn reset_from_data(&mut self, data: &JsonValue) -> QuickModelResult<()> {
        for (name, value) in self.schema.to_internal_value(data)? {
            self.attrs.insert(name, value);
        }
        Ok(())
    }
}

impl PartialEq for ModelInstance {
    fn eq(&self, other: &Self) -> bool {
        self.schema.same_as(&other.schema) && self.attrs == other.attrs
    }
}

impl std::fmt::Debug for ModelInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelInstance")
            .field("schema", &self.schema.name())
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl Snapshot for ModelInstance {
    fn to_representation(&self) -> JsonValue {
        ModelInstance::to_representation(self)
    }

    fn reset_from_data(&mut self, data: &JsonValue) -> QuickModelResult<()> {
        ModelInstance::reset_from_data(self, data)
    }

    fn recreate_from(&self, data: &JsonValue) -> QuickModelResult<Self> {
        self.schema.create(Some(data))
    }
}
