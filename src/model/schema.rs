//! 模型 schema 与注册模块
//!
//! schema 是属性名到字段定义的不可变映射，按模型类型共享（Arc），
//! 支持 exclude/include 派生新形状而不修改原 schema。
//! 模型引擎的四个操作（create/toInternalValue/toRepresentation/runValidators）
//! 都在 schema 上按字段递归展开。

use std::collections::BTreeMap;
use std::sync::Arc;

use rat_logger::debug;
use serde_json::Value as JsonValue;

use crate::error::QuickModelResult;
use crate::model::field::Field;
use crate::model::instance::ModelInstance;
use crate::model::model_set::ModelSetType;
use crate::model_error;
use crate::types::FieldValue;
use crate::validators::ValidateError;

struct SchemaInner {
    name: String,
    fields: BTreeMap<String, Field>,
}

/// 模型 schema
///
/// 持有方式为共享只读：所有同类型实例引用同一份字段映射。
#[derive(Clone)]
pub struct ModelSchema {
    inner: Arc<SchemaInner>,
}

impl std::fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSchema")
            .field("name", &self.inner.name)
            .field("fields", &self.inner.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// schema 构建器
///
/// 替代声明期的装饰器注册：通过显式传入字段映射构建不可变 schema。
pub struct ModelSchemaBuilder {
    name: String,
    fields: BTreeMap<String, Field>,
}

impl ModelSchemaBuilder {
    /// 注册一个字段（同名重复注册为静默空操作，先注册者生效）
    pub fn field(mut self, name: &str, field: Field) -> Self {
        register_field(&mut self, name, field);
        self
    }

    /// 完成构建，产出不可变 schema
    pub fn build(self) -> ModelSchema {
        ModelSchema {
            inner: Arc::new(SchemaInner {
                name: self.name,
                fields: self.fields,
            }),
        }
    }
}

/// 字段注册接口
///
/// 按 (schema, 属性名) 幂等：同名重复注册是空操作，先注册者生效，
/// 以保证菱形继承式的 schema 组合行为可预测。
pub fn register_field(builder: &mut ModelSchemaBuilder, name: &str, field: Field) {
    if builder.fields.contains_key(name) {
        debug!("字段 '{}' 已在模型 '{}' 中注册，忽略重复注册", name, builder.name);
        return;
    }
    builder.fields.insert(name.to_string(), field);
}

impl ModelSchema {
    /// 创建 schema 构建器
    pub fn builder(name: &str) -> ModelSchemaBuilder {
        ModelSchemaBuilder {
            name: name.to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// 模型名称
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 字段映射
    pub fn fields(&self) -> &BTreeMap<String, Field> {
        &self.inner.fields
    }

    /// 判断两个 schema 是否为同一份定义
    pub fn same_as(&self, other: &ModelSchema) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// 派生新 schema：去除指定字段（原 schema 不受影响）
    pub fn exclude(&self, names: &[&str]) -> ModelSchema {
        let fields = self
            .inner
            .fields
            .iter()
            .filter(|(k, _)| !names.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ModelSchema {
            inner: Arc::new(SchemaInner {
                name: self.inner.name.clone(),
                fields,
            }),
        }
    }

    /// 派生新 schema：追加字段（同名追加覆盖原定义，原 schema 不受影响）
    pub fn include<I>(&self, fields: I) -> ModelSchema
    where
        I: IntoIterator<Item = (String, Field)>,
    {
        let mut merged = self.inner.fields.clone();
        for (name, field) in fields {
            merged.insert(name, field);
        }
        ModelSchema {
            inner: Arc::new(SchemaInner {
                name: self.inner.name.clone(),
                fields: merged,
            }),
        }
    }

    /// 派生绑定到本模型的集合类型
    pub fn set_type(&self) -> ModelSetType {
        ModelSetType::bound(&format!("{}Set", self.inner.name), self)
    }

    /// 创建模型实例
    ///
    /// 先为每个字段填充全新的默认值，再用 `to_internal_value(data)` 覆盖；
    /// 先播种后覆盖，保证部分数据也能构造出完整实例。
    pub fn create(&self, data: Option<&JsonValue>) -> QuickModelResult<ModelInstance> {
        let mut attrs = BTreeMap::new();
        for (name, field) in &self.inner.fields {
            attrs.insert(name.clone(), field.default_value_of());
        }
        if let Some(data) = data {
            for (name, value) in self.to_internal_value(data)? {
                attrs.insert(name, value);
            }
        }
        Ok(ModelInstance::from_parts(self.clone(), attrs))
    }

    /// 创建全默认值的模型实例（不可能失败的 create() 特化）
    pub fn create_default(&self) -> ModelInstance {
        let mut attrs = BTreeMap::new();
        for (name, field) in &self.inner.fields {
            attrs.insert(name.clone(), field.default_value_of());
        }
        ModelInstance::from_parts(self.clone(), attrs)
    }

    /// 将外部数据转换为内部属性映射
    ///
    /// 按字段查找 `source ?? name`：键存在则转换，键缺失则整体跳过——
    /// "缺失"与"显式 null"在此层严格区分，默认值只在 create 中填充。
    pub fn to_internal_value(
        &self,
        data: &JsonValue,
    ) -> QuickModelResult<BTreeMap<String, FieldValue>> {
        let obj = data.as_object().ok_or_else(|| {
            model_error!(
                conversion,
                self.inner.name,
                format!("期望对象类型数据，实际收到: {}", json_type_name(data))
            )
        })?;
        let mut attrs = BTreeMap::new();
        for (name, field) in &self.inner.fields {
            let key = field.source.as_deref().unwrap_or(name);
            if let Some(value) = obj.get(key) {
                attrs.insert(name.clone(), field.to_internal_value(value)?);
            }
        }
        Ok(attrs)
    }

    /// 将内部属性映射转换为外部数据
    ///
    /// 只读字段不输出；输出键为 `source ?? name`。
    pub fn to_representation(&self, attrs: &BTreeMap<String, FieldValue>) -> JsonValue {
        let mut obj = serde_json::Map::new();
        for (name, field) in &self.inner.fields {
            if field.readonly {
                continue;
            }
            let value = attrs.get(name).unwrap_or(&FieldValue::Null);
            let key = field.source.clone().unwrap_or_else(|| name.clone());
            obj.insert(key, field.to_representation(value));
        }
        JsonValue::Object(obj)
    }

    /// 运行全部字段的验证器
    ///
    /// 与单字段的短路不同，模型级收集所有失败字段；无错误时返回 None。
    pub fn run_validators(
        &self,
        attrs: &BTreeMap<String, FieldValue>,
    ) -> Option<BTreeMap<String, ValidateError>> {
        let mut errors = BTreeMap::new();
        for (name, field) in &self.inner.fields {
            let value = attrs.get(name).unwrap_or(&FieldValue::Null);
            if let Some(error) = field.run_validators(value) {
                debug!("模型 '{}' 字段 '{}' 验证失败: {}", self.inner.name, name, error);
                errors.insert(name.clone(), error);
            }
        }
        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
