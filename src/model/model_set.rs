//! 模型集合模块
//!
//! 集合类型（ModelSetType）描述"某个模型的同构序列"，集合实例（ModelSet）
//! 持有实例列表。集合类型可先声明后绑定模型，以支持相互引用的模型图；
//! 未绑定就使用的集合类型属于配置错误，立即报错。

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value as JsonValue;

use crate::error::QuickModelResult;
use crate::model::instance::ModelInstance;
use crate::model::schema::ModelSchema;
use crate::model::traits::Snapshot;
use crate::model_error;
use crate::validators::ValidateError;

struct SetTypeInner {
    name: String,
    model: OnceCell<ModelSchema>,
}

/// 模型集合类型
///
/// 与 schema 一样按引用共享；绑定是一次性的，绑定后不可更换模型。
#[derive(Clone)]
pub struct ModelSetType {
    inner: Arc<SetTypeInner>,
}

impl std::fmt::Debug for ModelSetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSetType")
            .field("name", &self.inner.name)
            .field("model", &self.inner.model.get().map(|m| m.name().to_string()))
            .finish()
    }
}

impl ModelSetType {
    /// 声明一个尚未绑定模型的集合类型
    pub fn unbound(name: &str) -> Self {
        Self {
            inner: Arc::new(SetTypeInner {
                name: name.to_string(),
                model: OnceCell::new(),
            }),
        }
    }

    /// 声明并立即绑定模型的集合类型
    pub fn bound(name: &str, model: &ModelSchema) -> Self {
        let ty = Self::unbound(name);
        // 新建的 OnceCell 必然为空
        let _ = ty.inner.model.set(model.clone());
        ty
    }

    /// 绑定模型（只允许一次）
    pub fn bind(&self, model: &ModelSchema) -> QuickModelResult<()> {
        self.inner.model.set(model.clone()).map_err(|_| {
            model_error!(
                config,
                format!("模型集合 '{}' 已绑定模型，不能重复绑定", self.inner.name)
            )
        })
    }

    /// 集合类型名称
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 已绑定的模型 schema
    pub fn model(&self) -> QuickModelResult<&ModelSchema> {
        self.inner.model.get().ok_or_else(|| {
            model_error!(
                config,
                format!("模型集合 '{}' 必须先绑定模型才能使用", self.inner.name)
            )
        })
    }

    /// 创建集合实例
    ///
    /// data 必须是 JSON 数组（或 None 表示空集合），每个元素交给
    /// 绑定模型的 create 构造实例；任一元素转换失败则整体失败。
    pub fn create(&self, data: Option<&JsonValue>) -> QuickModelResult<ModelSet> {
        let model = self.model()?;
        let mut list = Vec::new();
        if let Some(data) = data {
            let arr = data.as_array().ok_or_else(|| {
                model_error!(
                    conversion,
                    self.inner.name,
                    format!("期望数组类型数据，实际收到: {}", json_type_name(data))
                )
            })?;
            list.reserve(arr.len());
            for item in arr {
                list.push(model.create(Some(item))?);
            }
        }
        Ok(ModelSet {
            ty: self.clone(),
            list,
            errors: None,
        })
    }
}

impl PartialEq for ModelSetType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// 模型集合实例
///
/// 序列操作（filter/map/find 等）返回的新集合与原集合同类型，
/// 且不会修改原集合。
#[derive(Clone)]
pub struct ModelSet {
    ty: ModelSetType,
    list: Vec<ModelInstance>,
    /// 最近一次验证的错误映射（索引 -> 错误，仅失败元素有条目）
    pub errors: Option<BTreeMap<usize, ValidateError>>,
}

impl ModelSet {
    /// 创建空集合
    pub fn empty(ty: ModelSetType) -> Self {
        Self {
            ty,
            list: Vec::new(),
            errors: None,
        }
    }

    /// 集合所属类型
    pub fn set_type(&self) -> &ModelSetType {
        &self.ty
    }

    /// 元素数量
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// 是否为空集合
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// 按索引读取元素
    pub fn get(&self, index: usize) -> Option<&ModelInstance> {
        self.list.get(index)
    }

    /// 按索引读取可变元素
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ModelInstance> {
        self.list.get_mut(index)
    }

    /// 按索引替换元素，返回写入是否生效（索引越界时不写入）
    pub fn set(&mut self, index: usize, instance: ModelInstance) -> bool {
        match self.list.get_mut(index) {
            Some(slot) => {
                *slot = instance;
                true
            }
            None => false,
        }
    }

    /// 追加元素
    pub fn push(&mut self, instance: ModelInstance) {
        self.list.push(instance);
    }

    /// 元素迭代器
    pub fn iter(&self) -> std::slice::Iter<'_, ModelInstance> {
        self.list.iter()
    }

    /// 逐元素执行
    pub fn for_each(&self, mut f: impl FnMut(&ModelInstance)) {
        for inst in &self.list {
            f(inst);
        }
    }

    /// 筛选出满足条件的元素，组成同类型的新集合
    pub fn filter(&self, mut f: impl FnMut(&ModelInstance) -> bool) -> ModelSet {
        ModelSet {
            ty: self.ty.clone(),
            list: self.list.iter().filter(|inst| f(inst)).cloned().collect(),
            errors: None,
        }
    }

    /// 逐元素变换，组成同类型的新集合
    pub fn map(&self, mut f: impl FnMut(&ModelInstance) -> ModelInstance) -> ModelSet {
        ModelSet {
            ty: self.ty.clone(),
            list: self.list.iter().map(|inst| f(inst)).collect(),
            errors: None,
        }
    }

    /// 查找第一个满足条件的元素
    pub fn find(&self, mut f: impl FnMut(&ModelInstance) -> bool) -> Option<&ModelInstance> {
        self.list.iter().find(|inst| f(inst))
    }

    /// 是否存在满足条件的元素
    pub fn some(&self, mut f: impl FnMut(&ModelInstance) -> bool) -> bool {
        self.list.iter().any(|inst| f(inst))
    }

    /// 是否全部元素满足条件
    pub fn every(&self, mut f: impl FnMut(&ModelInstance) -> bool) -> bool {
        self.list.iter().all(|inst| f(inst))
    }

    /// 转换为外部表示（JSON 数组）
    pub fn to_representation(&self) -> JsonValue {
        JsonValue::Array(self.list.iter().map(|inst| inst.to_representation()).collect())
    }

    /// 逐元素运行验证器，按索引收集失败项（稀疏映射）
    pub fn run_validators(&self) -> Option<BTreeMap<usize, ValidateError>> {
        let mut errors = BTreeMap::new();
        for (index, inst) in self.list.iter().enumerate() {
            if let Some(field_errors) = inst.run_validators() {
                errors.insert(index, ValidateError::Fields(field_errors));
            }
        }
        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }

    /// 验证整个集合，错误结构整体替换到 `errors` 上
    pub fn validate(&mut self) -> bool {
        self.errors = self.run_validators();
        self.errors.is_none()
    }

    /// 用外部数据整体重建集合内容
    ///
    /// 与实例的就地覆盖不同，集合重置是整体替换：旧元素全部丢弃。
    pub fn reset_from_data(&mut self, data: &JsonValue) -> QuickModelResult<()> {
        let rebuilt = self.ty.create(Some(data))?;
        self.list = rebuilt.list;
        Ok(())
    }
}

impl PartialEq for ModelSet {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.list == other.list
    }
}

impl std::fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSet")
            .field("type", &self.ty.name())
            .field("len", &self.list.len())
            .finish()
    }
}

impl Snapshot for ModelSet {
    fn to_representation(&self) -> JsonValue {
        ModelSet::to_representation(self)
    }

    fn reset_from_data(&mut self, data: &JsonValue) -> QuickModelResult<()> {
        ModelSet::reset_from_data(self, data)
    }

    fn recreate_from(&self, data: &JsonValue) -> QuickModelResult<Self> {
        self.ty.create(Some(data))
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
