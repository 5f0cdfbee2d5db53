//! 模型分支管理模块
//!
//! 分支是对某个可快照对象（模型实例或模型集合）的状态管理器：
//! 构造时记录默认快照，支持重置、备份/恢复、复制、派生子分支，
//! 以及沿 master 链向上提交。分支为单线程使用场景设计，
//! 以 `Rc<ModelBranch<T>>` 共享，内部状态用 `RefCell` 管理。

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use serde_json::Value as JsonValue;

use crate::error::QuickModelResult;
use crate::model::traits::Snapshot;
use crate::model_error;

/// 模型分支
///
/// master 链在构造时确定且只会指向已存在的分支，因此链必然无环。
pub struct ModelBranch<T: Snapshot> {
    model: RefCell<T>,
    default_data: JsonValue,
    backup_data: RefCell<Option<JsonValue>>,
    master: Option<Rc<ModelBranch<T>>>,
}

impl<T: Snapshot> ModelBranch<T> {
    /// 创建新分支，记录模型当前状态作为默认快照
    pub fn new(model: T) -> Rc<Self> {
        let default_data = model.to_representation();
        Rc::new(Self {
            model: RefCell::new(model),
            default_data,
            backup_data: RefCell::new(None),
            master: None,
        })
    }

    /// 借用分支持有的模型
    pub fn model(&self) -> Ref<'_, T> {
        self.model.borrow()
    }

    /// 可变借用分支持有的模型
    pub fn model_mut(&self) -> RefMut<'_, T> {
        self.model.borrow_mut()
    }

    /// 构造时记录的默认快照
    pub fn default_data(&self) -> &JsonValue {
        &self.default_data
    }

    /// 上级分支
    pub fn master(&self) -> Option<&Rc<ModelBranch<T>>> {
        self.master.as_ref()
    }

    /// 模型当前状态的外部表示
    pub fn to_representation(&self) -> JsonValue {
        self.model.borrow().to_representation()
    }

    /// 将模型重置回默认快照
    pub fn reset(&self) -> QuickModelResult<()> {
        self.model.borrow_mut().reset_from_data(&self.default_data)
    }

    /// 备份模型当前状态（覆盖上一次备份）
    pub fn backup(&self) {
        *self.backup_data.borrow_mut() = Some(self.model.borrow().to_representation());
    }

    /// 将模型恢复到备份状态
    ///
    /// 从未备份过时恢复属于调用方误用，返回分支错误。
    pub fn restore(&self) -> QuickModelResult<()> {
        let backup = self
            .backup_data
            .borrow()
            .clone()
            .ok_or_else(|| model_error!(branch, "没有可恢复的备份"))?;
        self.model.borrow_mut().reset_from_data(&backup)
    }

    /// 复制分支
    ///
    /// 新分支持有从当前状态重建的独立模型，继承默认快照与 master，
    /// 但不继承备份。
    pub fn copy(&self) -> QuickModelResult<Rc<Self>> {
        let repr = self.model.borrow().to_representation();
        let model = self.model.borrow().recreate_from(&repr)?;
        Ok(Rc::new(Self {
            model: RefCell::new(model),
            default_data: self.default_data.clone(),
            backup_data: RefCell::new(None),
            master: self.master.clone(),
        }))
    }

    /// 派生子分支
    ///
    /// 子分支持有从当前状态重建的独立模型，默认快照为派生时刻的状态，
    /// master 指向本分支。
    pub fn sub_branch(self: &Rc<Self>) -> QuickModelResult<Rc<Self>> {
        let repr = self.model.borrow().to_representation();
        let model = self.model.borrow().recreate_from(&repr)?;
        Ok(Rc::new(Self {
            model: RefCell::new(model),
            default_data: repr,
            backup_data: RefCell::new(None),
            master: Some(self.clone()),
        }))
    }

    /// 合并另一个分支的状态到本分支
    ///
    /// commit_to_top_level 为 true 时继续沿 master 链向上提交。
    pub fn merge(&self, other: &ModelBranch<T>, commit_to_top_level: bool) -> QuickModelResult<()> {
        let repr = other.model.borrow().to_representation();
        self.model.borrow_mut().reset_from_data(&repr)?;
        if commit_to_top_level {
            self.commit(true)?;
        }
        Ok(())
    }

    /// 将本分支的状态提交给 master 分支（无 master 时为空操作）
    pub fn commit(&self, commit_to_top_level: bool) -> QuickModelResult<()> {
        if let Some(master) = &self.master {
            master.merge(self, commit_to_top_level)?;
        }
        Ok(())
    }
}
