//! 模型快照能力契约
//!
//! 分支管理器只依赖这个契约：能导出外部表示、能从外部数据重置、
//! 能从外部数据重建一份独立副本。模型实例与模型集合都满足它。

use serde_json::Value as JsonValue;

use crate::error::QuickModelResult;

/// 可快照对象
pub trait Snapshot: Sized {
    /// 导出当前状态的外部表示
    fn to_representation(&self) -> JsonValue;

    /// 用外部数据重置当前状态
    fn reset_from_data(&mut self, data: &JsonValue) -> QuickModelResult<()>;

    /// 从外部数据重建一份同类型的独立副本
    fn recreate_from(&self, data: &JsonValue) -> QuickModelResult<Self>;
}
