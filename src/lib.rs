//! rat_quickmodel - 声明式数据建模库
//!
//! 提供类型化字段定义、模型 schema 与实例引擎、模型集合，
//! 以及基于快照的分支状态管理（重置/备份/恢复/合并/提交）

// 导出所有公共模块
pub mod branch;
pub mod error;
pub mod model;
pub mod types;
pub mod utils;
pub mod validators;

// 重新导出常用类型和函数
pub use error::{QuickModelError, QuickModelResult};
pub use types::FieldValue;
pub use model::{
    Field, FieldKind, ModelInstance, ModelSchema, ModelSchemaBuilder, ModelSet, ModelSetType,
    ModelType, Snapshot, register_field,
    string_field, integer_field, float_field, boolean_field,
    timestamp_field, timestamp_with_tz_field,
    datetime_field, datetime_with_tz_field, datetime_field_with_format,
    date_field, decimal_field, json_field, list_field, model_field, model_set_field,
};
pub use branch::ModelBranch;
pub use utils::timezone::ZoneOffset;
pub use validators::{
    ValidateError, Validator, validator,
    max_length, min_length, max_value, min_value, matches_pattern,
};
