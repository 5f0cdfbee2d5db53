//! 模型定义与引擎模块
//!
//! 提供声明式的字段定义、模型 schema、模型实例与模型集合，
//! 以及外部表示（JSON）与内部表示之间的双向转换和验证引擎。

pub mod convenience;
pub mod field;
pub mod instance;
pub mod macros;
pub mod model_set;
pub mod schema;
pub mod traits;

pub use convenience::*;
pub use field::{Field, FieldKind, ModelType, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT};
pub use instance::ModelInstance;
pub use model_set::{ModelSet, ModelSetType};
pub use schema::{register_field, ModelSchema, ModelSchemaBuilder};
pub use traits::Snapshot;
