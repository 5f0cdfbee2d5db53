//! 核心类型模块

pub mod field_value;

pub use field_value::FieldValue;
