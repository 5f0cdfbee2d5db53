//! 模型便捷函数模块
//!
//! 提供创建各种字段类型的便捷函数

use crate::error::QuickModelResult;
use crate::model::field::{
    Field, FieldKind, ModelType, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT,
};
use crate::model::model_set::ModelSetType;
use crate::model::schema::ModelSchema;
use crate::utils::timezone::ZoneOffset;

/// 便捷函数：创建字符串字段
pub fn string_field() -> Field {
    Field::new(FieldKind::String)
}

/// 便捷函数：创建整数字段
pub fn integer_field() -> Field {
    Field::new(FieldKind::Integer)
}

/// 便捷函数：创建浮点数字段
pub fn float_field() -> Field {
    Field::new(FieldKind::Float)
}

/// 便捷函数：创建布尔字段
pub fn boolean_field() -> Field {
    Field::new(FieldKind::Boolean)
}

/// 便捷函数：创建时间戳字段（外部表示为按时区调整的毫秒数，默认本地时区）
pub fn timestamp_field() -> Field {
    Field::new(FieldKind::Timestamp { time_zone: None })
}

/// 便捷函数：创建带时区的时间戳字段
///
/// 时区偏移格式："+00:00", "+08:00", "-05:00"；
/// 偏移在构造期校验，非法偏移立即返回配置错误。
pub fn timestamp_with_tz_field(timezone_offset: &str) -> QuickModelResult<Field> {
    Ok(Field::new(FieldKind::Timestamp {
        time_zone: Some(ZoneOffset::parse(timezone_offset)?),
    }))
}

/// 便捷函数：创建日期时间字段（外部表示为 "yyyy-MM-dd HH:mm:ss" 格式字符串）
pub fn datetime_field() -> Field {
    Field::new(FieldKind::DateTime {
        format: DEFAULT_DATETIME_FORMAT.to_string(),
        time_zone: None,
    })
}

/// 便捷函数：创建带时区的日期时间字段（偏移在构造期校验）
pub fn datetime_with_tz_field(timezone_offset: &str) -> QuickModelResult<Field> {
    Ok(Field::new(FieldKind::DateTime {
        format: DEFAULT_DATETIME_FORMAT.to_string(),
        time_zone: Some(ZoneOffset::parse(timezone_offset)?),
    }))
}

/// 便捷函数：创建自定义格式的日期时间字段（偏移在构造期校验）
pub fn datetime_field_with_format(
    format: &str,
    timezone_offset: Option<&str>,
) -> QuickModelResult<Field> {
    let time_zone = timezone_offset.map(ZoneOffset::parse).transpose()?;
    Ok(Field::new(FieldKind::DateTime {
        format: format.to_string(),
        time_zone,
    }))
}

/// 便捷函数：创建日期字段（外部表示为 "yyyy-MM-dd" 格式字符串）
pub fn date_field() -> Field {
    Field::new(FieldKind::Date {
        format: DEFAULT_DATE_FORMAT.to_string(),
        time_zone: None,
    })
}

/// 便捷函数：创建十进制字段
pub fn decimal_field() -> Field {
    Field::new(FieldKind::Decimal)
}

/// 便捷函数：创建 JSON 透传字段
pub fn json_field() -> Field {
    Field::new(FieldKind::Json)
}

/// 便捷函数：创建列表字段（元素的转换与验证由 child 字段描述）
pub fn list_field(child: Field) -> Field {
    Field::new(FieldKind::List {
        child: Box::new(child),
    })
}

/// 便捷函数：创建嵌套模型字段
///
/// 嵌套模型的类型必须显式给出，转换/验证/默认值全部委托给目标类型自身的引擎。
pub fn model_field(schema: &ModelSchema) -> Field {
    Field::new(FieldKind::Model {
        target: ModelType::Model(schema.clone()),
    })
}

/// 便捷函数：创建嵌套模型集合字段
pub fn model_set_field(set_type: &ModelSetType) -> Field {
    Field::new(FieldKind::Model {
        target: ModelType::Set(set_type.clone()),
    })
}
