//! 模型定义宏
//!
//! 提供声明式的 schema 定义语法，展开为构建器调用链。

/// 声明式定义模型 schema
///
/// # 示例
///
/// ```rust
/// use rat_quickmodel::model_schema;
/// use rat_quickmodel::model::{string_field, integer_field};
/// use rat_quickmodel::validators::max_length;
///
/// let user = model_schema! {
///     User {
///         id: integer_field(),
///         username: string_field().validator(max_length(30)),
///     }
/// };
/// assert_eq!(user.name(), "User");
/// ```
#[macro_export]
macro_rules! model_schema {
    ($name:ident { $($field:ident : $def:expr),* $(,)? }) => {{
        let builder = $crate::model::ModelSchema::builder(stringify!($name));
        $(
            let builder = builder.field(stringify!($field), $def);
        )*
        builder.build()
    }};
}
