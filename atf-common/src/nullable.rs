//! 空值容错的反序列化
//!
//! `#[serde(default)]` 只处理缺失的字段。手写的配置中常见 `args:` 留空
//! (YAML) 或 `"args": null` (JSON)，这些字段同样按默认值处理。

use serde::{Deserialize, Deserializer};

/// null 按默认值处理，配合 `#[serde(default, deserialize_with = "...")]` 使用
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
