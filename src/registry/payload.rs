// ==========================================
// BREEAM & LEED 认证看板 - 注册库响应解析
// ==========================================
// 职责: 容忍单对象/列表/多种包裹层级的 JSON 响应
// 红线: 纯函数,不做 I/O
// ==========================================

use crate::domain::record::RawRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// 非 JSON 响应体的包裹键
pub const RAW_TEXT_KEY: &str = "_raw_text";

/// 认证方案（含子方案,子方案名称为 "父 / 子"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemeOption {
    pub scheme_id: String,
    pub scheme_name: String,
}

/// null → []；对象 → [对象]；列表原样；其他 → []
pub fn listify(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        Some(obj @ Value::Object(_)) => vec![obj.clone()],
        _ => Vec::new(),
    }
}

/// 按路径取值（路径任一段缺失返回 None）
fn dig<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// 按候选路径顺序取第一个存在且非 null 的值
fn first_present<'a>(value: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| dig(value, path))
        .find(|v| !v.is_null())
}

/// 对象字段（按候选键顺序）转为文本
fn text_field(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
        .map(value_to_text)
}

/// JSON 值 → 单元格文本
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// /countries → 排序后的国家名列表
pub fn parse_countries(payload: &Value) -> Vec<String> {
    let countries = first_present(
        payload,
        &[&["results", "countries", "country"], &["countries"], &["country"]],
    );

    // 单个国家以字符串形式返回时同样接受
    let mut names: Vec<String> = match countries {
        Some(Value::String(single)) => vec![single.clone()],
        other => listify(other)
            .into_iter()
            .filter_map(|c| c.as_str().map(str::to_string))
            .collect(),
    };
    names.sort();
    names
}

/// /schemes → 扁平化方案列表（去重,保持顺序）
pub fn parse_schemes(payload: &Value) -> Vec<SchemeOption> {
    let base = first_present(
        payload,
        &[
            &["results", "schemes", "scheme"],
            &["results", "scheme"],
            &["schemes"],
            &["scheme"],
        ],
    );

    const ID_KEYS: [&str; 3] = ["schemeID", "id", "schemeId"];
    const NAME_KEYS: [&str; 3] = ["schemeName", "name", "scheme"];

    let mut items = Vec::new();
    for scheme in listify(base) {
        if !scheme.is_object() {
            continue;
        }
        let id = text_field(&scheme, &ID_KEYS);
        let name = text_field(&scheme, &NAME_KEYS);
        if let (Some(id), Some(name)) = (&id, &name) {
            items.push(SchemeOption {
                scheme_id: id.clone(),
                scheme_name: name.clone(),
            });
        }

        let subs = dig(&scheme, &["subSchemes", "scheme"]);
        for sub in listify(subs) {
            if !sub.is_object() {
                continue;
            }
            let (Some(sub_id), Some(sub_name)) =
                (text_field(&sub, &ID_KEYS), text_field(&sub, &NAME_KEYS))
            else {
                continue;
            };
            let parent = name.clone().unwrap_or_default();
            let joined = format!("{} / {}", parent, sub_name);
            items.push(SchemeOption {
                scheme_id: sub_id,
                scheme_name: joined.trim_matches(|c| c == ' ' || c == '/').to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
    items
}

/// 在用方案筛选: 名称含 "in-use"（不区分大小写）,无匹配时回退全部
///
/// # 返回
/// (候选列表, 默认选中下标)；默认选中名称恰为 "in-use" 的方案,否则 0
pub fn select_in_use(schemes: &[SchemeOption]) -> (Vec<SchemeOption>, usize) {
    let in_use: Vec<SchemeOption> = schemes
        .iter()
        .filter(|s| s.scheme_name.to_lowercase().contains("in-use"))
        .cloned()
        .collect();
    let options = if in_use.is_empty() {
        schemes.to_vec()
    } else {
        in_use
    };

    let default_idx = options
        .iter()
        .position(|s| s.scheme_name.trim().eq_ignore_ascii_case("in-use"))
        .unwrap_or(0);

    (options, default_idx)
}

/// /assessments → 原始行记录（嵌套值序列化为 JSON 文本）
pub fn parse_assessments(payload: &Value) -> Vec<RawRow> {
    let raw = first_present(
        payload,
        &[&["results", "assessments", "assessment"], &["assessments"], &["assessment"]],
    );

    listify(raw)
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(
                map.iter()
                    .map(|(k, v)| (k.clone(), value_to_text(v)))
                    .collect::<RawRow>(),
            ),
            _ => None,
        })
        .collect()
}
