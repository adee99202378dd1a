//! 站点页面格式适配
//!
//! 所有依赖站点 HTML/脚本结构的解析都集中在这里，站点改版时只需修改本模块

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value as JsonValue;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::infrastructure::session::LoginTokens;
use crate::models::ResumeReceipt;

/// 上传回执所在的回调函数前缀
const MEDIA_CALLBACK: &str = "parent.mediaCallback(";

// 匹配到左括号为止，其后的空白一并跳过
static MEDIA_CALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"parent\.mediaCallback\(\s*").unwrap_or_else(|e| panic!("invalid regex: {}", e))
});

/// 职位详情页中嵌入 JSON 的代码块
const JOB_MODULE_SELECTOR: &str = "code#decoratedJobPostingModule";

// 选择器均由本模块内的常量拼出
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| panic!("invalid selector: {}", css))
}

/// 从登录页提取三个防伪令牌
///
/// 任一字段缺失都视为致命错误
pub fn extract_login_tokens(html: &str) -> AppResult<LoginTokens> {
    let document = Html::parse_document(html);

    let field = |name: &str| -> AppResult<String> {
        let sel = selector(&format!(r#"input[name="{}"]"#, name));
        document
            .select(&sel)
            .find_map(|input| input.value().attr("value"))
            .map(str::to_string)
            .ok_or_else(|| AppError::TokenExtraction {
                field: name.to_string(),
            })
    };

    let [csrf_param, csrf_token, source_alias] = LoginTokens::FIELDS;
    Ok(LoginTokens {
        login_csrf_param: field(csrf_param)?,
        csrf_token: field(csrf_token)?,
        source_alias: field(source_alias)?,
    })
}

/// 解析简历上传回执
///
/// 回执是 `parent.mediaCallback({...})` 的唯一参数，位于 `<script>` 中。
/// 回调之后的其他脚本语句不影响解析
pub fn parse_media_callback(html: &str) -> AppResult<ResumeReceipt> {
    let document = Html::parse_document(html);
    let scripts: Vec<String> = document
        .select(&selector("script"))
        .map(|script| script.text().collect::<String>())
        .collect();

    scripts
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(html))
        .find_map(read_callback_argument)
        .unwrap_or_else(|| {
            Err(AppError::ResumeReceiptParse {
                reason: format!("响应中找不到 {}", MEDIA_CALLBACK),
            })
        })
}

/// 读出回调的第一个参数，并确认其后紧跟 `)`
///
/// 文本中没有回调时返回 `None`
fn read_callback_argument(text: &str) -> Option<AppResult<ResumeReceipt>> {
    let start = MEDIA_CALLBACK_RE.find(text)?.end();
    let rest = &text[start..];

    let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<ResumeReceipt>();
    let receipt = match stream.next() {
        Some(Ok(receipt)) => receipt,
        Some(Err(e)) => {
            return Some(Err(AppError::ResumeReceiptParse {
                reason: format!("回执 JSON 无效: {}", e),
            }))
        }
        None => {
            return Some(Err(AppError::ResumeReceiptParse {
                reason: format!("{} 没有参数", MEDIA_CALLBACK),
            }))
        }
    };

    if !rest[stream.byte_offset()..].trim_start().starts_with(')') {
        return Some(Err(AppError::ResumeReceiptParse {
            reason: format!("{} 的参数之后缺少 )", MEDIA_CALLBACK),
        }));
    }
    Some(Ok(receipt))
}

/// 从职位详情页提取站外投递链接
///
/// 优先查找职位模块中的注释 JSON，找不到时扫描页面中所有注释
pub fn extract_external_apply_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let in_module = document
        .select(&selector(JOB_MODULE_SELECTOR))
        .flat_map(|code| comments_under(code))
        .find_map(|comment| find_link_in_json(&comment));
    if in_module.is_some() {
        return in_module;
    }

    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Comment(comment) => Some(comment.comment.to_string()),
            _ => None,
        })
        .find_map(|comment| find_link_in_json(&comment))
}

fn comments_under(element: ElementRef<'_>) -> Vec<String> {
    element
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Comment(comment) => Some(comment.comment.to_string()),
            _ => None,
        })
        .collect()
}

fn find_link_in_json(comment: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(comment.trim()).ok()?;
    find_key(&value, "externalApplyLink")
}

fn find_key(value: &JsonValue, key: &str) -> Option<String> {
    match value {
        JsonValue::Object(map) => {
            if let Some(JsonValue::String(found)) = map.get(key) {
                return Some(found.clone());
            }
            map.values().find_map(|v| find_key(v, key))
        }
        JsonValue::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// 解析站外链接中的 `url=` 参数
///
/// 相对链接基于 `base_url` 补全；没有 `url=` 参数时原样返回
pub fn resolve_offsite_url(link: &str, base_url: &str) -> AppResult<String> {
    let parsed = match Url::parse(link) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base_url)?.join(link)?,
        Err(e) => return Err(e.into()),
    };

    let target = parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned());

    Ok(target.unwrap_or_else(|| parsed.to_string()))
}

/// 将职位描述 HTML 转为纯文本（用于终端预览）
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: Vec<&str> = fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    text.join(" ")
}
