//! Excerpt generation for blog posts
//!
//! The excerpt is derived from the post content on every save: markup is
//! stripped, whitespace collapsed, and long text is cut on a word boundary.

/// 截断后追加的后缀
pub const EXCERPT_SUFFIX: &str = "...";

/// 由正文生成摘要
///
/// 纯函数：相同的 `content` 与 `max_len` 总是得到相同的结果。
/// `max_len` 按字符计数，不含后缀。
pub fn create_excerpt(content: &str, max_len: usize) -> String {
    let text = collapse_whitespace(&strip_tags(content));

    if text.chars().count() <= max_len {
        return text;
    }

    let cut: String = text.chars().take(max_len).collect();
    // 正好断在单词末尾时保留整段
    let next_is_space = text
        .chars()
        .nth(max_len)
        .is_some_and(char::is_whitespace);

    let truncated = if next_is_space {
        cut.as_str()
    } else {
        match cut.rfind(char::is_whitespace) {
            Some(idx) if idx > 0 => &cut[..idx],
            // 单个超长单词，硬截断
            _ => cut.as_str(),
        }
    };

    format!("{}{}", truncated.trim_end(), EXCERPT_SUFFIX)
}

/// 会在文本中断开段落的标签
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th",
    "tr", "ul",
];

fn is_block_tag(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    BLOCK_TAGS.contains(&name.as_str())
}

/// 去掉 `<...>` 标签；块级标签替换为空格，行内标签直接删除
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut tag = String::new();
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' if !in_tag => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if is_block_tag(&tag) {
                    out.push(' ');
                }
            }
            _ if in_tag => tag.push(c),
            _ => out.push(c),
        }
    }
    out
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
