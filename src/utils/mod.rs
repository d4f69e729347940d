pub mod excerpt;

pub use excerpt::create_excerpt;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    let chars = b"abcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 生成上传文件的对象名：`<unix 毫秒>-<随机串>-<清洗后的文件名>`
pub fn generate_object_name(original_filename: &str) -> String {
    let cleaned: String = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(['-', '.']);
    let name = if cleaned.is_empty() { "upload" } else { cleaned };

    format!(
        "{}-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        generate_random_code(8),
        name
    )
}
