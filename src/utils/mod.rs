pub mod email_validator;
pub mod password;
pub mod url_validator;

/// 生成字母数字随机串（用于未配置时的 JWT 密钥）
pub fn generate_secure_token(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 把上传的原始文件名清理为只含 `[A-Za-z0-9._-]` 的安全名称
///
/// 其他字符替换为 `_`，去掉开头的点，最长保留 100 个字符。
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(100)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_token() {
        let token = generate_secure_token(32);
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_secure_token(32));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report 2024.pdf"), "report_2024.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\q1.xlsx"), "q1.xlsx");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name("合同.pdf"), "__.pdf");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name("..."), "file");
    }
}
