//! 网址字段校验
//!
//! 只接受带主机名的 http/https 地址，拒绝脚本类协议

use url::Url;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::MissingHost => write!(f, "URL has no host"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

const DANGEROUS_PROTOCOLS: &[&str] = &["javascript:", "data:", "file:", "vbscript:", "blob:"];

/// 校验网址
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let lower = url.to_lowercase();
    if let Some(proto) = DANGEROUS_PROTOCOLS.iter().find(|p| lower.starts_with(**p)) {
        return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::InvalidProtocol(format!("{}:", other))),
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

/// 面向用户的错误消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL cannot be empty.",
        UrlValidationError::InvalidProtocol(_) => "Enter a URL starting with http:// or https://.",
        UrlValidationError::DangerousProtocol(_) => "This URL protocol is not allowed.",
        UrlValidationError::MissingHost | UrlValidationError::InvalidFormat(_) => {
            "Enter a valid URL."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_websites() {
        assert!(validate_url("https://acme.example.com").is_ok());
        assert!(validate_url("http://acme.example.com/about?lang=en").is_ok());
        assert!(validate_url("HTTPS://ACME.EXAMPLE.COM").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert_eq!(
            validate_url("ftp://acme.example.com"),
            Err(UrlValidationError::InvalidProtocol("ftp:".into()))
        );
        assert!(matches!(
            validate_url("mailto:sales@acme.example.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(validate_url("  "), Err(UrlValidationError::EmptyUrl));
        assert!(matches!(
            validate_url("acme.example.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(validate_url("http://").is_err());
    }
}
