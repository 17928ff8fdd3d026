//! 邮箱地址的语法检查
//!
//! 只做结构检查（local@domain，域名含点且各段合法），不做投递验证。

const LOCAL_MAX: usize = 64;
const DOMAIN_MAX: usize = 253;

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    is_valid_local(local) && is_valid_domain(domain)
}

fn is_valid_local(local: &str) -> bool {
    if local.is_empty() || local.len() > LOCAL_MAX {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > DOMAIN_MAX || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        for ok in [
            "sales@acme.example.com",
            "first.last+crm@mail.example.org",
            "o'brien@example.ie",
            " padded@example.com ",
        ] {
            assert!(is_valid_email(ok), "{ok}");
        }
    }

    #[test]
    fn test_invalid_addresses() {
        for bad in [
            "",
            "plainaddress",
            "@example.com",
            "user@",
            "user@localhost",
            "user@@example.com",
            ".user@example.com",
            "us..er@example.com",
            "user@-example.com",
            "user@example..com",
            "user name@example.com",
        ] {
            assert!(!is_valid_email(bad), "{bad}");
        }
    }
}
