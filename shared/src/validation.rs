//! 客户端表单校验
//!
//! 只做必填项与格式检查，唯一性等业务规则交由后端判定。

use crate::protocol::RegisterRequest;
use crate::{AccountFields, ProductFields};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

static PHONE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{7,15}$").expect("phone pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a valid phone number.")]
    InvalidPhone,
    #[error("Please enter a valid price.")]
    InvalidPrice,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_SHAPE.is_match(phone)
}

fn require(values: &[&str]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        Err(ValidationError::MissingFields)
    } else {
        Ok(())
    }
}

/// 解析价格输入：必须是非负十进制数
pub fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let price = Decimal::from_str(raw.trim()).map_err(|_| ValidationError::InvalidPrice)?;
    if price.is_sign_negative() {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(price)
}

impl RegisterRequest {
    /// 注册表单：全部必填，邮箱与手机号需符合基本格式
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
            &self.phone,
            &self.location,
        ])?;
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if !is_valid_phone(&self.phone) {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(())
    }
}

impl AccountFields {
    /// 姓名（任一形式）与邮箱必填
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&[&self.full_name(), &self.email])
    }
}

impl ProductFields {
    /// 标题与描述必填，价格不能为负
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&[&self.title, &self.description])?;
        if self.price.is_sign_negative() {
            return Err(ValidationError::InvalidPrice);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
            phone: "+15551234567".into(),
            location: "London".into(),
        }
    }

    #[test]
    fn complete_registration_passes() {
        assert_eq!(register().validate(), Ok(()));
    }

    #[test]
    fn blank_field_is_reported_before_shape_checks() {
        let req = RegisterRequest {
            location: "   ".into(),
            email: "broken".into(),
            ..register()
        };
        assert_eq!(req.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        let req = RegisterRequest {
            email: "nope@".into(),
            ..register()
        };
        assert_eq!(req.validate(), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn phone_shape() {
        assert!(is_valid_phone("1234567"));
        assert!(is_valid_phone("+123456789012345"));
        assert!(!is_valid_phone("123456"));
        assert!(!is_valid_phone("555-1234"));
        let req = RegisterRequest {
            phone: "12ab".into(),
            ..register()
        };
        assert_eq!(req.validate(), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn price_must_be_non_negative_decimal() {
        assert_eq!(parse_price(" 12.50 "), Ok(Decimal::new(1250, 2)));
        assert_eq!(parse_price("-1"), Err(ValidationError::InvalidPrice));
        assert_eq!(parse_price("abc"), Err(ValidationError::InvalidPrice));
    }

    #[test]
    fn product_fields_require_title_and_description() {
        let fields = ProductFields {
            title: "Lamp".into(),
            description: "  ".into(),
            price: Decimal::new(500, 2),
            ..Default::default()
        };
        assert_eq!(fields.validate(), Err(ValidationError::MissingFields));

        let fields = ProductFields {
            description: "Bright".into(),
            ..fields
        };
        assert_eq!(fields.validate(), Ok(()));
    }

    #[test]
    fn account_fields_require_name_and_email() {
        let fields = AccountFields {
            name: "Ada".into(),
            email: String::new(),
            ..Default::default()
        };
        assert_eq!(fields.validate(), Err(ValidationError::MissingFields));
    }
}
