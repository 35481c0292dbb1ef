//! User Name Value Object
//!
//! ユーザー名は、ユーザーを識別するための**公開ハンドル**。
//! 一覧表示と一意性チェックに使用される。
//!
//! ## 設計方針
//! - NFKC正規化 → 検証 → 小文字化 の順で処理
//! - 表示用の値（入力どおり）と canonical（小文字）を両方保持
//! - 一意性は canonical で判定する
//!
//! ## 不変条件
//! - 長さ: 3〜30文字（正規化後）
//! - ASCII英数字と `_ . - +` のみ
//! - 先頭・末尾: 英数字または `_`
//! - 連続ドット禁止（`..`）

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

/// Allowed special characters in user name
const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-', '+'];

/// Validated user name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName {
    display: String,
    canonical: String,
}

impl UserName {
    /// Validate user input
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let normalized = normalized.trim();

        let len = normalized.chars().count();
        if len < USER_NAME_MIN_LENGTH || len > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "User name must be between {USER_NAME_MIN_LENGTH} and {USER_NAME_MAX_LENGTH} characters"
            )));
        }

        if let Some(c) = normalized
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !ALLOWED_SPECIAL_CHARS.contains(c))
        {
            return Err(AppError::bad_request(format!(
                "User name contains an invalid character: {c:?}"
            )));
        }

        let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if !edge_ok(normalized.chars().next()) || !edge_ok(normalized.chars().last()) {
            return Err(AppError::bad_request(
                "User name must start and end with a letter, digit or underscore",
            ));
        }

        if normalized.contains("..") {
            return Err(AppError::bad_request(
                "User name cannot contain consecutive dots",
            ));
        }

        Ok(Self {
            display: normalized.to_string(),
            canonical: normalized.to_ascii_lowercase(),
        })
    }

    /// Rebuild from stored columns (assumed already validated)
    pub fn from_db(display: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            canonical: canonical.into(),
        }
    }

    /// Name as the user typed it
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lower-case form used for uniqueness
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_valid() {
        for name in ["bob", "alice_01", "j.doe", "first-last", "_under_", "a+b"] {
            assert!(UserName::new(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_user_name_canonical_is_lowercase() {
        let name = UserName::new("AliceSmith").unwrap();
        assert_eq!(name.as_str(), "AliceSmith");
        assert_eq!(name.canonical(), "alicesmith");
    }

    #[test]
    fn test_user_name_nfkc_fullwidth() {
        // Fullwidth "ＢＯＢ" normalizes to ASCII
        let name = UserName::new("ＢＯＢ").unwrap();
        assert_eq!(name.canonical(), "bob");
    }

    #[test]
    fn test_user_name_length_bounds() {
        assert!(UserName::new("ab").is_err());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_user_name_invalid_shapes() {
        assert!(UserName::new(".bob").is_err());
        assert!(UserName::new("bob-").is_err());
        assert!(UserName::new("bo..b").is_err());
        assert!(UserName::new("bo b").is_err());
        assert!(UserName::new("bob!").is_err());
        assert!(UserName::new("ボブさん").is_err());
    }
}
