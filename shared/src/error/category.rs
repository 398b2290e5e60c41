//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category, determined by the code range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Access errors (1xxx)
    Access,
    /// Menu catalog errors (2xxx)
    Menu,
    /// Restaurant errors (3xxx)
    Restaurant,
    /// Content errors (4xxx)
    Content,
    /// Storage errors (5xxx)
    Storage,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Access,
            2000..3000 => Self::Menu,
            3000..4000 => Self::Restaurant,
            4000..5000 => Self::Content,
            5000..6000 => Self::Storage,
            _ => Self::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Access => "access",
            Self::Menu => "menu",
            Self::Restaurant => "restaurant",
            Self::Content => "content",
            Self::Storage => "storage",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(2), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1003), ErrorCategory::Access);
        assert_eq!(ErrorCategory::from_code(2201), ErrorCategory::Menu);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Restaurant);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Content);
        assert_eq!(ErrorCategory::from_code(5005), ErrorCategory::Storage);
        assert_eq!(ErrorCategory::from_code(7000), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::CategoryNotFound.category(), ErrorCategory::Menu);
        assert_eq!(
            ErrorCode::OperatingHourNotFound.category(),
            ErrorCategory::Restaurant
        );
        assert_eq!(ErrorCode::StorageFailed.category(), ErrorCategory::Storage);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Restaurant).unwrap();
        assert_eq!(json, "\"restaurant\"");
        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
    }
}
