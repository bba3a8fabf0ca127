use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_LEVEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid class level regex"));

/// 校验班级层级标签
///
/// 层级标签参与可见性过滤和查询，只允许字母、数字、下划线和连字符。
pub fn validate_class_level(level: &str) -> Result<(), &'static str> {
    if level.is_empty() || level.len() > 32 {
        return Err("Class level length must be between 1 and 32 characters");
    }
    if !CLASS_LEVEL_RE.is_match(level) {
        return Err("Class level must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

/// 校验学生显示名（访客提交身份）
pub fn validate_student_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Student name must not be empty");
    }
    if trimmed.chars().count() > 64 {
        return Err("Student name must not exceed 64 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_level() {
        assert!(validate_class_level("grade-1").is_ok());
        assert!(validate_class_level("CS_101").is_ok());
        assert!(validate_class_level("").is_err());
        assert!(validate_class_level("年级一").is_err());
        assert!(validate_class_level(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_student_name() {
        assert!(validate_student_name("张三").is_ok());
        assert!(validate_student_name("  ").is_err());
        assert!(validate_student_name(&"名".repeat(65)).is_err());
    }
}
