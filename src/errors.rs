use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum BlogError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    ObjectStorage(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    InvalidMultipartData(String),
    FileTooLarge(String),
}

impl BlogError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            BlogError::DatabaseConfig(_) => "E001",
            BlogError::DatabaseConnection(_) => "E002",
            BlogError::DatabaseOperation(_) => "E003",
            BlogError::ObjectStorage(_) => "E004",
            BlogError::FileOperation(_) => "E005",
            BlogError::Validation(_) => "E006",
            BlogError::NotFound(_) => "E007",
            BlogError::Serialization(_) => "E008",
            BlogError::InvalidMultipartData(_) => "E009",
            BlogError::FileTooLarge(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            BlogError::DatabaseConfig(_) => "Database Configuration Error",
            BlogError::DatabaseConnection(_) => "Database Connection Error",
            BlogError::DatabaseOperation(_) => "Database Operation Error",
            BlogError::ObjectStorage(_) => "Object Storage Error",
            BlogError::FileOperation(_) => "File Operation Error",
            BlogError::Validation(_) => "Validation Error",
            BlogError::NotFound(_) => "Resource Not Found",
            BlogError::Serialization(_) => "Serialization Error",
            BlogError::InvalidMultipartData(_) => "Invalid Multipart Data",
            BlogError::FileTooLarge(_) => "File Too Large",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            BlogError::DatabaseConfig(msg)
            | BlogError::DatabaseConnection(msg)
            | BlogError::DatabaseOperation(msg)
            | BlogError::ObjectStorage(msg)
            | BlogError::FileOperation(msg)
            | BlogError::Validation(msg)
            | BlogError::NotFound(msg)
            | BlogError::Serialization(msg)
            | BlogError::InvalidMultipartData(msg)
            | BlogError::FileTooLarge(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            BlogError::Validation(_) | BlogError::InvalidMultipartData(_) => {
                StatusCode::BAD_REQUEST
            }
            BlogError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogError::NotFound(_))
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BlogError {}

// 便捷的构造函数
impl BlogError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        BlogError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        BlogError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        BlogError::DatabaseOperation(msg.into())
    }

    pub fn object_storage<T: Into<String>>(msg: T) -> Self {
        BlogError::ObjectStorage(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        BlogError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        BlogError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BlogError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BlogError::Serialization(msg.into())
    }

    pub fn invalid_multipart_data<T: Into<String>>(msg: T) -> Self {
        BlogError::InvalidMultipartData(msg.into())
    }

    pub fn file_too_large<T: Into<String>>(msg: T) -> Self {
        BlogError::FileTooLarge(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for BlogError {
    fn from(err: sea_orm::DbErr) -> Self {
        BlogError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for BlogError {
    fn from(err: std::io::Error) -> Self {
        BlogError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BlogError {
    fn from(err: serde_json::Error) -> Self {
        BlogError::Serialization(err.to_string())
    }
}

impl From<actix_multipart::MultipartError> for BlogError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        BlogError::InvalidMultipartData(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
