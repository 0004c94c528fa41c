use std::fmt;
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq)]
pub enum GeominderError {
    DatabaseOpen(String),
    DatabaseRead(String),
    Decode(String),
    NotFound(String),
    InvalidAddress(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
}

impl GeominderError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeominderError::DatabaseOpen(_) => "E001",
            GeominderError::DatabaseRead(_) => "E002",
            GeominderError::Decode(_) => "E003",
            GeominderError::NotFound(_) => "E004",
            GeominderError::InvalidAddress(_) => "E005",
            GeominderError::Config(_) => "E006",
            GeominderError::FileOperation(_) => "E007",
            GeominderError::Serialization(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeominderError::DatabaseOpen(_) => "Database Open Error",
            GeominderError::DatabaseRead(_) => "Database Read Error",
            GeominderError::Decode(_) => "Record Decode Error",
            GeominderError::NotFound(_) => "Address Not Found",
            GeominderError::InvalidAddress(_) => "Invalid Address",
            GeominderError::Config(_) => "Configuration Error",
            GeominderError::FileOperation(_) => "File Operation Error",
            GeominderError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情（HTTP 错误响应体直接使用这个字段）
    pub fn message(&self) -> &str {
        match self {
            GeominderError::DatabaseOpen(msg) => msg,
            GeominderError::DatabaseRead(msg) => msg,
            GeominderError::Decode(msg) => msg,
            GeominderError::NotFound(msg) => msg,
            GeominderError::InvalidAddress(msg) => msg,
            GeominderError::Config(msg) => msg,
            GeominderError::FileOperation(msg) => msg,
            GeominderError::Serialization(msg) => msg,
        }
    }

    /// Lookup-path failures are recoverable per request; everything else is
    /// a startup/tooling problem.
    pub fn is_per_request(&self) -> bool {
        matches!(
            self,
            GeominderError::DatabaseRead(_)
                | GeominderError::Decode(_)
                | GeominderError::NotFound(_)
                | GeominderError::InvalidAddress(_)
        )
    }

    /// 格式化为彩色输出（用于启动失败时的终端提示）
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

impl fmt::Display for GeominderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeominderError {}

// 便捷的构造函数
impl GeominderError {
    pub fn database_open<T: Into<String>>(msg: T) -> Self {
        GeominderError::DatabaseOpen(msg.into())
    }

    pub fn database_read<T: Into<String>>(msg: T) -> Self {
        GeominderError::DatabaseRead(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        GeominderError::Decode(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GeominderError::NotFound(msg.into())
    }

    /// The canonical "no database entry" error for an address.
    pub fn no_match(ip: IpAddr) -> Self {
        Self::not_found(format!("no match for {} found in database", ip))
    }

    pub fn invalid_address<T: Into<String>>(msg: T) -> Self {
        GeominderError::InvalidAddress(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeominderError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeominderError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GeominderError::Serialization(msg.into())
    }
}

impl From<std::io::Error> for GeominderError {
    fn from(err: std::io::Error) -> Self {
        GeominderError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GeominderError {
    fn from(err: serde_json::Error) -> Self {
        GeominderError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeominderError>;
