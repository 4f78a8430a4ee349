use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a command was executed by the database layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ExecuteKind {
    /// Statement with no result set (INSERT, UPDATE, DDL)
    NonQuery,
    /// Statement returning a single value
    Scalar,
    /// Statement that opens a streaming result set
    Reader,
}

impl ExecuteKind {
    /// Reader executions complete when their rows have been consumed, not when the call returns
    pub fn is_reader(self) -> bool {
        matches!(self, ExecuteKind::Reader)
    }
}

/// A value bound to a command parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Uuid(uuid::Uuid),
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Null values print as nothing, so `{id:}` means a NULL binding
            ParamValue::Null => Ok(()),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Text(v) => write!(f, "{}", v),
            ParamValue::Bytes(v) => write!(f, "{}", hex::encode(v)),
            ParamValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            ParamValue::Uuid(v) => write!(f, "{}", v.hyphenated()),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(v: Vec<u8>) -> Self {
        ParamValue::Bytes(v)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(v: DateTime<Utc>) -> Self {
        ParamValue::Timestamp(v)
    }
}

impl From<uuid::Uuid> for ParamValue {
    fn from(v: uuid::Uuid) -> Self {
        ParamValue::Uuid(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: ParamValue,
}

/// A SQL statement together with its bound parameters, in binding order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Command {
    pub text: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Command {
    pub fn new(text: impl Into<String>) -> Self {
        Command {
            text: text.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a named parameter
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Render the parameters as `{name:value,name:value}`.
    /// An empty parameter list renders as `{}`.
    pub fn parameters_display(&self) -> String {
        let body = self
            .parameters
            .iter()
            .map(|p| format!("{}:{}", p.name, p.value))
            .collect::<Vec<_>>()
            .join(",");
        format!("{{{}}}", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parameters_display_two_values() {
        let command = Command::new("SELECT * FROM users WHERE id = :id AND name = :name")
            .bind("id", "7")
            .bind("name", "x");
        assert_eq!(command.parameters_display(), "{id:7,name:x}");
    }

    #[test]
    fn test_parameters_display_empty() {
        assert_eq!(Command::new("SELECT 1").parameters_display(), "{}");
    }

    #[test]
    fn test_parameters_display_keeps_binding_order() {
        let command = Command::new("UPDATE t SET b = :b WHERE a = :a")
            .bind("b", 2)
            .bind("a", 1);
        assert_eq!(command.parameters_display(), "{b:2,a:1}");
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::Null.to_string(), "");
        assert_eq!(ParamValue::from(true).to_string(), "true");
        assert_eq!(ParamValue::from(-3i64).to_string(), "-3");
        assert_eq!(ParamValue::from(1.5).to_string(), "1.5");
        assert_eq!(ParamValue::from(vec![0xde, 0xad]).to_string(), "dead");
        assert_eq!(ParamValue::from(None::<i64>), ParamValue::Null);

        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(ParamValue::from(ts).to_string(), "2024-03-01T12:30:00+00:00");

        let id = uuid::Uuid::nil();
        assert_eq!(
            ParamValue::from(id).to_string(),
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_null_parameter_renders_empty() {
        let command = Command::new("INSERT INTO t VALUES (:a)").bind("a", ParamValue::Null);
        assert_eq!(command.parameters_display(), "{a:}");
    }

    #[test]
    fn test_execute_kind_is_reader() {
        assert!(ExecuteKind::Reader.is_reader());
        assert!(!ExecuteKind::Scalar.is_reader());
        assert!(!ExecuteKind::NonQuery.is_reader());
    }

    #[test]
    fn test_command_deserialize_without_parameters() {
        let command: Command = serde_json::from_str(r#"{"text":"SELECT 1"}"#).unwrap();
        assert_eq!(command.text, "SELECT 1");
        assert!(command.parameters.is_empty());
    }
}
