use crate::errors::Error;
use core::fmt::Display;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A typed setting value. The textual form prefixes the value with its type:
///
/// ```text
///   b:true          boolean
///   i:-123          signed integer
///   u:234           unsigned integer
///   s:hello world   string
///   m:foo,bar,baz   list of strings
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Setting {
    SInt(isize),
    UInt(usize),
    String(String),
    Bool(bool),
    Map(Vec<String>),
}

impl Setting {
    #[must_use]
    pub fn to_bool(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::SInt(value) => converted("a boolean", *value != 0),
            Self::UInt(value) => converted("a boolean", *value != 0),
            Self::String(value) => converted("a boolean", is_truthy(value)),
            Self::Map(values) => converted("a boolean", !values.is_empty()),
        }
    }

    #[must_use]
    pub fn to_uint(&self) -> usize {
        match self {
            Self::UInt(value) => *value,
            Self::SInt(value) => converted("an unsigned integer", (*value).max(0) as usize),
            Self::Bool(value) => converted("an unsigned integer", usize::from(*value)),
            Self::String(value) => converted("an unsigned integer", value.parse().unwrap_or(0)),
            Self::Map(values) => converted("an unsigned integer", values.len()),
        }
    }

    #[must_use]
    pub fn to_sint(&self) -> isize {
        match self {
            Self::SInt(value) => *value,
            Self::UInt(value) => converted("a signed integer", isize::try_from(*value).unwrap_or(isize::MAX)),
            Self::Bool(value) => converted("a signed integer", isize::from(*value)),
            Self::String(value) => converted("a signed integer", value.parse().unwrap_or(0)),
            Self::Map(values) => converted("a signed integer", isize::try_from(values.len()).unwrap_or(isize::MAX)),
        }
    }

    /// Returns the raw value without its type prefix
    #[allow(clippy::inherent_to_string_shadow_display)]
    #[must_use]
    pub fn to_string(&self) -> String {
        match self {
            Self::SInt(value) => value.to_string(),
            Self::UInt(value) => value.to_string(),
            Self::String(value) => value.clone(),
            Self::Bool(value) => value.to_string(),
            Self::Map(values) => values.join(","),
        }
    }

    #[must_use]
    pub fn to_map(&self) -> Vec<String> {
        match self {
            Self::Map(values) => values.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Warns that a setting is read as another type than it holds, passes the converted value on
fn converted<T>(expected: &str, value: T) -> T {
    warn!("setting is not {expected}");
    value
}

fn invalid(value: &str, err: impl Display) -> Error {
    Error::Config(format!("error parsing {value}: {err}"))
}

fn is_truthy(s: &str) -> bool {
    matches!(s.to_ascii_uppercase().as_str(), "YES" | "ON" | "TRUE" | "1")
}

impl Serialize for Setting {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Setting {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(|err| serde::de::Error::custom(format!("cannot deserialize: {err}")))
    }
}

impl Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SInt(value) => write!(f, "i:{value}"),
            Self::UInt(value) => write!(f, "u:{value}"),
            Self::String(value) => write!(f, "s:{value}"),
            Self::Bool(value) => write!(f, "b:{value}"),
            Self::Map(values) => write!(f, "m:{}", values.join(",")),
        }
    }
}

impl FromStr for Setting {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Error> {
        let Some((kind, value)) = raw.split_once(':') else {
            return Err(Error::Config(format!("setting has no type prefix: {raw}")));
        };

        let setting = match kind {
            "b" => Self::Bool(value.parse::<bool>().map_err(|e| invalid(value, e))?),
            "i" => Self::SInt(value.parse::<isize>().map_err(|e| invalid(value, e))?),
            "u" => Self::UInt(value.parse::<usize>().map_err(|e| invalid(value, e))?),
            "s" => Self::String(value.to_string()),
            "m" => Self::Map(value.split(',').map(str::to_string).collect()),
            _ => return Err(Error::Config(format!("unknown setting type: {kind}"))),
        };

        Ok(setting)
    }
}

/// `SettingInfo` returns information about a given setting
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SettingInfo {
    /// Name of the key in dot notation (ie: effects.blink.duration_ms)
    pub key: String,
    /// Description of the setting
    pub description: String,
    /// Default setting if none has been specified
    pub default: Setting,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_each_kind() {
        assert_eq!(Setting::from_str("b:true").unwrap(), Setting::Bool(true));
        assert_eq!(Setting::from_str("i:-1").unwrap(), Setting::SInt(-1));
        assert_eq!(Setting::from_str("u:600").unwrap(), Setting::UInt(600));
        assert_eq!(
            Setting::from_str("s:inside").unwrap(),
            Setting::String("inside".into())
        );
        assert_eq!(
            Setting::from_str("m:top,bottom").unwrap(),
            Setting::Map(vec!["top".into(), "bottom".into()])
        );
        // only the first colon separates the type
        assert_eq!(
            Setting::from_str("s:http://localhost").unwrap(),
            Setting::String("http://localhost".into())
        );
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(Setting::from_str("notexist:true"), Err(Error::Config(_))));
        assert!(matches!(Setting::from_str("b:maybe"), Err(Error::Config(_))));
        assert!(matches!(Setting::from_str("u:-1"), Err(Error::Config(_))));
        assert!(matches!(Setting::from_str("no prefix"), Err(Error::Config(_))));
    }

    #[test]
    fn conversions() {
        let s = Setting::UInt(1000);
        assert_eq!(s.to_uint(), 1000);
        assert_eq!(s.to_sint(), 1000);
        assert!(s.to_bool());
        assert_eq!(s.to_string(), "1000");

        let s = Setting::SInt(-5);
        assert_eq!(s.to_uint(), 0);

        let s = Setting::String("on".into());
        assert!(s.to_bool());
        assert_eq!(s.to_uint(), 0);

        let s = Setting::String("42".into());
        assert_eq!(s.to_uint(), 42);

        let s = Setting::Map(vec!["a".into(), "b".into()]);
        assert_eq!(s.to_string(), "a,b");
        assert_eq!(s.to_uint(), 2);
        assert_eq!(Setting::Bool(false).to_map(), vec!["false"]);
    }

    #[test]
    fn only_converted_reads_warn() {
        testing_logger::setup();

        assert_eq!(Setting::UInt(600).to_uint(), 600);
        assert_eq!(Setting::SInt(-3).to_sint(), -3);
        assert!(Setting::Bool(true).to_bool());
        testing_logger::validate(|captured_logs| assert!(captured_logs.is_empty()));

        assert_eq!(Setting::Bool(true).to_uint(), 1);
        assert_eq!(Setting::UInt(7).to_sint(), 7);
        testing_logger::validate(|captured_logs| {
            let messages: Vec<_> = captured_logs.iter().map(|log| log.body.as_str()).collect();
            assert_eq!(
                messages,
                ["setting is not an unsigned integer", "setting is not a signed integer"]
            );
        });
    }

    #[test]
    fn display_and_serde_use_prefixed_form() {
        let s = Setting::UInt(600);
        assert_eq!(format!("{s}"), "u:600");

        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"u:600\"");
        let back: Setting = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
