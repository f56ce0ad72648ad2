use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Largest `maxSize` (in kilobytes) accepted before falling back to unbounded.
pub const MAX_SAFE_KILOBYTES: f64 = 9_007_199_254_740_991.0;
pub const WILDCARD_TYPES: &str = "*";
pub const DEFAULT_PROMPT: &str = "Click to select image";
pub const DEFAULT_CHANGED_FIELD: &str = "image-changed";

/// `types` as received. The last two variants keep malformed input around
/// so normalization can report it instead of rejecting the whole record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTypes {
    Wildcard(String),
    List(Vec<String>),
    Mixed(Vec<Value>),
    Other(Value),
}

/// `maxSize` as received: a number of kilobytes, a numeric string, or
/// anything else a JS caller might pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMaxSize {
    Kilobytes(f64),
    Text(String),
    Other(Value),
}

impl From<f64> for RawMaxSize {
    fn from(kilobytes: f64) -> Self {
        RawMaxSize::Kilobytes(kilobytes)
    }
}

/// Host-facing configuration record, as received from JS. Deserializing it
/// from any JSON object succeeds; bad values surface as [`ConfigWarning`]s
/// from [`UploadConfig::normalize`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawUploadConfig {
    #[serde(deserialize_with = "truthy")]
    pub remove_image_on_clear: bool,
    pub max_size: Option<RawMaxSize>,
    pub types: Option<RawTypes>,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub prompt: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub default_src: Option<String>,
}

/// JS truthiness of a JSON value.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeLimit {
    Unbounded,
    Bytes(u64),
}

impl SizeLimit {
    pub fn from_kilobytes(kilobytes: f64) -> Self {
        SizeLimit::Bytes((kilobytes * 1024.0).floor() as u64)
    }

    pub fn bytes(self) -> Option<u64> {
        match self {
            SizeLimit::Unbounded => None,
            SizeLimit::Bytes(bytes) => Some(bytes),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllowedTypes {
    Any,
    Only(Vec<String>),
}

impl AllowedTypes {
    /// Value for the file input's `accept` attribute.
    pub fn accept_attr(&self) -> String {
        match self {
            AllowedTypes::Any => "image/*".to_string(),
            AllowedTypes::Only(subtypes) => subtypes
                .iter()
                .map(|subtype| format!("image/{subtype}"))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("maxSize {0} is not a positive number of kilobytes; size check disabled")]
    InvalidMaxSize(f64),
    #[error("maxSize {0} is not a number; size check disabled")]
    NonNumericMaxSize(String),
    #[error("maxSize {0} exceeds the safe integer range; size check disabled")]
    MaxSizeOverflow(f64),
    #[error("types wildcard must be \"*\", got {0:?}; any image type allowed")]
    UnknownWildcard(String),
    #[error("types list is empty; any image type allowed")]
    EmptyTypes,
    #[error("blank entry at types[{0}] ignored")]
    BlankType(usize),
    #[error("non-string entry at types[{0}] ignored")]
    NonStringType(usize),
    #[error("types must be \"*\" or a list of subtypes, got {0}; any image type allowed")]
    InvalidTypes(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadConfig {
    pub remove_on_clear: bool,
    pub max_size: SizeLimit,
    pub allowed: AllowedTypes,
    pub name: Option<String>,
    pub prompt: String,
    pub default_src: Option<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            remove_on_clear: false,
            max_size: SizeLimit::Unbounded,
            allowed: AllowedTypes::Any,
            name: None,
            prompt: DEFAULT_PROMPT.to_string(),
            default_src: None,
        }
    }
}

impl UploadConfig {
    /// Normalizes a raw record. Never fails: every value that had to be
    /// replaced by a default is reported as a warning.
    pub fn normalize(raw: RawUploadConfig) -> (Self, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();
        let max_size = match raw.max_size {
            None => SizeLimit::Unbounded,
            Some(RawMaxSize::Kilobytes(kb)) => kilobyte_limit(kb, &mut warnings),
            Some(RawMaxSize::Text(text)) => match text.trim().parse::<f64>() {
                Ok(kb) => kilobyte_limit(kb, &mut warnings),
                Err(_) => {
                    warnings.push(ConfigWarning::NonNumericMaxSize(format!("{text:?}")));
                    SizeLimit::Unbounded
                }
            },
            Some(RawMaxSize::Other(value)) => {
                warnings.push(ConfigWarning::NonNumericMaxSize(value.to_string()));
                SizeLimit::Unbounded
            }
        };
        let allowed = match raw.types {
            None => AllowedTypes::Any,
            Some(RawTypes::Wildcard(value)) => {
                if value.trim() != WILDCARD_TYPES {
                    warnings.push(ConfigWarning::UnknownWildcard(value));
                }
                AllowedTypes::Any
            }
            Some(RawTypes::List(list)) => subtype_list(list.into_iter().map(Some), &mut warnings),
            Some(RawTypes::Mixed(list)) => subtype_list(
                list.into_iter().map(|entry| match entry {
                    Value::String(text) => Some(text),
                    _ => None,
                }),
                &mut warnings,
            ),
            Some(RawTypes::Other(value)) => {
                warnings.push(ConfigWarning::InvalidTypes(value.to_string()));
                AllowedTypes::Any
            }
        };
        let config = Self {
            remove_on_clear: raw.remove_image_on_clear,
            max_size,
            allowed,
            name: non_blank(raw.name),
            prompt: non_blank(raw.prompt).unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            default_src: non_blank(raw.default_src),
        };
        (config, warnings)
    }

    pub fn changed_field_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) => format!("{name}-changed"),
            None => DEFAULT_CHANGED_FIELD.to_string(),
        }
    }
}

fn kilobyte_limit(kb: f64, warnings: &mut Vec<ConfigWarning>) -> SizeLimit {
    if !kb.is_finite() || kb <= 0.0 {
        // Zero is the documented "no limit" spelling.
        if kb != 0.0 {
            warnings.push(ConfigWarning::InvalidMaxSize(kb));
        }
        return SizeLimit::Unbounded;
    }
    if kb > MAX_SAFE_KILOBYTES {
        warnings.push(ConfigWarning::MaxSizeOverflow(kb));
        return SizeLimit::Unbounded;
    }
    SizeLimit::from_kilobytes(kb)
}

/// `None` entries are values of the wrong type.
fn subtype_list<I>(entries: I, warnings: &mut Vec<ConfigWarning>) -> AllowedTypes
where
    I: Iterator<Item = Option<String>>,
{
    let mut subtypes = Vec::new();
    for (idx, entry) in entries.enumerate() {
        match entry {
            None => warnings.push(ConfigWarning::NonStringType(idx)),
            Some(subtype) if subtype.trim().is_empty() => {
                warnings.push(ConfigWarning::BlankType(idx))
            }
            Some(subtype) => subtypes.push(subtype),
        }
    }
    if subtypes.is_empty() {
        warnings.push(ConfigWarning::EmptyTypes);
        AllowedTypes::Any
    } else {
        AllowedTypes::Only(subtypes)
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_normalize_to_lenient_defaults() {
        let (config, warnings) = UploadConfig::normalize(RawUploadConfig::default());
        assert_eq!(config, UploadConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn max_size_is_kilobytes() {
        let raw = RawUploadConfig {
            max_size: Some(1.5.into()),
            ..RawUploadConfig::default()
        };
        let (config, _) = UploadConfig::normalize(raw);
        assert_eq!(config.max_size, SizeLimit::Bytes(1536));
    }

    #[test]
    fn bad_max_size_falls_back_with_warning() {
        for (kb, expect_warning) in [(0.0, false), (-4.0, true), (f64::NAN, true), (1e300, true)] {
            let raw = RawUploadConfig {
                max_size: Some(kb.into()),
                ..RawUploadConfig::default()
            };
            let (config, warnings) = UploadConfig::normalize(raw);
            assert_eq!(config.max_size, SizeLimit::Unbounded, "kb={kb}");
            assert_eq!(!warnings.is_empty(), expect_warning, "kb={kb}");
        }
    }

    #[test]
    fn types_list_keeps_order_and_drops_blanks() {
        let raw = RawUploadConfig {
            types: Some(RawTypes::List(vec![
                "webp".to_string(),
                " ".to_string(),
                "png".to_string(),
            ])),
            ..RawUploadConfig::default()
        };
        let (config, warnings) = UploadConfig::normalize(raw);
        assert_eq!(
            config.allowed,
            AllowedTypes::Only(vec!["webp".to_string(), "png".to_string()])
        );
        assert_eq!(warnings, vec![ConfigWarning::BlankType(1)]);
        assert_eq!(config.allowed.accept_attr(), "image/webp,image/png");
    }

    #[test]
    fn empty_types_list_means_any() {
        let raw = RawUploadConfig {
            types: Some(RawTypes::List(Vec::new())),
            ..RawUploadConfig::default()
        };
        let (config, warnings) = UploadConfig::normalize(raw);
        assert_eq!(config.allowed, AllowedTypes::Any);
        assert_eq!(warnings, vec![ConfigWarning::EmptyTypes]);
    }

    #[test]
    fn parses_camel_case_json() {
        let raw: RawUploadConfig = serde_json::from_str(
            r#"{"removeImageOnClear":true,"maxSize":1024,"types":["png","jpeg"],"name":"avatar"}"#,
        )
        .expect("valid config json");
        let (config, warnings) = UploadConfig::normalize(raw);
        assert!(warnings.is_empty());
        assert!(config.remove_on_clear);
        assert_eq!(config.max_size, SizeLimit::Bytes(1024 * 1024));
        assert_eq!(config.changed_field_name(), "avatar-changed");

        let raw: RawUploadConfig =
            serde_json::from_str(r#"{"types":"*"}"#).expect("valid config json");
        assert_eq!(raw.types, Some(RawTypes::Wildcard("*".to_string())));
    }

    fn parse(json: &str) -> (UploadConfig, Vec<ConfigWarning>) {
        let raw: RawUploadConfig = serde_json::from_str(json)
            .unwrap_or_else(|err| panic!("{json} rejected instead of normalized: {err}"));
        UploadConfig::normalize(raw)
    }

    #[test]
    fn wrongly_typed_max_size_is_unbounded() {
        for json in [
            r#"{"maxSize":"abc"}"#,
            r#"{"maxSize":true}"#,
            r#"{"maxSize":[1]}"#,
            r#"{"maxSize":{"kb":1}}"#,
        ] {
            let (config, warnings) = parse(json);
            assert_eq!(config.max_size, SizeLimit::Unbounded, "{json}");
            assert!(
                matches!(warnings.as_slice(), [ConfigWarning::NonNumericMaxSize(_)]),
                "{json}: {warnings:?}"
            );
        }
        let (config, warnings) = parse(r#"{"maxSize":null}"#);
        assert_eq!(config.max_size, SizeLimit::Unbounded);
        assert!(warnings.is_empty());
    }

    #[test]
    fn numeric_string_max_size_is_kilobytes() {
        let (config, warnings) = parse(r#"{"maxSize":" 1024 "}"#);
        assert_eq!(config.max_size, SizeLimit::Bytes(1024 * 1024));
        assert!(warnings.is_empty());

        let (config, warnings) = parse(r#"{"maxSize":"-2"}"#);
        assert_eq!(config.max_size, SizeLimit::Unbounded);
        assert_eq!(warnings, vec![ConfigWarning::InvalidMaxSize(-2.0)]);
    }

    #[test]
    fn remove_on_clear_follows_js_truthiness() {
        for (json, expected) in [
            (r#"{"removeImageOnClear":1}"#, true),
            (r#"{"removeImageOnClear":"yes"}"#, true),
            (r#"{"removeImageOnClear":{}}"#, true),
            (r#"{"removeImageOnClear":0}"#, false),
            (r#"{"removeImageOnClear":""}"#, false),
            (r#"{"removeImageOnClear":null}"#, false),
        ] {
            assert_eq!(parse(json).0.remove_on_clear, expected, "{json}");
        }
    }

    #[test]
    fn non_string_type_entries_are_dropped() {
        let (config, warnings) = parse(r#"{"types":["png",3,null,"gif"]}"#);
        assert_eq!(
            config.allowed,
            AllowedTypes::Only(vec!["png".to_string(), "gif".to_string()])
        );
        assert_eq!(
            warnings,
            vec![ConfigWarning::NonStringType(1), ConfigWarning::NonStringType(2)]
        );

        let (config, warnings) = parse(r#"{"types":42}"#);
        assert_eq!(config.allowed, AllowedTypes::Any);
        assert_eq!(warnings, vec![ConfigWarning::InvalidTypes("42".to_string())]);
    }

    #[test]
    fn wrongly_typed_text_fields_are_ignored() {
        let (config, warnings) = parse(r#"{"name":7,"prompt":false,"defaultSrc":["a"]}"#);
        assert_eq!(config.name.as_deref(), Some("7"));
        assert_eq!(config.prompt, DEFAULT_PROMPT);
        assert_eq!(config.default_src, None);
        assert!(warnings.is_empty());
    }
}
