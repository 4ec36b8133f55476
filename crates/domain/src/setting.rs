use std::fmt::{Display, Formatter};
use std::str::FromStr;

use scanboard_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Known global setting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    /// Public URL of the console, used in links sent to users.
    ConsoleUrl,
    /// Days after which scan results of inactive nodes are deleted.
    InactiveDeleteScanResults,
}

impl SettingKey {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConsoleUrl => "console_url",
            Self::InactiveDeleteScanResults => "inactive_delete_scan_results",
        }
    }

    /// Parses a raw request value according to this key's rules.
    pub fn parse_value(&self, raw_value: &Value) -> AppResult<SettingValue> {
        match self {
            Self::ConsoleUrl => parse_console_url(raw_value).map(SettingValue::ConsoleUrl),
            Self::InactiveDeleteScanResults => {
                parse_rounded_integer(raw_value).map(SettingValue::InactiveDeleteScanResults)
            }
        }
    }
}

impl Display for SettingKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "console_url" => Ok(Self::ConsoleUrl),
            "inactive_delete_scan_results" => Ok(Self::InactiveDeleteScanResults),
            _ => Err(AppError::Validation(format!("unknown setting key '{value}'"))),
        }
    }
}

/// Typed setting value. The variant always matches the owning key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    /// Normalized `scheme://host[:port]` console URL.
    ConsoleUrl(String),
    /// Retention in days.
    InactiveDeleteScanResults(i64),
}

impl SettingValue {
    /// Returns the key this value belongs to.
    #[must_use]
    pub fn key(&self) -> SettingKey {
        match self {
            Self::ConsoleUrl(_) => SettingKey::ConsoleUrl,
            Self::InactiveDeleteScanResults(_) => SettingKey::InactiveDeleteScanResults,
        }
    }

    /// Restores a stored JSON value for the given key.
    pub fn from_stored(key: SettingKey, stored: &Value) -> AppResult<Self> {
        match (key, stored) {
            (SettingKey::ConsoleUrl, Value::String(value)) => Ok(Self::ConsoleUrl(value.clone())),
            (SettingKey::InactiveDeleteScanResults, Value::Number(number)) => number
                .as_i64()
                .map(Self::InactiveDeleteScanResults)
                .ok_or_else(|| {
                    AppError::Internal(format!("stored value for '{key}' is not an integer"))
                }),
            _ => Err(AppError::Internal(format!(
                "stored value for '{key}' has unexpected shape: {stored}"
            ))),
        }
    }

    /// Returns the JSON form used for storage and API responses.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::ConsoleUrl(value) => Value::String(value.clone()),
            Self::InactiveDeleteScanResults(days) => Value::from(*days),
        }
    }
}

fn parse_console_url(raw_value: &Value) -> AppResult<String> {
    let candidate = match raw_value {
        Value::String(value) => value.clone(),
        other => other.to_string(),
    };

    let must_be_url = || AppError::Validation("value must be url".to_owned());
    let parsed = Url::parse(candidate.trim()).map_err(|_| must_be_url())?;
    let host = parsed.host_str().ok_or_else(must_be_url)?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    })
}

fn parse_rounded_integer(raw_value: &Value) -> AppResult<i64> {
    let must_be_integer = || AppError::Validation("value must be integer".to_owned());
    if let Some(integer) = raw_value.as_i64() {
        return Ok(integer);
    }

    let number = raw_value.as_f64().ok_or_else(must_be_integer)?;
    let rounded = number.round();
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(must_be_integer());
    }

    Ok(rounded as i64)
}

/// Global setting row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    id: i64,
    label: NonEmptyString,
    value: SettingValue,
    description: String,
    is_visible_on_ui: bool,
}

impl Setting {
    /// Creates a setting row.
    pub fn new(
        id: i64,
        label: impl Into<String>,
        value: SettingValue,
        description: impl Into<String>,
        is_visible_on_ui: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            label: NonEmptyString::new(label)?,
            value,
            description: description.into(),
            is_visible_on_ui,
        })
    }

    /// Returns a copy with a new value, keeping label, description and visibility.
    pub fn with_value(&self, value: SettingValue) -> AppResult<Self> {
        if value.key() != self.key() {
            return Err(AppError::Validation(format!(
                "value for '{}' cannot be stored under '{}'",
                value.key(),
                self.key()
            )));
        }

        Ok(Self {
            value,
            ..self.clone()
        })
    }

    /// Returns row identifier.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns setting key.
    #[must_use]
    pub fn key(&self) -> SettingKey {
        self.value.key()
    }

    /// Returns display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns typed value.
    #[must_use]
    pub fn value(&self) -> &SettingValue {
        &self.value
    }

    /// Returns description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns whether the setting is shown in the console.
    #[must_use]
    pub fn is_visible_on_ui(&self) -> bool {
        self.is_visible_on_ui
    }
}

#[cfg(test)]
mod tests {
    use scanboard_core::AppError;
    use serde_json::json;

    use super::{Setting, SettingKey, SettingValue};

    #[test]
    fn console_url_keeps_only_scheme_and_host() {
        let value = SettingKey::ConsoleUrl.parse_value(&json!("https://example.com/path?x=1"));
        assert_eq!(
            value.ok(),
            Some(SettingValue::ConsoleUrl("https://example.com".to_owned()))
        );
    }

    #[test]
    fn console_url_keeps_explicit_port() {
        let value = SettingKey::ConsoleUrl.parse_value(&json!("http://10.0.0.4:8080/login"));
        assert_eq!(
            value.ok(),
            Some(SettingValue::ConsoleUrl("http://10.0.0.4:8080".to_owned()))
        );
    }

    #[test]
    fn console_url_requires_scheme_and_host() {
        for raw in [json!("example.com"), json!("/relative/path"), json!(""), json!(42)] {
            let result = SettingKey::ConsoleUrl.parse_value(&raw);
            assert!(result.is_err(), "expected {raw} to be rejected");
        }
    }

    #[test]
    fn retention_rejects_values_beyond_i64_range() {
        let parse = |raw| SettingKey::InactiveDeleteScanResults.parse_value(&raw);

        assert!(matches!(
            parse(json!(i64::MAX)),
            Ok(SettingValue::InactiveDeleteScanResults(i64::MAX))
        ));
        for raw in [
            json!(9_223_372_036_854_775_808_u64),
            json!(9.223_372_036_854_775_808e18),
            json!(-1.0e19),
        ] {
            assert!(
                matches!(parse(raw.clone()), Err(AppError::Validation(_))),
                "expected {raw} to be rejected"
            );
        }
    }

    #[test]
    fn retention_rounds_half_away_from_zero() {
        let parse = |raw| SettingKey::InactiveDeleteScanResults.parse_value(&raw).ok();
        assert_eq!(
            parse(json!(7.6)),
            Some(SettingValue::InactiveDeleteScanResults(8))
        );
        assert_eq!(
            parse(json!(7.5)),
            Some(SettingValue::InactiveDeleteScanResults(8))
        );
        assert_eq!(
            parse(json!(30)),
            Some(SettingValue::InactiveDeleteScanResults(30))
        );
    }

    #[test]
    fn retention_rejects_non_numbers() {
        for raw in [json!("abc"), json!("7"), json!(null), json!([1])] {
            let result = SettingKey::InactiveDeleteScanResults.parse_value(&raw);
            assert!(result.is_err(), "expected {raw} to be rejected");
        }
    }

    #[test]
    fn with_value_preserves_metadata_and_rejects_foreign_key() {
        let setting = Setting::new(
            3,
            "Console URL",
            SettingValue::ConsoleUrl("https://old.example".to_owned()),
            "Public console address",
            true,
        );
        assert!(setting.is_ok());
        let Ok(setting) = setting else {
            return;
        };

        let updated = setting.with_value(SettingValue::ConsoleUrl("https://new.example".to_owned()));
        assert!(updated.is_ok());
        if let Ok(updated) = updated {
            assert_eq!(updated.id(), 3);
            assert_eq!(updated.label().as_str(), "Console URL");
            assert_eq!(updated.description(), "Public console address");
            assert!(updated.is_visible_on_ui());
        }

        assert!(
            setting
                .with_value(SettingValue::InactiveDeleteScanResults(1))
                .is_err()
        );
    }

    #[test]
    fn stored_value_round_trips_through_json() {
        let value = SettingValue::InactiveDeleteScanResults(14);
        let restored = SettingValue::from_stored(SettingKey::InactiveDeleteScanResults, &value.to_json());
        assert_eq!(restored.ok(), Some(value));
    }
}
