use serde::{Deserialize, Deserializer};

/// Deserializes a field that distinguishes "omitted" from an explicit `null`.
///
/// Pair with `#[serde(default)]`: an absent field stays `None`, `null` becomes
/// `Some(None)` and a value becomes `Some(Some(value))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims `value`, mapping blank input to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::{non_blank, nullable};

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        consultant: Option<Option<String>>,
    }

    #[test]
    fn distinguishes_omitted_null_and_value() {
        let omitted: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(omitted.consultant, None);

        let null: Patch = serde_json::from_str(r#"{"consultant": null}"#).unwrap();
        assert_eq!(null.consultant, Some(None));

        let value: Patch = serde_json::from_str(r#"{"consultant": "Perera"}"#).unwrap();
        assert_eq!(value.consultant, Some(Some("Perera".to_string())));
    }

    #[test]
    fn non_blank_trims_and_drops_empty() {
        assert_eq!(non_blank(Some("  DOT 1223 ".into())), Some("DOT 1223".into()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }
}
