use serde::{Deserialize, Deserializer};

// clients send an empty searchTerm when the search box is cleared,
// treat it the same as a missing one
pub fn deserialize_non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize_non_empty_string")]
        term: Option<String>,
    }

    fn term(json: &str) -> Option<String> {
        serde_json::from_str::<Body>(json).unwrap().term
    }

    #[test]
    fn empty_and_missing_are_none() {
        assert_eq!(term(r#"{}"#), None);
        assert_eq!(term(r#"{"term": null}"#), None);
        assert_eq!(term(r#"{"term": ""}"#), None);
    }

    #[test]
    fn text_is_kept_verbatim() {
        assert_eq!(term(r#"{"term": " title "}"#).as_deref(), Some(" title "));
    }

    #[test]
    fn non_string_is_rejected() {
        assert!(serde_json::from_str::<Body>(r#"{"term": 5}"#).is_err());
    }
}
