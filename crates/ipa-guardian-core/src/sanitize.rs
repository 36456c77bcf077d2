// Repairs for known quirks in generated JSON
use std::borrow::Cow;

const QUOTED_NULL: &str = "\"null\"";

/// Rewrite every quoted `"null"` to the JSON literal `null`
///
/// The threat-scan responses sometimes encode an absent `threat_name` as the
/// string `"null"`. The rewrite is purely textual, so a string value that is
/// exactly `null` (an engine named "null", say) is rewritten too.
pub fn repair_quoted_nulls(text: &str) -> Cow<'_, str> {
    if text.contains(QUOTED_NULL) {
        Cow::Owned(text.replace(QUOTED_NULL, "null"))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repairs_quoted_null() {
        let raw = r#"{"engine":"iSecure","result":"clean","threat_name":"null"}"#;
        assert_eq!(
            repair_quoted_nulls(raw),
            r#"{"engine":"iSecure","result":"clean","threat_name":null}"#
        );
    }

    #[test]
    fn test_repairs_every_occurrence() {
        let raw = r#"[{"threat_name":"null"},{"threat_name":"Trojan.Clicker.iOS"},{"threat_name":"null"}]"#;
        assert_eq!(
            repair_quoted_nulls(raw),
            r#"[{"threat_name":null},{"threat_name":"Trojan.Clicker.iOS"},{"threat_name":null}]"#
        );
    }

    #[test]
    fn test_clean_text_is_borrowed_unchanged() {
        let raw = r#"{"engine":"AvastPro","result":"clean","threat_name":null}"#;
        let repaired = repair_quoted_nulls(raw);
        assert!(matches!(repaired, Cow::Borrowed(_)));
        assert_eq!(repaired, raw);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let raw = r#"{"threat_name":"null"}"#;
        let once = repair_quoted_nulls(raw).into_owned();
        let twice = repair_quoted_nulls(&once);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_unquoted_or_embedded_null_untouched() {
        let raw = r#"{"threat_name":"Adware.nullsoft","note":"not null"}"#;
        assert_eq!(repair_quoted_nulls(raw), raw);
    }

    #[test]
    fn test_engine_named_null_is_rewritten() {
        // Known edge case: a legitimate string value of exactly "null" is not preserved.
        let raw = r#"{"engine":"null","result":"clean","threat_name":null}"#;
        assert_eq!(
            repair_quoted_nulls(raw),
            r#"{"engine":null,"result":"clean","threat_name":null}"#
        );
    }
}
