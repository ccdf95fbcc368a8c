use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    MissingSeparator(String),

    #[error("Key cannot be empty in '{0}'.")]
    EmptyKey(String),

    #[error("Invalid {kind} value for {key}: '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        kind: &'static str,
    },
}

/// Splits a `-S KEY=VALUE` override at the first `=`. Both sides are trimmed.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(pair.to_string()));
    }
    Ok((key, value.trim()))
}

/// Parses the value of an override, naming the expected kind on failure.
pub fn parse_value<T: FromStr>(key: &str, value: &str, kind: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_equals_sign() {
        assert_eq!(parse_key_value("conformer.seed=7"), Ok(("conformer.seed", "7")));
        assert_eq!(
            parse_key_value(" output.root = a=b "),
            Ok(("output.root", "a=b"))
        );
        assert_eq!(parse_key_value("converter.java="), Ok(("converter.java", "")));
    }

    #[test]
    fn rejects_pairs_without_key_or_separator() {
        assert_eq!(
            parse_key_value("conformer.seed"),
            Err(ParseError::MissingSeparator("conformer.seed".to_string()))
        );
        assert_eq!(
            parse_key_value("=7"),
            Err(ParseError::EmptyKey("=7".to_string()))
        );
    }

    #[test]
    fn parse_value_reports_kind() {
        assert_eq!(parse_value::<u32>("depiction.width", "640", "integer"), Ok(640));
        let err = parse_value::<u32>("depiction.width", "wide", "integer").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid integer value for depiction.width: 'wide'"
        );
    }
}
