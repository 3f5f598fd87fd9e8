use thiserror::Error;

/// Why a search box entry was rejected before any lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("City name cannot contain numbers.\nPlease Try Again.")]
    ContainsDigits,

    #[error("City name cannot contain special characters.\nPlease Try Again.")]
    SpecialCharacters,

    #[error("Please enter at least 2 characters")]
    TooShort,
}

/// Trims `input` and checks it looks like a city name: ASCII letters,
/// whitespace and hyphens, at least two characters.
pub fn validate_city(input: &str) -> Result<&str, QueryError> {
    let city = input.trim();

    if city.chars().any(|c| c.is_ascii_digit()) {
        return Err(QueryError::ContainsDigits);
    }
    if city.chars().any(|c| !(c.is_ascii_alphabetic() || c.is_whitespace() || c == '-')) {
        return Err(QueryError::SpecialCharacters);
    }
    if city.chars().count() < 2 {
        return Err(QueryError::TooShort);
    }

    Ok(city)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_plain_names() {
        assert_eq!(validate_city("  Paris "), Ok("Paris"));
        assert_eq!(validate_city("Stratford-upon-Avon"), Ok("Stratford-upon-Avon"));
        assert_eq!(validate_city("New York"), Ok("New York"));
    }

    #[test]
    fn digits_are_checked_first() {
        assert_eq!(validate_city("Paris 2!"), Err(QueryError::ContainsDigits));
    }

    #[test]
    fn rejects_punctuation_and_non_ascii() {
        assert_eq!(validate_city("St. Louis"), Err(QueryError::SpecialCharacters));
        assert_eq!(validate_city("Zürich"), Err(QueryError::SpecialCharacters));
    }

    #[test]
    fn rejects_short_input() {
        assert_eq!(validate_city(" a "), Err(QueryError::TooShort));
        assert_eq!(validate_city(""), Err(QueryError::TooShort));
    }
}
