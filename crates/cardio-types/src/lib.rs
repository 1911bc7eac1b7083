//! Validated identifier types shared by the cardio crates.
//!
//! Symptom and diagnosis identifiers are opaque strings as far as the inference core is
//! concerned. The only guarantee these types give is that the identifier is non-empty once
//! surrounding whitespace has been trimmed. Identifiers are compared case-sensitively, so
//! `Fatiga` and `fatiga` are different symptoms.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(NonEmptyText);

        impl $name {
            /// Validates and wraps an identifier.
            pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
                NonEmptyText::new(input).map(Self)
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::str::FromStr for $name {
            type Err = TextError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

identifier!(
    /// Identifier of a symptom, e.g. `dolor_pecho`.
    SymptomId
);

identifier!(
    /// Identifier of a diagnosis, e.g. `angina` or `Exceso de colesterol`.
    ///
    /// Diagnosis identifiers may contain interior spaces; only the ends are trimmed.
    DiagnosisId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  dolor_pecho \n").unwrap();
        assert_eq!(text.as_str(), "dolor_pecho");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
        assert!(matches!(NonEmptyText::new(""), Err(TextError::Empty)));
    }

    #[test]
    fn test_diagnosis_id_keeps_interior_spaces() {
        let id = DiagnosisId::new(" Exceso de colesterol ").unwrap();
        assert_eq!(id.as_str(), "Exceso de colesterol");
    }

    #[test]
    fn test_symptom_ids_are_case_sensitive() {
        let upper = SymptomId::new("Fatiga").unwrap();
        let lower = SymptomId::new("fatiga").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_identifier_serializes_as_plain_string() {
        let id = SymptomId::new("mareo").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"mareo\"");

        let parsed: SymptomId = serde_json::from_str("\"mareo\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_identifier_deserialize_rejects_blank() {
        let result: Result<DiagnosisId, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
