//! Document categories.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category of a document.
///
/// Parsed from the second `_`-separated segment of the object file name.
/// Tokens outside the built-in set are kept verbatim as [`Category::Custom`]
/// so that listing never rejects or rewrites what it finds in storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Bank statements, invoices, tax returns.
    Financial,
    /// Prescriptions, lab results, medical records.
    Medical,
    /// Contracts, agreements, court papers.
    Legal,
    /// Diplomas, transcripts, certificates, resumes.
    Education,
    /// Passports, ID cards, licenses.
    Identity,
    /// Policies and claims.
    Insurance,
    /// Deeds, leases, mortgages.
    Property,
    /// Payslips, offer letters, employment contracts.
    Employment,
    /// Tickets, itineraries, visas.
    Travel,
    /// Anything personal that fits nowhere else.
    Personal,
    /// Biometric-gated documents under the `private/` prefix.
    Private,
    /// Fallback when no category can be parsed.
    Other,
    /// A token outside the built-in set.
    Custom(String),
}

impl Category {
    /// The built-in categories, in display order.
    pub const BUILT_IN: &'static [Category] = &[
        Category::Financial,
        Category::Medical,
        Category::Legal,
        Category::Education,
        Category::Identity,
        Category::Insurance,
        Category::Property,
        Category::Employment,
        Category::Travel,
        Category::Personal,
        Category::Private,
        Category::Other,
    ];

    /// Parse a category token. Never fails: empty tokens become
    /// [`Category::Other`], unknown tokens become [`Category::Custom`].
    pub fn parse(token: &str) -> Self {
        let trimmed = token.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "other" => Self::Other,
            "financial" => Self::Financial,
            "medical" => Self::Medical,
            "legal" => Self::Legal,
            "education" => Self::Education,
            "identity" => Self::Identity,
            "insurance" => Self::Insurance,
            "property" => Self::Property,
            "employment" => Self::Employment,
            "travel" => Self::Travel,
            "personal" => Self::Personal,
            "private" => Self::Private,
            _ => Self::Custom(trimmed.to_string()),
        }
    }

    /// The canonical token.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Financial => "financial",
            Self::Medical => "medical",
            Self::Legal => "legal",
            Self::Education => "education",
            Self::Identity => "identity",
            Self::Insurance => "insurance",
            Self::Property => "property",
            Self::Employment => "employment",
            Self::Travel => "travel",
            Self::Personal => "personal",
            Self::Private => "private",
            Self::Other => "other",
            Self::Custom(token) => token,
        }
    }

    /// Token as written into an object key. Underscores would break
    /// file-name segmentation, so they become hyphens.
    pub fn path_token(&self) -> String {
        self.as_str().replace('_', "-")
    }

    /// Whether this is the private category.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private)
    }

    /// Whether this is the fallback category.
    pub fn is_other(&self) -> bool {
        matches!(self, Self::Other)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::parse(&token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tokens_case_insensitively() {
        assert_eq!(Category::parse("financial"), Category::Financial);
        assert_eq!(Category::parse("Medical"), Category::Medical);
        assert_eq!(Category::parse(""), Category::Other);
    }

    #[test]
    fn test_unknown_token_is_preserved() {
        let category = Category::parse("receipts");
        assert_eq!(category, Category::Custom("receipts".to_string()));
        assert_eq!(category.as_str(), "receipts");
    }

    #[test]
    fn test_path_token_replaces_underscores() {
        let category = Category::parse("tax_docs");
        assert_eq!(category.path_token(), "tax-docs");
        assert_eq!(Category::Legal.path_token(), "legal");
    }

    #[test]
    fn test_serde_uses_token() {
        let json = serde_json::to_string(&Category::Insurance).unwrap();
        assert_eq!(json, "\"insurance\"");
        let parsed: Category = serde_json::from_str("\"warranty\"").unwrap();
        assert_eq!(parsed, Category::Custom("warranty".to_string()));
    }
}
