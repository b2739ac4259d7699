use serde::{Deserialize, Serialize};

/// Languages the sandbox can run, keyed by the sandbox's numeric language id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Cpp,
    Java,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::JavaScript,
        Language::Python,
        Language::Cpp,
        Language::Java,
    ];

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|language| language.id() == id)
    }

    pub fn id(self) -> i32 {
        match self {
            Language::JavaScript => 63,
            Language::Python => 71,
            Language::Cpp => 54,
            Language::Java => 62,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Java => "java",
        }
    }

    pub fn is_statically_typed(self) -> bool {
        matches!(self, Language::Cpp | Language::Java)
    }
}

#[cfg(test)]
mod tests {
    use super::Language;

    #[test]
    fn ids_roundtrip() {
        for language in Language::ALL {
            assert_eq!(Language::from_id(language.id()), Some(language));
        }
    }

    #[test]
    fn unknown_id_is_unsupported() {
        assert_eq!(Language::from_id(73), None);
        assert_eq!(Language::from_id(-1), None);
    }
}
