//! Caller-supplied substitution values

/// Values substituted into positional placeholders
///
/// A single value behaves exactly like a one-element list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitutions {
    /// One value
    Single(String),
    /// Ordered values, addressed as `$1`, `$2`, ...
    List(Vec<String>),
}

impl Substitutions {
    /// The values as an ordered list
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether no values were supplied
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<&str> for Substitutions {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for Substitutions {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for Substitutions {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for Substitutions {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Substitutions {
    fn from(values: &[&str]) -> Self {
        Self::List(values.iter().map(|v| (*v).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Substitutions {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.iter().map(|v| (*v).to_string()).collect())
    }
}
