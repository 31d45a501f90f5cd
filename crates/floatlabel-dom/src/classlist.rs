//! DOMTokenList (classList)
//!
//! Ordered set of class tokens backing an element's `class` attribute.

/// DOMTokenList for managing space-separated tokens (e.g., classList)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a space-separated attribute value, dropping duplicates
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_ascii_whitespace() {
            list.add(token);
        }
        list
    }

    /// Number of tokens
    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token. Returns true if the list changed.
    ///
    /// Empty tokens and tokens containing whitespace are ignored.
    pub fn add(&mut self, token: &str) -> bool {
        if !is_valid_token(token) || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token. Returns true if the list changed.
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let present = self.contains(token);
        match force.unwrap_or(!present) {
            true => {
                self.add(token);
                self.contains(token)
            }
            false => {
                self.remove(token);
                false
            }
        }
    }

    /// Replace `old_token` with `new_token` in place
    pub fn replace(&mut self, old_token: &str, new_token: &str) -> bool {
        if !is_valid_token(new_token) {
            return false;
        }
        let Some(pos) = self.tokens.iter().position(|t| t == old_token) else {
            return false;
        };
        if self.contains(new_token) {
            self.tokens.remove(pos);
        } else {
            self.tokens[pos] = new_token.to_string();
        }
        true
    }

    /// Serialized attribute value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(|c| c.is_ascii_whitespace())
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string_dedups() {
        let list = DOMTokenList::from_string("  field  floating field ");
        assert_eq!(list.length(), 2);
        assert_eq!(list.value(), "field floating");
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut list = DOMTokenList::new();
        assert!(list.add("floating"));
        assert!(!list.add("floating"));
        assert_eq!(list.length(), 1);
    }

    #[test]
    fn test_rejects_invalid_tokens() {
        let mut list = DOMTokenList::new();
        assert!(!list.add(""));
        assert!(!list.add("two words"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut list = DOMTokenList::from_string("a b");
        assert!(!list.remove("c"));
        assert!(list.remove("a"));
        assert_eq!(list.value(), "b");
    }

    #[test]
    fn test_toggle() {
        let mut list = DOMTokenList::new();

        assert!(list.toggle("active", None));
        assert!(list.contains("active"));

        assert!(!list.toggle("active", None));
        assert!(!list.contains("active"));

        assert!(list.toggle("active", Some(true)));
        assert!(list.toggle("active", Some(true)));
        assert_eq!(list.length(), 1);
    }

    #[test]
    fn test_replace() {
        let mut list = DOMTokenList::from_string("old-class other");

        assert!(list.replace("old-class", "new-class"));
        assert_eq!(list.value(), "new-class other");
        assert!(list.replace("new-class", "other"));
        assert_eq!(list.value(), "other");
        assert!(!list.replace("missing", "x"));
    }
}
