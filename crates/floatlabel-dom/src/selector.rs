//! Selectors
//!
//! The subset of CSS selectors needed to find form controls and their labels:
//! selector lists of compound selectors built from type, universal, id,
//! class and attribute (`[name]`, `[name="value"]`) components.

use std::iter::Peekable;
use std::str::Chars;

use crate::{DomError, DomResult, ElementData};

/// Attribute component of a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatch {
    /// `[name]`
    Exists(String),
    /// `[name="value"]`
    Equals(String, String),
}

impl AttributeMatch {
    fn matches(&self, elem: &ElementData) -> bool {
        match self {
            Self::Exists(name) => elem.has_attr(name),
            Self::Equals(name, value) => elem.get_attr(name).is_some_and(|actual| {
                if CASE_INSENSITIVE_VALUES.contains(&name.as_str()) {
                    actual.eq_ignore_ascii_case(value)
                } else {
                    actual == value
                }
            }),
        }
    }
}

/// Attributes whose values HTML documents match ASCII case-insensitively
const CASE_INSENSITIVE_VALUES: &[&str] = &["dir", "method", "type"];

/// A sequence of simple selectors that must all match one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeMatch>,
}

impl CompoundSelector {
    pub fn matches(&self, elem: &ElementData) -> bool {
        self.tag.as_deref().is_none_or(|tag| elem.is(tag))
            && self.id.as_deref().is_none_or(|id| elem.id() == Some(id))
            && self.classes.iter().all(|c| elem.has_class(c))
            && self.attributes.iter().all(|a| a.matches(elem))
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty()
    }
}

/// Selector list; matches if any compound selector matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<CompoundSelector>,
}

impl Selector {
    /// Parse a selector list such as `input[type="text"], textarea`
    pub fn parse(source: &str) -> DomResult<Self> {
        let mut compounds = Vec::new();
        for part in source.split(',') {
            compounds.push(parse_compound(source, part.trim())?);
        }
        Ok(Self { compounds })
    }

    /// `tag[name="value"]` without going through the parser, so `value`
    /// needs no quoting
    pub fn attribute_equals(tag: &str, name: &str, value: &str) -> Self {
        Self {
            compounds: vec![CompoundSelector {
                tag: Some(tag.to_ascii_lowercase()),
                attributes: vec![AttributeMatch::Equals(name.to_ascii_lowercase(), value.to_string())],
                ..Default::default()
            }],
        }
    }

    /// Selector list from already-built compound selectors
    pub fn from_compounds(compounds: Vec<CompoundSelector>) -> Self {
        Self { compounds }
    }

    pub fn compounds(&self) -> &[CompoundSelector] {
        &self.compounds
    }

    pub fn matches(&self, elem: &ElementData) -> bool {
        self.compounds.iter().any(|c| c.matches(elem))
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn invalid(source: &str, reason: impl Into<String>) -> DomError {
    DomError::InvalidSelector {
        selector: source.to_string(),
        reason: reason.into(),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn parse_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn parse_compound(source: &str, part: &str) -> DomResult<CompoundSelector> {
    if part.is_empty() {
        return Err(invalid(source, "empty selector in list"));
    }

    let mut compound = CompoundSelector::default();
    let mut universal = false;
    let mut chars = part.chars().peekable();

    if chars.peek() == Some(&'*') {
        chars.next();
        universal = true;
    } else if chars.peek().is_some_and(|&c| is_ident_char(c)) {
        compound.tag = Some(parse_ident(&mut chars).to_ascii_lowercase());
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => {
                let id = parse_ident(&mut chars);
                if id.is_empty() {
                    return Err(invalid(source, "expected identifier after `#`"));
                }
                compound.id = Some(id);
            }
            '.' => {
                let class = parse_ident(&mut chars);
                if class.is_empty() {
                    return Err(invalid(source, "expected identifier after `.`"));
                }
                compound.classes.push(class);
            }
            '[' => compound.attributes.push(parse_attribute(source, &mut chars)?),
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                return Err(invalid(source, "combinators are not supported"));
            }
            other => return Err(invalid(source, format!("unexpected `{other}`"))),
        }
    }

    if compound.is_empty() && !universal {
        return Err(invalid(source, "empty compound selector"));
    }
    Ok(compound)
}

fn parse_attribute(source: &str, chars: &mut Peekable<Chars<'_>>) -> DomResult<AttributeMatch> {
    skip_whitespace(chars);
    let name = parse_ident(chars).to_ascii_lowercase();
    if name.is_empty() {
        return Err(invalid(source, "expected attribute name"));
    }
    skip_whitespace(chars);

    match chars.next() {
        Some(']') => Ok(AttributeMatch::Exists(name)),
        Some('=') => {
            skip_whitespace(chars);
            let value = match chars.peek().copied() {
                Some(quote @ ('"' | '\'')) => {
                    chars.next();
                    parse_quoted(source, chars, quote)?
                }
                _ => parse_ident(chars),
            };
            skip_whitespace(chars);
            match chars.next() {
                Some(']') => Ok(AttributeMatch::Equals(name, value)),
                _ => Err(invalid(source, "expected `]`")),
            }
        }
        _ => Err(invalid(source, "unsupported attribute operator")),
    }
}

fn parse_quoted(source: &str, chars: &mut Peekable<Chars<'_>>, quote: char) -> DomResult<String> {
    let mut value = String::new();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some(escaped) => value.push(escaped),
                None => return Err(invalid(source, "dangling escape")),
            },
            Some(c) if c == quote => return Ok(value),
            Some(c) => value.push(c),
            None => return Err(invalid(source, "unterminated string")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(ty: &str) -> ElementData {
        let mut elem = ElementData::new("input");
        elem.set_attr("type", ty);
        elem
    }

    #[test]
    fn test_parse_selector_list() {
        let sel = Selector::parse(r#"input[type="text"], input[type='email'], textarea"#).unwrap();
        assert_eq!(sel.compounds().len(), 3);
        assert_eq!(
            sel.compounds()[1].attributes,
            vec![AttributeMatch::Equals("type".into(), "email".into())]
        );
        assert_eq!(sel.compounds()[2].tag.as_deref(), Some("textarea"));
    }

    #[test]
    fn test_attribute_value_match() {
        let sel = Selector::parse(r#"input[type="text"]"#).unwrap();
        assert!(sel.matches(&input("text")));
        assert!(!sel.matches(&input("checkbox")));
        assert!(!sel.matches(&ElementData::new("textarea")));
    }

    #[test]
    fn test_type_value_case_insensitive() {
        let sel = Selector::parse(r#"input[type="text"]"#).unwrap();
        assert!(sel.matches(&input("TEXT")));

        let for_sel = Selector::parse(r#"label[for="Email"]"#).unwrap();
        let mut label = ElementData::new("label");
        label.set_attr("for", "email");
        assert!(!for_sel.matches(&label));
    }

    #[test]
    fn test_id_class_and_existence() {
        let mut elem = ElementData::new("label");
        elem.set_attr("id", "l1");
        elem.set_attr("class", "field floating");
        elem.set_attr("for", "email");

        assert!(Selector::parse("label#l1.floating[for]").unwrap().matches(&elem));
        assert!(Selector::parse("*.field").unwrap().matches(&elem));
        assert!(!Selector::parse(".field.missing").unwrap().matches(&elem));
        assert!(Selector::parse("label[for=email]").unwrap().matches(&elem));
    }

    #[test]
    fn test_escaped_quotes() {
        let sel = Selector::parse(r#"label[for="a\"b"]"#).unwrap();
        let mut elem = ElementData::new("label");
        elem.set_attr("for", "a\"b");
        assert!(sel.matches(&elem));
    }

    #[test]
    fn test_attribute_equals_needs_no_escaping() {
        let sel = Selector::attribute_equals("label", "for", "we\"ird] id");
        let mut elem = ElementData::new("label");
        elem.set_attr("for", "we\"ird] id");
        assert!(sel.matches(&elem));
    }

    #[test]
    fn test_rejects_combinators_and_garbage() {
        assert!(matches!(Selector::parse("form input"), Err(DomError::InvalidSelector { .. })));
        assert!(Selector::parse("form > input").is_err());
        assert!(Selector::parse("input,").is_err());
        assert!(Selector::parse("input[type=\"text]").is_err());
        assert!(Selector::parse("input[type~=text]").is_err());
        assert!(Selector::parse("#").is_err());
    }
}
