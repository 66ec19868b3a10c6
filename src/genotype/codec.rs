//! Tagged string form of genotypes.
//!
//! A genotype is written as a single element:
//!
//! ```text
//! <Genotype type="IntegerVector" size="3">4;0;7</Genotype>
//! ```
//!
//! The `type` attribute is checked against the expected representation when
//! present, and `size` is checked against the number of decoded elements.
//! Content is representation-specific (see each genotype's
//! [`encode_content`](super::Genotype::encode_content)). The element can be
//! embedded in any outer format; only this element is parsed here.

use super::Genotype;
use crate::error::{Error, Result};
use std::fmt::Display;
use std::str::FromStr;

const TAG: &str = "Genotype";

/// A parsed, not yet interpreted, genotype element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    /// Value of the `type` attribute, if any.
    pub type_name: Option<&'a str>,
    /// Value of the `size` attribute, if any.
    pub size: Option<usize>,
    /// Raw text between the opening and closing tags, trimmed.
    pub content: &'a str,
}

/// Writes `genotype` as a tagged element.
pub fn encode<G: Genotype>(genotype: &G) -> String {
    format!(
        r#"<{TAG} type="{}" size="{}">{}</{TAG}>"#,
        G::TYPE_NAME,
        genotype.len(),
        genotype.encode_content()
    )
}

/// Reads a tagged element as a `G`.
///
/// # Errors
/// - [`Error::MalformedElement`] if the element structure is broken
/// - [`Error::TypeMismatch`] if `type` names another representation
/// - [`Error::MalformedContent`] if the content cannot be parsed
/// - [`Error::SizeMismatch`] if `size` disagrees with the content
pub fn decode<G: Genotype>(text: &str) -> Result<G> {
    let element = parse_element(text)?;
    if let Some(found) = element.type_name {
        if found != G::TYPE_NAME {
            return Err(Error::TypeMismatch {
                expected: G::TYPE_NAME.to_string(),
                found: found.to_string(),
            });
        }
    }
    let genotype = G::decode_content(element.content)?;
    if let Some(declared) = element.size {
        if declared != genotype.len() {
            return Err(Error::SizeMismatch {
                declared,
                found: genotype.len(),
            });
        }
    }
    Ok(genotype)
}

/// Splits a `<Genotype ...>content</Genotype>` element into its parts.
///
/// A self-closing `<Genotype .../>` element has empty content.
pub fn parse_element(text: &str) -> Result<Element<'_>> {
    let text = text.trim();
    let rest = text
        .strip_prefix('<')
        .and_then(|r| r.strip_prefix(TAG))
        .ok_or_else(|| Error::MalformedElement(format!("expected a <{TAG}> element")))?;
    let tag_end = rest
        .find('>')
        .ok_or_else(|| Error::MalformedElement("unterminated opening tag".into()))?;
    let (attributes, self_closing) = match rest[..tag_end].strip_suffix('/') {
        Some(attrs) => (attrs, true),
        None => (&rest[..tag_end], false),
    };
    if !attributes.is_empty() && !attributes.starts_with(char::is_whitespace) {
        return Err(Error::MalformedElement(format!("unexpected tag name `<{TAG}{attributes}>`")));
    }
    let body = &rest[tag_end + 1..];

    let content = if self_closing {
        if !body.trim().is_empty() {
            return Err(Error::MalformedElement("trailing text after element".into()));
        }
        ""
    } else {
        let closing = format!("</{TAG}>");
        body.strip_suffix(closing.as_str())
            .ok_or_else(|| Error::MalformedElement(format!("missing closing {closing}")))?
            .trim()
    };

    let mut element = Element {
        type_name: None,
        size: None,
        content,
    };
    for (name, value) in parse_attributes(attributes)? {
        match name {
            "type" => element.type_name = Some(value),
            "size" => {
                let size = value.parse().map_err(|_| {
                    Error::MalformedElement(format!("`size` is not a count: `{value}`"))
                })?;
                element.size = Some(size);
            }
            _ => {}
        }
    }
    Ok(element)
}

/// Parses `name="value"` pairs separated by whitespace.
fn parse_attributes(mut s: &str) -> Result<Vec<(&str, &str)>> {
    let mut attrs = Vec::new();
    loop {
        s = s.trim_start();
        if s.is_empty() {
            return Ok(attrs);
        }
        let eq = s
            .find('=')
            .ok_or_else(|| Error::MalformedElement(format!("attribute without value: `{s}`")))?;
        let name = s[..eq].trim();
        let after = s[eq + 1..].trim_start();
        let quoted = after
            .strip_prefix('"')
            .ok_or_else(|| Error::MalformedElement(format!("unquoted value for `{name}`")))?;
        let close = quoted
            .find('"')
            .ok_or_else(|| Error::MalformedElement(format!("unterminated value for `{name}`")))?;
        attrs.push((name, &quoted[..close]));
        s = &quoted[close + 1..];
    }
}

/// Joins items with `;`.
pub(crate) fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// Parses `;`-delimited tokens. Empty content yields no elements.
pub(crate) fn split_parse<T: FromStr>(content: &str, kind: &'static str) -> Result<Vec<T>> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(Vec::new());
    }
    content
        .split(';')
        .enumerate()
        .map(|(position, token)| {
            let token = token.trim();
            token.parse().map_err(|_| Error::MalformedContent {
                kind,
                position,
                token: token.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::{BitString, FloatVector, IntegerVector};

    #[test]
    fn test_encode_format() {
        let g = IntegerVector::from(vec![4, 0, 7]);
        assert_eq!(
            encode(&g),
            r#"<Genotype type="IntegerVector" size="3">4;0;7</Genotype>"#
        );
    }

    #[test]
    fn test_parse_element_parts() {
        let e = parse_element(r#"  <Genotype size="2" type="BitString">01</Genotype> "#).unwrap();
        assert_eq!(e.type_name, Some("BitString"));
        assert_eq!(e.size, Some(2));
        assert_eq!(e.content, "01");
    }

    #[test]
    fn test_self_closing_element() {
        let e = parse_element(r#"<Genotype type="FloatVector" size="0"/>"#).unwrap();
        assert_eq!(e.content, "");
        let g: FloatVector = decode(r#"<Genotype type="FloatVector" size="0"/>"#).unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn test_type_attribute_optional() {
        let g: BitString = decode("<Genotype>101</Genotype>").unwrap();
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn test_type_mismatch() {
        let err = decode::<FloatVector>(r#"<Genotype type="BitString" size="1">1</Genotype>"#)
            .unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "FloatVector".into(),
                found: "BitString".into()
            }
        );
    }

    #[test]
    fn test_size_mismatch() {
        let err = decode::<IntegerVector>(r#"<Genotype type="IntegerVector" size="4">1;2;3</Genotype>"#)
            .unwrap_err();
        assert_eq!(err, Error::SizeMismatch { declared: 4, found: 3 });
    }

    #[test]
    fn test_malformed_structure() {
        for text in [
            "Genotype>1</Genotype>",
            "<Genotype type=\"BitString\">1",
            "<Genotype type=BitString>1</Genotype>",
            "<Genotypes>1</Genotypes>",
            "<Genotype size=\"x\">1</Genotype>",
            "<Genotype type=\"BitString\"",
        ] {
            let err = decode::<BitString>(text).unwrap_err();
            assert!(err.is_io(), "{text} should be an I/O error, got {err:?}");
        }
    }

    #[test]
    fn test_malformed_content_reports_position() {
        let err = decode::<IntegerVector>("<Genotype>1;x;3</Genotype>").unwrap_err();
        assert_eq!(
            err,
            Error::MalformedContent {
                kind: "integer",
                position: 1,
                token: "x".into()
            }
        );
    }

    #[test]
    fn test_split_parse_empty() {
        let v: Vec<i64> = split_parse("  ", "integer").unwrap();
        assert!(v.is_empty());
    }
}
