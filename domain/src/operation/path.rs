//! REST path templates
//!
//! Templates look like
//! `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/...`.
//! Placeholders are substituted from validated arguments; every substituted
//! value is percent-encoded and `.`/`..` are refused, so a caller-supplied
//! identifier can never change the shape of the path.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::core::error::DomainError;

/// Everything except RFC 3986 unreserved characters
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param(String),
}

/// A parsed path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    tokens: Vec<Token>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self, DomainError> {
        let invalid = |message: &str| DomainError::InvalidPathTemplate {
            template: template.to_string(),
            message: message.to_string(),
        };

        if !template.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut tokens = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            let literal = &rest[..open];
            if literal.contains('}') {
                return Err(invalid("unmatched '}'"));
            }
            if !literal.is_empty() {
                tokens.push(Token::Literal(literal.to_string()));
            }

            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
            let name = &after[..close];
            if name.is_empty() || name.contains('{') || name.contains('/') {
                return Err(invalid("placeholder names must be non-empty identifiers"));
            }
            tokens.push(Token::Param(name.to_string()));
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(invalid("unmatched '}'"));
        }
        if !rest.is_empty() {
            tokens.push(Token::Literal(rest.to_string()));
        }

        Ok(Self {
            source: template.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names, in the order they appear
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Param(name) => Some(name.as_str()),
            Token::Literal(_) => None,
        })
    }

    /// Substitute every placeholder from `args`
    ///
    /// Strings and integers are accepted; anything else is a binding error
    /// because the catalog declared a path parameter with a non-scalar schema.
    pub fn resolve(&self, args: &Value) -> Result<String, DomainError> {
        let mut path = String::with_capacity(self.source.len() + 64);
        for token in &self.tokens {
            match token {
                Token::Literal(text) => path.push_str(text),
                Token::Param(name) => {
                    let raw = scalar_arg(args, name)?
                        .ok_or_else(|| DomainError::MissingPathParameter(name.clone()))?;
                    // URL parsers collapse these, silently retargeting the request
                    if raw == "." || raw == ".." {
                        return Err(DomainError::DotSegmentPathParameter {
                            name: name.clone(),
                            value: raw,
                        });
                    }
                    path.push_str(&encode(&raw));
                }
            }
        }
        Ok(path)
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Percent-encode a single path segment or query component
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Read a scalar argument as text; `Ok(None)` when absent or null
pub(crate) fn scalar_arg(args: &Value, name: &str) -> Result<Option<String>, DomainError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(DomainError::InvalidPathParameter {
            name: name.to_string(),
            found: match other {
                Value::Array(_) => "array",
                Value::Object(_) => "object",
                _ => "number",
            }
            .to_string(),
        }),
    }
}
