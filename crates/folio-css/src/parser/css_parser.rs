//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//!
//! Unlike the error-recovering algorithms of the specification, this parser
//! is strict: every point where CSS Syntax says "this is a parse error" fails
//! the whole parse with a [`ParseError`]. At-rules are consumed and dropped.

use thiserror::Error;

use crate::tokenizer::{CSSToken, CSSTokenizer, TokenizerError};

/// Why a piece of CSS text was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The tokenizer hit a parse error (unterminated comment, string or url).
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
    /// A string token contained an unescaped newline.
    #[error("malformed string")]
    BadString,
    /// A `url(...)` token was malformed.
    #[error("malformed url")]
    BadUrl,
    /// A rule prelude reached the end of input without a `{`.
    #[error("missing '{{' after \"{prelude}\"")]
    MissingBlock {
        /// The prelude text read so far.
        prelude: String,
    },
    /// A block, function or bracket was never closed.
    #[error("missing '{expected}'")]
    Unclosed {
        /// The closing character that was expected.
        expected: char,
    },
    /// A `}` appeared with no open block.
    #[error("unexpected '}}'")]
    StrayClosingBrace,
    /// A selector list contained an empty entry, e.g. `p, { }`.
    #[error("empty selector")]
    EmptySelector,
    /// A declaration name was not followed by `:`.
    #[error("missing ':' after \"{property}\"")]
    MissingColon {
        /// The declaration's property name.
        property: String,
    },
    /// Something other than a declaration appeared in a declaration list.
    #[error("unexpected {found} in declaration list")]
    UnexpectedToken {
        /// Display form of the offending token.
        found: String,
    },
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name, as written.
    pub name: String,
    /// The property value as component values, without `!important`.
    pub value: Vec<ComponentValue>,
    /// Whether the declaration had `!important`.
    pub important: bool,
}

impl Declaration {
    /// The value serialized back to CSS text, trimmed.
    #[must_use]
    pub fn value_text(&self) -> String {
        serialize(&self.value).trim().to_string()
    }
}

/// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token.
    Token(CSSToken),
    /// A function with its contents.
    Function {
        /// The function name.
        name: String,
        /// The function arguments.
        value: Vec<ComponentValue>,
    },
    /// A simple block.
    Block {
        /// The opening token character.
        token: char,
        /// The block contents.
        value: Vec<ComponentValue>,
    },
}

impl ComponentValue {
    fn write_css(&self, out: &mut String) {
        match self {
            Self::Token(CSSToken::Whitespace) => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            Self::Token(token) => token.write_css(out),
            Self::Function { name, value } => {
                out.push_str(name);
                out.push('(');
                write_all(value, out);
                out.push(')');
            }
            Self::Block { token, value } => {
                out.push(*token);
                write_all(value, out);
                out.push(closing_char(*token));
            }
        }
    }
}

fn write_all(values: &[ComponentValue], out: &mut String) {
    for value in values {
        value.write_css(out);
    }
}

/// [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
///
/// Serialize component values back to CSS text. Runs of whitespace become a
/// single space.
#[must_use]
pub fn serialize(values: &[ComponentValue]) -> String {
    let mut out = String::new();
    write_all(values, &mut out);
    out
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A CSS style rule (selector list + declarations).
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// The selector list, each entry serialized and trimmed.
    pub selectors: Vec<String>,
    /// The declarations in this rule block, in source order.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed CSS stylesheet (style rules only).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    /// The style rules in source order.
    pub rules: Vec<StyleRule>,
}

/// Tokenize and parse a full style sheet.
///
/// # Errors
///
/// Returns the first [`ParseError`] found in `css`.
pub fn parse_css(css: &str) -> Result<Stylesheet, ParseError> {
    CSSParser::from_text(css)?.parse_stylesheet()
}

/// Tokenize and parse the contents of a `style` attribute.
///
/// # Errors
///
/// Returns the first [`ParseError`] found in `css`.
pub fn parse_declarations(css: &str) -> Result<Vec<Declaration>, ParseError> {
    CSSParser::from_text(css)?.parse_declaration_list()
}

/// Strict CSS parser over a token list.
pub struct CSSParser {
    tokens: Vec<CSSToken>,
    position: usize,
}

impl CSSParser {
    /// Create a new parser from a list of tokens.
    #[must_use]
    pub const fn new(tokens: Vec<CSSToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Tokenize `css` and build a parser over the result.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Tokenizer`] if the tokenizer reported a parse error.
    pub fn from_text(css: &str) -> Result<Self, ParseError> {
        let mut tokenizer = CSSTokenizer::new(css);
        tokenizer.run();
        if let Some(&error) = tokenizer.errors().first() {
            return Err(error.into());
        }
        Ok(Self::new(tokenizer.into_tokens()))
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] at the first malformed rule.
    pub fn parse_stylesheet(&mut self) -> Result<Stylesheet, ParseError> {
        let mut rules = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>": "Do nothing."
                // "<CDO-token>, <CDC-token>": "If the top-level flag is set, do nothing."
                CSSToken::Whitespace | CSSToken::CDO | CSSToken::CDC => self.advance(),

                CSSToken::EOF => return Ok(Stylesheet { rules }),

                CSSToken::RightBrace => return Err(ParseError::StrayClosingBrace),

                // "<at-keyword-token>": "Consume an at-rule."
                CSSToken::AtKeyword(_) => self.consume_at_rule()?,

                // "anything else": "Consume a qualified rule."
                _ => rules.push(self.consume_qualified_rule()?),
            }
        }
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// Parse declarations from a style attribute or similar.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] at the first malformed declaration.
    pub fn parse_declaration_list(&mut self) -> Result<Vec<Declaration>, ParseError> {
        self.consume_list_of_declarations(false)
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// The at-rule is validated and discarded.
    fn consume_at_rule(&mut self) -> Result<(), ParseError> {
        self.advance(); // at-keyword

        loop {
            match self.peek() {
                // "<semicolon-token>": "Return the at-rule."
                // "<EOF-token>": "This is a parse error. Return the at-rule."
                CSSToken::Semicolon | CSSToken::EOF => {
                    self.advance();
                    return Ok(());
                }
                // "<{-token>": "Consume a simple block and assign it to the at-rule's block."
                CSSToken::LeftBrace => {
                    let _ = self.consume_component_value()?;
                    return Ok(());
                }
                CSSToken::RightBrace => return Err(ParseError::StrayClosingBrace),
                _ => {
                    let _ = self.consume_component_value()?;
                }
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Result<StyleRule, ParseError> {
        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                // "<EOF-token>": "This is a parse error. Return nothing."
                CSSToken::EOF => {
                    return Err(ParseError::MissingBlock {
                        prelude: serialize(&prelude).trim().to_string(),
                    });
                }
                CSSToken::RightBrace => return Err(ParseError::StrayClosingBrace),
                CSSToken::LeftBrace => break,
                _ => prelude.push(self.consume_component_value()?),
            }
        }

        // [Selectors § 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
        // "A selector list is a comma-separated list of selectors"
        let selectors = split_selector_list(&prelude)?;

        self.advance(); // {
        let declarations = self.consume_list_of_declarations(true)?;
        self.advance(); // }

        Ok(StyleRule {
            selectors,
            declarations,
        })
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// With `in_block` set, the list must end at a `}` (left unconsumed);
    /// otherwise it runs to EOF.
    fn consume_list_of_declarations(
        &mut self,
        in_block: bool,
    ) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                CSSToken::Whitespace | CSSToken::Semicolon => self.advance(),

                CSSToken::EOF if in_block => return Err(ParseError::Unclosed { expected: '}' }),
                CSSToken::RightBrace if !in_block => return Err(ParseError::StrayClosingBrace),
                CSSToken::EOF | CSSToken::RightBrace => return Ok(declarations),

                CSSToken::AtKeyword(_) => self.consume_at_rule()?,

                CSSToken::Ident(_) => declarations.push(self.consume_declaration()?),

                // "anything else": "This is a parse error."
                other => {
                    return Err(ParseError::UnexpectedToken {
                        found: other.to_string(),
                    });
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Result<Declaration, ParseError> {
        let name = match self.peek() {
            CSSToken::Ident(name) => name.clone(),
            other => {
                return Err(ParseError::UnexpectedToken {
                    found: other.to_string(),
                });
            }
        };
        self.advance();
        self.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>, this
        // is a parse error."
        if !matches!(self.peek(), CSSToken::Colon) {
            return Err(ParseError::MissingColon { property: name });
        }
        self.advance();
        self.skip_whitespace();

        let mut value = Vec::new();
        while !matches!(
            self.peek(),
            CSSToken::EOF | CSSToken::Semicolon | CSSToken::RightBrace
        ) {
            value.push(self.consume_component_value()?);
        }

        // [CSS Cascade § 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
        let important = strip_important(&mut value);

        Ok(Declaration {
            name,
            value,
            important,
        })
    }

    /// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self) -> Result<ComponentValue, ParseError> {
        let token = self.peek().clone();
        self.advance();

        match token {
            // "<{-token>, <[-token>, <(-token>": "Consume a simple block and return it."
            CSSToken::LeftBrace | CSSToken::LeftBracket | CSSToken::LeftParen => {
                let open = match token {
                    CSSToken::LeftBrace => '{',
                    CSSToken::LeftBracket => '[',
                    _ => '(',
                };
                let value = self.consume_until_close(closing_char(open))?;
                Ok(ComponentValue::Block { token: open, value })
            }
            // "<function-token>": "Consume a function and return it."
            CSSToken::Function(name) => {
                let value = self.consume_until_close(')')?;
                Ok(ComponentValue::Function { name, value })
            }
            CSSToken::BadString => Err(ParseError::BadString),
            CSSToken::BadUrl => Err(ParseError::BadUrl),
            other => Ok(ComponentValue::Token(other)),
        }
    }

    /// [§ 5.4.9 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Consume component values up to and including the `expected` closing token.
    fn consume_until_close(&mut self, expected: char) -> Result<Vec<ComponentValue>, ParseError> {
        let mut value = Vec::new();
        loop {
            match self.peek() {
                CSSToken::EOF => return Err(ParseError::Unclosed { expected }),
                CSSToken::RightBrace if expected == '}' => break,
                CSSToken::RightBracket if expected == ']' => break,
                CSSToken::RightParen if expected == ')' => break,
                _ => value.push(self.consume_component_value()?),
            }
        }
        self.advance();
        Ok(value)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.advance();
        }
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// The current token; past the end of the list this is EOF.
    fn peek(&self) -> &CSSToken {
        self.tokens.get(self.position).unwrap_or(&CSSToken::EOF)
    }
}

const fn closing_char(open: char) -> char {
    match open {
        '{' => '}',
        '[' => ']',
        _ => ')',
    }
}

/// Split a rule prelude on top-level commas into serialized selectors.
fn split_selector_list(prelude: &[ComponentValue]) -> Result<Vec<String>, ParseError> {
    prelude
        .split(|value| matches!(value, ComponentValue::Token(CSSToken::Comma)))
        .map(|part| {
            let text = serialize(part).trim().to_string();
            if text.is_empty() {
                Err(ParseError::EmptySelector)
            } else {
                Ok(text)
            }
        })
        .collect()
}

/// Remove a trailing `! important` (and surrounding whitespace) from `value`.
///
/// "A declaration is important if it has a !important annotation, i.e. if the
/// last two (non-whitespace, non-comment) tokens in its value are a
/// <delim-token> with the value "!" followed by an <ident-token> with a value
/// that is an ASCII case-insensitive match for "important"."
fn strip_important(value: &mut Vec<ComponentValue>) -> bool {
    let significant: Vec<usize> = value
        .iter()
        .enumerate()
        .filter(|(_, v)| !matches!(v, ComponentValue::Token(CSSToken::Whitespace)))
        .map(|(i, _)| i)
        .collect();

    let bang_at = match significant.as_slice() {
        [.., bang, last]
            if matches!(&value[*bang], ComponentValue::Token(CSSToken::Delim('!')))
                && matches!(
                    &value[*last],
                    ComponentValue::Token(CSSToken::Ident(s)) if s.eq_ignore_ascii_case("important")
                ) =>
        {
            Some(*bang)
        }
        _ => None,
    };

    if let Some(bang) = bang_at {
        value.truncate(bang);
    }
    while matches!(value.last(), Some(ComponentValue::Token(CSSToken::Whitespace))) {
        let _ = value.pop();
    }
    bang_at.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_important_annotation() {
        let decls = parse_declarations("color: red ! important").unwrap();
        assert_eq!(decls.len(), 1);
        assert!(decls[0].important);
        assert_eq!(decls[0].value_text(), "red");
    }

    #[test]
    fn keeps_lone_important_ident() {
        let decls = parse_declarations("font-family: important").unwrap();
        assert!(!decls[0].important);
        assert_eq!(decls[0].value_text(), "important");
    }

    #[test]
    fn serializes_functions_and_numbers() {
        let decls = parse_declarations("border: 1px solid rgba(1,2, 3)  ; width: 50%").unwrap();
        assert_eq!(decls[0].value_text(), "1px solid rgba(1,2, 3)");
        assert_eq!(decls[1].value_text(), "50%");
    }
}
