//! Recursive-descent parser for the infix policy grammar.
//!
//! ```text
//! expr   := term { "or" term }
//! term   := factor { "and" factor }
//! factor := "(" expr ")"
//!         | INT "of" "(" expr { "," expr } ")"
//!         | attribute
//! ```
//!
//! `and`, `or` and `of` are case-insensitive keywords. A `k of (…)` gate with
//! `k` equal to the child count parses as AND and with `k == 1` as OR, so the
//! rendered canonical form reparses to an identical tree.

use std::str::FromStr;

use super::{Attribute, GateKind, TreeNode};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    LParen,
    RParen,
    Comma,
    And,
    Or,
    Of,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            c if super::is_attr_char(c) || c == ':' => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if super::is_attr_char(c) || c == ':' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(match word.to_ascii_lowercase().as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "of" => Token::Of,
                    _ => Token::Ident(word),
                });
            }
            _ => return Err(Error::InvalidInput),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<&Token> {
        let t = self.tokens.get(self.pos).ok_or(Error::InvalidInput)?;
        self.pos += 1;
        Ok(t)
    }

    fn expect(&mut self, t: Token) -> Result<()> {
        if self.next()? == &t {
            Ok(())
        } else {
            Err(Error::InvalidInput)
        }
    }

    fn expr(&mut self) -> Result<TreeNode> {
        let first = self.term()?;
        let mut children = vec![first];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            children.push(self.term()?);
        }
        Ok(collapse(GateKind::Or, children))
    }

    fn term(&mut self) -> Result<TreeNode> {
        let first = self.factor()?;
        let mut children = vec![first];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            children.push(self.factor()?);
        }
        Ok(collapse(GateKind::And, children))
    }

    fn factor(&mut self) -> Result<TreeNode> {
        match self.next()?.clone() {
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(word) => {
                // A pure integer followed by `of` opens a threshold gate;
                // otherwise the word is an attribute.
                if word.chars().all(|c| c.is_ascii_digit())
                    && self.peek() == Some(&Token::Of)
                {
                    self.pos += 1;
                    let k: u32 = word.parse().map_err(|_| Error::InvalidInput)?;
                    self.threshold(k)
                } else {
                    let attr = Attribute::from_str(&word)?;
                    Ok(TreeNode::leaf(attr.prefix, attr.label))
                }
            }
            _ => Err(Error::InvalidInput),
        }
    }

    fn threshold(&mut self, k: u32) -> Result<TreeNode> {
        self.expect(Token::LParen)?;
        let mut children = vec![self.expr()?];
        while self.peek() == Some(&Token::Comma) {
            self.pos += 1;
            children.push(self.expr()?);
        }
        self.expect(Token::RParen)?;

        let n = children.len() as u32;
        if k == 0 || k > n {
            return Err(Error::InvalidInput);
        }
        if children.len() == 1 {
            return Ok(children.pop().unwrap());
        }
        let kind = if k == n {
            GateKind::And
        } else if k == 1 {
            GateKind::Or
        } else {
            GateKind::Threshold(k)
        };
        Ok(TreeNode::gate(kind, children))
    }
}

/// A chain of one element is just that element.
fn collapse(kind: GateKind, mut children: Vec<TreeNode>) -> TreeNode {
    if children.len() == 1 {
        children.pop().unwrap()
    } else {
        TreeNode::gate(kind, children)
    }
}

/// Parses an infix policy expression into a (not yet canonicalized) tree.
pub fn parse(input: &str) -> Result<TreeNode> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(Error::InvalidInput);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let root = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(Error::InvalidInput);
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> TreeNode {
        TreeNode::leaf(None, s.into())
    }

    #[test]
    fn single_attribute() {
        assert_eq!(parse("alice").unwrap(), leaf("alice"));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let t = parse("a or b and c").unwrap();
        assert_eq!(
            t,
            TreeNode::gate(
                GateKind::Or,
                vec![
                    leaf("a"),
                    TreeNode::gate(GateKind::And, vec![leaf("b"), leaf("c")]),
                ],
            )
        );
    }

    #[test]
    fn chains_parse_nary() {
        let t = parse("a and b and c").unwrap();
        assert_eq!(
            t,
            TreeNode::gate(GateKind::And, vec![leaf("a"), leaf("b"), leaf("c")])
        );
    }

    #[test]
    fn parens_override_precedence() {
        let t = parse("(a or b) and c").unwrap();
        assert_eq!(
            t,
            TreeNode::gate(
                GateKind::And,
                vec![
                    TreeNode::gate(GateKind::Or, vec![leaf("a"), leaf("b")]),
                    leaf("c"),
                ],
            )
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse("a AND b").unwrap(), parse("a and b").unwrap());
        assert_eq!(parse("2 OF (a, b, c)").unwrap(), parse("2 of (a, b, c)").unwrap());
    }

    #[test]
    fn threshold_gate() {
        let t = parse("2 of (a, b, c)").unwrap();
        assert_eq!(
            t,
            TreeNode::gate(
                GateKind::Threshold(2),
                vec![leaf("a"), leaf("b"), leaf("c")],
            )
        );
    }

    #[test]
    fn threshold_normalizes_to_and_or() {
        assert_eq!(parse("3 of (a, b, c)").unwrap(), parse("a and b and c").unwrap());
        assert_eq!(parse("1 of (a, b, c)").unwrap(), parse("a or b or c").unwrap());
        assert_eq!(parse("1 of (a)").unwrap(), leaf("a"));
    }

    #[test]
    fn threshold_children_may_be_expressions() {
        let t = parse("2 of (a and b, c, d or e)").unwrap();
        match t {
            TreeNode::Gate {
                kind: GateKind::Threshold(2),
                ref children,
            } => assert_eq!(children.len(), 3),
            _ => panic!("expected threshold gate"),
        }
    }

    #[test]
    fn prefixed_attributes() {
        assert_eq!(
            parse("sales:alice").unwrap(),
            TreeNode::leaf(Some("sales".into()), "alice".into())
        );
    }

    #[test]
    fn numeric_attribute_without_of_is_a_label() {
        assert_eq!(parse("42").unwrap(), leaf("42"));
        let t = parse("42 and alice").unwrap();
        assert_eq!(t, TreeNode::gate(GateKind::And, vec![leaf("42"), leaf("alice")]));
    }

    #[test]
    fn rejects_malformed_inputs() {
        for bad in [
            "",
            "   ",
            "a and",
            "and a",
            "(a or b",
            "a b",
            "4 of (a, b, c)",
            "0 of (a, b)",
            "2 of ()",
            "a && b",
            "a,b",
        ] {
            assert!(parse(bad).is_err(), "accepted {bad:?}");
        }
    }
}
