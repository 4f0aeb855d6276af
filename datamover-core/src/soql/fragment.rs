//! Advisory syntax checks for user-authored query fragments
//!
//! WHERE and ORDER BY fragments are written free-hand in the wizard and
//! embedded verbatim into generated queries. A malformed fragment only
//! fails once the engine runs the query, so the wizard asks these checks
//! first. They are advisory: empty fragments are fine, and semi-join
//! subqueries inside `IN (...)` are only checked for balanced parentheses.

use once_cell::sync::Lazy;
use regex::Regex;

/// Parse error with position information
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
    pub context: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "at position {}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Check a WHERE fragment (without the `WHERE` keyword itself).
/// Empty and whitespace-only fragments are valid.
pub fn is_valid_where(fragment: &str) -> bool {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return true;
    }
    match parse_where(fragment) {
        Ok(()) => true,
        Err(err) => {
            log::debug!("rejecting WHERE fragment '{}': {}", fragment, err);
            false
        }
    }
}

/// Check an ORDER BY fragment (without the `ORDER BY` keyword itself):
/// a comma-separated list of field paths, each with optional `ASC`/`DESC`
/// and `NULLS FIRST`/`NULLS LAST`. Empty fragments are valid.
pub fn is_valid_order_by(fragment: &str) -> bool {
    static ORDER_BY: Lazy<Regex> = Lazy::new(|| {
        let term = r"[a-z_][a-z0-9_]*(\.[a-z_][a-z0-9_]*)*(\s+(ASC|DESC))?(\s+NULLS\s+(FIRST|LAST))?";
        Regex::new(&format!(r"(?i)^{term}(\s*,\s*{term})*$")).unwrap()
    });

    let fragment = fragment.trim();
    fragment.is_empty() || ORDER_BY.is_match(fragment)
}

fn parse_where(fragment: &str) -> Result<(), ParseError> {
    Parser::new(fragment)?.parse()
}

/// Token types for the fragment lexer
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// Field name, logical keyword, or bare date literal.
    Ident(String),
    /// Single-quoted string.
    Str(String),
    /// Number, date, or datetime literal.
    Literal(String),
    Dot,
    Comma,
    Colon,
    LParen,
    RParen,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Eof,
}

/// Lexer for fragment tokens
struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn current_pos(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.input.len())
    }

    fn context_at(&self, pos: usize) -> String {
        self.input[pos.min(self.input.len())..].chars().take(20).collect()
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();

        let Some(&(pos, ch)) = self.chars.peek() else {
            return Ok(Token::Eof);
        };

        match ch {
            '.' => {
                self.chars.next();
                return Ok(Token::Dot);
            }
            ',' => {
                self.chars.next();
                return Ok(Token::Comma);
            }
            ':' => {
                self.chars.next();
                return Ok(Token::Colon);
            }
            '(' => {
                self.chars.next();
                return Ok(Token::LParen);
            }
            ')' => {
                self.chars.next();
                return Ok(Token::RParen);
            }
            '=' => {
                self.chars.next();
                return Ok(Token::Eq);
            }
            _ => {}
        }

        if ch == '!' {
            self.chars.next();
            if let Some(&(_, '=')) = self.chars.peek() {
                self.chars.next();
                return Ok(Token::Ne);
            }
            return Err(ParseError {
                message: "expected '!=' for not-equal comparison".to_string(),
                position: pos,
                context: self.context_at(pos),
            });
        }

        if ch == '<' {
            self.chars.next();
            match self.chars.peek() {
                Some(&(_, '=')) => {
                    self.chars.next();
                    return Ok(Token::Le);
                }
                Some(&(_, '>')) => {
                    self.chars.next();
                    return Ok(Token::Ne);
                }
                _ => return Ok(Token::Lt),
            }
        }

        if ch == '>' {
            self.chars.next();
            if let Some(&(_, '=')) = self.chars.peek() {
                self.chars.next();
                return Ok(Token::Ge);
            }
            return Ok(Token::Gt);
        }

        // String literal; '' and \' escape an embedded quote
        if ch == '\'' {
            self.chars.next();
            let mut s = String::new();
            loop {
                match self.chars.next() {
                    Some((_, '\\')) => {
                        if let Some((_, escaped)) = self.chars.next() {
                            s.push(escaped);
                        }
                    }
                    Some((_, '\'')) => {
                        if let Some(&(_, '\'')) = self.chars.peek() {
                            self.chars.next();
                            s.push('\'');
                            continue;
                        }
                        break;
                    }
                    Some((_, c)) => s.push(c),
                    None => {
                        return Err(ParseError {
                            message: "unclosed string literal".to_string(),
                            position: pos,
                            context: self.context_at(pos),
                        });
                    }
                }
            }
            return Ok(Token::Str(s));
        }

        // Number, date, or datetime. The continuation set covers ISO dates
        // and offsets (2024-01-31T10:00:00.000+02:00).
        let negative_number = ch == '-'
            && self.input[pos + 1..].chars().next().is_some_and(|c| c.is_ascii_digit());
        if ch.is_ascii_digit() || negative_number {
            self.chars.next();
            while let Some(&(_, c)) = self.chars.peek() {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '-' | '+') {
                    self.chars.next();
                } else {
                    break;
                }
            }
            let end = self.chars.peek().map(|(i, _)| *i).unwrap_or(self.input.len());
            return Ok(Token::Literal(self.input[pos..end].to_string()));
        }

        // Identifier
        if ch.is_alphabetic() || ch == '_' {
            self.chars.next();
            while let Some(&(_, c)) = self.chars.peek() {
                if c.is_alphanumeric() || c == '_' {
                    self.chars.next();
                } else {
                    break;
                }
            }
            let end = self.chars.peek().map(|(i, _)| *i).unwrap_or(self.input.len());
            return Ok(Token::Ident(self.input[pos..end].to_string()));
        }

        Err(ParseError {
            message: format!("unexpected character: '{}'", ch),
            position: pos,
            context: self.context_at(pos),
        })
    }
}

/// Recursive descent checker over the lexed fragment
struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.current == expected {
            self.advance()
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", expected, self.current)))
        }
    }

    fn error(&mut self, message: impl Into<String>) -> ParseError {
        let position = self.lexer.current_pos();
        ParseError {
            message: message.into(),
            position,
            context: self.lexer.context_at(position),
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current, Token::Ident(word) if word.eq_ignore_ascii_case(keyword))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.at_keyword(keyword) {
            self.advance()
        } else {
            Err(self.error(format!("expected {}, found {:?}", keyword, self.current)))
        }
    }

    fn parse(&mut self) -> Result<(), ParseError> {
        self.parse_or()?;
        if self.current != Token::Eof {
            return Err(self.error(format!(
                "unexpected token after condition: {:?}",
                self.current
            )));
        }
        Ok(())
    }

    /// or = and ("OR" and)*
    fn parse_or(&mut self) -> Result<(), ParseError> {
        self.parse_and()?;
        while self.at_keyword("OR") {
            self.advance()?;
            self.parse_and()?;
        }
        Ok(())
    }

    /// and = not ("AND" not)*
    fn parse_and(&mut self) -> Result<(), ParseError> {
        self.parse_not()?;
        while self.at_keyword("AND") {
            self.advance()?;
            self.parse_not()?;
        }
        Ok(())
    }

    /// not = "NOT" not | primary
    fn parse_not(&mut self) -> Result<(), ParseError> {
        if self.at_keyword("NOT") {
            self.advance()?;
            return self.parse_not();
        }
        self.parse_primary()
    }

    /// primary = "(" or ")" | condition
    fn parse_primary(&mut self) -> Result<(), ParseError> {
        if self.current == Token::LParen {
            self.advance()?;
            self.parse_or()?;
            return self.expect(Token::RParen);
        }
        self.parse_condition()
    }

    /// condition = path (comparator value | ["NOT"] "IN" in_list
    ///             | "LIKE" string | ("INCLUDES"|"EXCLUDES") string_list)
    fn parse_condition(&mut self) -> Result<(), ParseError> {
        self.parse_field_path()?;

        if self.at_keyword("NOT") {
            self.advance()?;
            self.expect_keyword("IN")?;
            return self.parse_in_list();
        }
        if self.at_keyword("IN") {
            self.advance()?;
            return self.parse_in_list();
        }
        if self.at_keyword("LIKE") {
            self.advance()?;
            if let Token::Str(_) = self.current {
                return self.advance();
            }
            return Err(self.error("LIKE requires a quoted pattern"));
        }
        if self.at_keyword("INCLUDES") || self.at_keyword("EXCLUDES") {
            self.advance()?;
            self.expect(Token::LParen)?;
            loop {
                if let Token::Str(_) = self.current {
                    self.advance()?;
                } else {
                    return Err(self.error("expected a quoted value"));
                }
                if self.current != Token::Comma {
                    break;
                }
                self.advance()?;
            }
            return self.expect(Token::RParen);
        }

        match self.current {
            Token::Eq | Token::Ne | Token::Lt | Token::Le | Token::Gt | Token::Ge => {
                self.advance()?;
                self.parse_value()
            }
            _ => Err(self.error(format!("expected a comparator, found {:?}", self.current))),
        }
    }

    /// path = ident ("." ident)*
    fn parse_field_path(&mut self) -> Result<(), ParseError> {
        match &self.current {
            Token::Ident(_) => self.advance()?,
            _ => return Err(self.error(format!("expected a field name, found {:?}", self.current))),
        }
        while self.current == Token::Dot {
            self.advance()?;
            match &self.current {
                Token::Ident(_) => self.advance()?,
                _ => return Err(self.error("expected a field name after '.'")),
            }
        }
        Ok(())
    }

    /// in_list = "(" (subquery | value ("," value)*) ")"
    fn parse_in_list(&mut self) -> Result<(), ParseError> {
        self.expect(Token::LParen)?;
        if self.at_keyword("SELECT") {
            return self.skip_subquery();
        }
        self.parse_value()?;
        while self.current == Token::Comma {
            self.advance()?;
            self.parse_value()?;
        }
        self.expect(Token::RParen)
    }

    /// Semi-join subqueries go to the engine verbatim; only parenthesis
    /// balance is checked.
    fn skip_subquery(&mut self) -> Result<(), ParseError> {
        let mut depth = 1;
        loop {
            match self.current {
                Token::Eof => return Err(self.error("unclosed subquery in IN clause")),
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.advance();
                    }
                }
                _ => {}
            }
            self.advance()?;
        }
    }

    /// value = string | number/date literal | true | false | null
    ///       | DATE_KEYWORD (":" n)?
    fn parse_value(&mut self) -> Result<(), ParseError> {
        match &self.current {
            Token::Str(_) | Token::Literal(_) => self.advance(),
            Token::Ident(word) => {
                let word = word.clone();
                if word.eq_ignore_ascii_case("true")
                    || word.eq_ignore_ascii_case("false")
                    || word.eq_ignore_ascii_case("null")
                {
                    return self.advance();
                }
                if is_date_keyword(&word) {
                    self.advance()?;
                    if self.current == Token::Colon {
                        self.advance()?;
                        if let Token::Literal(_) = self.current {
                            return self.advance();
                        }
                        return Err(self.error(format!("expected a number after {}:", word)));
                    }
                    return Ok(());
                }
                Err(self.error(format!("expected a value, found bare word '{}'", word)))
            }
            _ => Err(self.error(format!("expected a value, found {:?}", self.current))),
        }
    }
}

/// Bare date literals (TODAY, LAST_N_DAYS, NEXT_90_DAYS, ...) are written
/// in upper snake case; anything else unquoted is a typo.
fn is_date_keyword(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && word
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fragments_are_valid() {
        assert!(is_valid_where(""));
        assert!(is_valid_where("   "));
        assert!(is_valid_order_by(""));
        assert!(is_valid_order_by("  \t "));
    }

    #[test]
    fn test_simple_conditions() {
        assert!(is_valid_where("Name = 'Acme'"));
        assert!(is_valid_where("AnnualRevenue >= 100000"));
        assert!(is_valid_where("Account.Owner.Name != 'Admin'"));
        assert!(is_valid_where("IsDeleted = false"));
        assert!(is_valid_where("ParentId != null"));
    }

    #[test]
    fn test_boolean_combinations() {
        assert!(is_valid_where("Name = 'A' AND Rating = 'Hot'"));
        assert!(is_valid_where("Name = 'A' OR (Rating = 'Hot' AND Active__c = true)"));
        assert!(is_valid_where("NOT Name LIKE 'Sample%'"));
        assert!(is_valid_where("not (Amount < 10 or Amount > 100)"));
    }

    #[test]
    fn test_in_lists() {
        assert!(is_valid_where("StageName IN ('Won', 'Lost')"));
        assert!(is_valid_where("Status NOT IN ('Closed', 'Converted')"));
        assert!(is_valid_where("Quantity IN (1, 2, 3)"));
        assert!(!is_valid_where("StageName IN ('Won',)"));
        assert!(!is_valid_where("StageName IN 'Won'"));
    }

    #[test]
    fn test_semi_join_subquery_only_needs_balance() {
        assert!(is_valid_where(
            "AccountId IN (SELECT Id FROM Account WHERE Industry = 'Tech')"
        ));
        assert!(is_valid_where(
            "Id IN (SELECT ContactId FROM Case WHERE Status IN ('New', 'Open'))"
        ));
        assert!(!is_valid_where("AccountId IN (SELECT Id FROM Account"));
    }

    #[test]
    fn test_dates_and_date_keywords() {
        assert!(is_valid_where("CloseDate > 2024-01-31"));
        assert!(is_valid_where("CreatedDate >= 2024-01-31T10:00:00.000+02:00"));
        assert!(is_valid_where("CreatedDate = LAST_N_DAYS:30"));
        assert!(is_valid_where("CloseDate = TODAY OR CloseDate = NEXT_90_DAYS"));
        assert!(!is_valid_where("CreatedDate = LAST_N_DAYS:"));
    }

    #[test]
    fn test_includes_excludes() {
        assert!(is_valid_where("Interests__c INCLUDES ('Golf', 'Chess')"));
        assert!(is_valid_where("Interests__c EXCLUDES ('Golf')"));
        assert!(!is_valid_where("Interests__c INCLUDES (Golf)"));
    }

    #[test]
    fn test_like_requires_string() {
        assert!(is_valid_where("Name LIKE 'Acme%'"));
        assert!(!is_valid_where("Name LIKE 5"));
    }

    #[test]
    fn test_escaped_quotes_in_strings() {
        assert!(is_valid_where(r"Name = 'O\'Brien'"));
        assert!(is_valid_where("Name = 'O''Brien'"));
        assert!(!is_valid_where("Name = 'unclosed"));
    }

    #[test]
    fn test_malformed_fragments() {
        assert!(!is_valid_where("Name ="));
        assert!(!is_valid_where("= 'Acme'"));
        assert!(!is_valid_where("Name = 'A' AND"));
        assert!(!is_valid_where("(Name = 'A'"));
        assert!(!is_valid_where("Name = 'A')"));
        assert!(!is_valid_where("Name == 'A' extra"));
        assert!(!is_valid_where("Name = Acme"));
        assert!(!is_valid_where("Name 'Acme'"));
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = parse_where("Name = ").unwrap_err();
        assert!(err.message.contains("expected a value"));
        assert_eq!(err.position, 7);

        let err = parse_where("Name = 'unclosed").unwrap_err();
        assert!(err.message.contains("unclosed string"));
    }

    #[test]
    fn test_order_by_fragments() {
        assert!(is_valid_order_by("Name"));
        assert!(is_valid_order_by("Name ASC"));
        assert!(is_valid_order_by("Name desc"));
        assert!(is_valid_order_by("Account.Name ASC, CreatedDate DESC"));
        assert!(is_valid_order_by("Name ASC NULLS LAST"));
        assert!(is_valid_order_by("Name NULLS FIRST, Amount"));

        assert!(!is_valid_order_by("Name ASCENDING"));
        assert!(!is_valid_order_by("Name,"));
        assert!(!is_valid_order_by("1Name"));
        assert!(!is_valid_order_by("Name ASC,"));
        assert!(!is_valid_order_by("Name; DROP TABLE"));
    }
}
