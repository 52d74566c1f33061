//! Lightweight Java outline parser.
//!
//! This is intentionally *not* a full-fidelity tree: it keeps the declarations
//! a symbol resolver needs and skips everything inside method bodies and
//! initializers. The parser is error tolerant and never fails; malformed input
//! produces a partial outline.

use crate::Span;

pub mod ast {
    use std::fmt;

    use crate::Span;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CompilationUnit {
        pub package: Option<PackageDecl>,
        pub imports: Vec<ImportDecl>,
        pub types: Vec<TypeDecl>,
        pub range: Span,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PackageDecl {
        pub name: String,
        pub range: Span,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ImportDecl {
        pub is_static: bool,
        pub is_star: bool,
        pub path: String,
        pub range: Span,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TypeDeclKind {
        Class,
        Interface,
        Enum,
        Annotation,
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Modifiers {
        pub is_public: bool,
        pub is_protected: bool,
        pub is_private: bool,
        pub is_static: bool,
        pub is_abstract: bool,
        pub is_final: bool,
        pub is_default: bool,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TypeDecl {
        pub kind: TypeDeclKind,
        pub modifiers: Modifiers,
        pub name: String,
        pub name_range: Span,
        pub type_params: Vec<TypeParam>,
        /// Superclass for classes, superinterfaces for interfaces.
        pub extends: Vec<TypeRef>,
        pub implements: Vec<TypeRef>,
        pub enum_constants: Vec<String>,
        pub members: Vec<MemberDecl>,
        pub range: Span,
        pub body_range: Span,
    }

    impl TypeDecl {
        pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> + '_ {
            self.members.iter().filter_map(|m| match m {
                MemberDecl::Type(decl) => Some(decl),
                _ => None,
            })
        }

        pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> + '_ {
            self.members.iter().filter_map(|m| match m {
                MemberDecl::Field(decl) => Some(decl),
                _ => None,
            })
        }

        pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> + '_ {
            self.members.iter().filter_map(|m| match m {
                MemberDecl::Method(decl) => Some(decl),
                _ => None,
            })
        }

        pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDecl> + '_ {
            self.members.iter().filter_map(|m| match m {
                MemberDecl::Constructor(decl) => Some(decl),
                _ => None,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TypeParam {
        pub name: String,
        pub bounds: Vec<TypeRef>,
        pub range: Span,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MemberDecl {
        Field(FieldDecl),
        Method(MethodDecl),
        Constructor(ConstructorDecl),
        Initializer(InitializerDecl),
        Type(TypeDecl),
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FieldDecl {
        pub modifiers: Modifiers,
        pub ty: TypeRef,
        pub name: String,
        pub name_range: Span,
        pub range: Span,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ParamDecl {
        pub ty: TypeRef,
        pub name: String,
        pub name_range: Span,
        pub is_varargs: bool,
        pub range: Span,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MethodDecl {
        pub modifiers: Modifiers,
        pub type_params: Vec<TypeParam>,
        pub return_ty: TypeRef,
        pub name: String,
        pub name_range: Span,
        pub params: Vec<ParamDecl>,
        pub has_body: bool,
        pub range: Span,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ConstructorDecl {
        pub modifiers: Modifiers,
        pub type_params: Vec<TypeParam>,
        pub name: String,
        pub name_range: Span,
        pub params: Vec<ParamDecl>,
        pub range: Span,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct InitializerDecl {
        pub is_static: bool,
        pub range: Span,
    }

    /// A type as written in source.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TypeRef {
        pub kind: TypeRefKind,
        pub range: Span,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TypeRefKind {
        /// `int`, `boolean`, ... (the keyword).
        Primitive(String),
        Void,
        /// `a.b.C<X>.D<Y>`; package parts are segments without arguments.
        Class(Vec<TypeRefSegment>),
        Array(Box<TypeRef>),
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TypeRefSegment {
        pub name: String,
        pub args: Vec<TypeArg>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TypeArg {
        Type(TypeRef),
        Wildcard(Option<WildcardBound>),
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum WildcardBound {
        Extends(TypeRef),
        Super(TypeRef),
    }

    impl TypeRef {
        /// Dotted name of a class type without type arguments.
        pub fn class_name(&self) -> Option<String> {
            match &self.kind {
                TypeRefKind::Class(segments) => Some(
                    segments
                        .iter()
                        .map(|s| s.name.as_str())
                        .collect::<Vec<_>>()
                        .join("."),
                ),
                _ => None,
            }
        }

        pub fn array_of(self) -> TypeRef {
            let range = self.range;
            TypeRef {
                kind: TypeRefKind::Array(Box::new(self)),
                range,
            }
        }
    }

    impl fmt::Display for TypeRef {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match &self.kind {
                TypeRefKind::Primitive(name) => f.write_str(name),
                TypeRefKind::Void => f.write_str("void"),
                TypeRefKind::Array(component) => write!(f, "{component}[]"),
                TypeRefKind::Class(segments) => {
                    for (idx, seg) in segments.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(".")?;
                        }
                        f.write_str(&seg.name)?;
                        if !seg.args.is_empty() {
                            f.write_str("<")?;
                            for (i, arg) in seg.args.iter().enumerate() {
                                if i > 0 {
                                    f.write_str(", ")?;
                                }
                                match arg {
                                    TypeArg::Type(ty) => write!(f, "{ty}")?,
                                    TypeArg::Wildcard(None) => f.write_str("?")?,
                                    TypeArg::Wildcard(Some(WildcardBound::Extends(b))) => {
                                        write!(f, "? extends {b}")?
                                    }
                                    TypeArg::Wildcard(Some(WildcardBound::Super(b))) => {
                                        write!(f, "? super {b}")?
                                    }
                                }
                            }
                            f.write_str(">")?;
                        }
                    }
                    Ok(())
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    compilation_unit: ast::CompilationUnit,
}

impl Parse {
    #[must_use]
    pub fn compilation_unit(&self) -> &ast::CompilationUnit {
        &self.compilation_unit
    }

    #[must_use]
    pub fn into_compilation_unit(self) -> ast::CompilationUnit {
        self.compilation_unit
    }
}

#[must_use]
pub fn parse(text: &str) -> Parse {
    let tokens = Lexer::new(text).collect();
    let mut parser = Parser::new(tokens);
    let compilation_unit = parser.parse_compilation_unit(text.len());
    Parse { compilation_unit }
}

/// Parses a standalone type such as `java.util.Map<String, int[]>`.
///
/// Returns `None` unless the whole input is consumed.
#[must_use]
pub fn parse_type_ref(text: &str) -> Option<ast::TypeRef> {
    let tokens = Lexer::new(text).collect();
    let mut parser = Parser::new(tokens);
    let ty = parser.parse_type_ref()?;
    parser.is_eof().then_some(ty)
}

const PRIMITIVES: &[&str] = &["boolean", "byte", "char", "short", "int", "long", "float", "double"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    text: String,
    range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Ident,
    Number,
    StringLiteral,
    CharLiteral,
    At,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Star,
    Eq,
    Lt,
    Gt,
    Question,
    Amp,
    Minus,
    Other,
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Lexer { text, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
                self.bump_char();
            }

            let rem = self.remaining();
            if rem.starts_with("//") {
                while let Some(c) = self.bump_char() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }

            if rem.starts_with("/*") {
                self.pos += 2;
                match self.remaining().find("*/") {
                    Some(end) => self.pos += end + 2,
                    None => self.pos = self.text.len(),
                }
                continue;
            }

            break;
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while matches!(self.peek_char(), Some(c) if pred(c)) {
            self.bump_char();
        }
    }

    fn eat_quoted(&mut self, quote: char) {
        // Opening quote already consumed.
        while let Some(c) = self.bump_char() {
            match c {
                '\\' => {
                    self.bump_char();
                }
                '\n' => break,
                c if c == quote => break,
                _ => {}
            }
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        let ch = self.bump_char()?;

        let kind = match ch {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '*' => TokenKind::Star,
            '=' => TokenKind::Eq,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '?' => TokenKind::Question,
            '&' => TokenKind::Amp,
            '-' => TokenKind::Minus,
            '@' => TokenKind::At,
            '"' => {
                if self.remaining().starts_with("\"\"") {
                    // Text block.
                    self.pos += 2;
                    match self.remaining().find("\"\"\"") {
                        Some(end) => self.pos += end + 3,
                        None => self.pos = self.text.len(),
                    }
                } else {
                    self.eat_quoted('"');
                }
                TokenKind::StringLiteral
            }
            '\'' => {
                self.eat_quoted('\'');
                TokenKind::CharLiteral
            }
            c if c.is_ascii_digit() => {
                self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                TokenKind::Number
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                self.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                TokenKind::Ident
            }
            _ => TokenKind::Other,
        };

        Some(Token {
            kind,
            text: self.text[start..self.pos].to_string(),
            range: Span::new(start, self.pos),
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_n(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn nth_is(&self, n: usize, kind: TokenKind) -> bool {
        self.peek_n(n).is_some_and(|token| token.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Ident && token.text == keyword)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        Some(tok)
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .map(|t| t.range.end)
            .unwrap_or(0)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Token {
        match self.peek() {
            Some(tok) if tok.kind == TokenKind::Ident => self.bump().unwrap_or_else(|| missing_ident(0)),
            Some(tok) => missing_ident(tok.range.start),
            None => missing_ident(self.prev_end()),
        }
    }

    fn parse_compilation_unit(&mut self, len: usize) -> ast::CompilationUnit {
        let mut package = None;
        let save = self.pos;
        self.skip_annotations();
        if self.at_keyword("package") {
            package = Some(self.parse_package_decl());
        } else {
            self.pos = save;
        }

        let mut imports = Vec::new();
        loop {
            if self.eat(TokenKind::Semi) {
                continue;
            }
            if !self.at_keyword("import") {
                break;
            }
            imports.push(self.parse_import_decl());
        }

        let mut types = Vec::new();
        while !self.is_eof() {
            if let Some(decl) = self.parse_type_decl() {
                types.push(decl);
            } else {
                self.bump();
            }
        }

        ast::CompilationUnit {
            package,
            imports,
            types,
            range: Span::new(0, len),
        }
    }

    fn parse_package_decl(&mut self) -> ast::PackageDecl {
        let kw = self.expect_ident();
        let (name, _) = self.parse_qualified_name();
        self.eat(TokenKind::Semi);
        ast::PackageDecl {
            name,
            range: Span::new(kw.range.start, self.prev_end()),
        }
    }

    fn parse_import_decl(&mut self) -> ast::ImportDecl {
        let kw = self.expect_ident();
        let is_static = if self.at_keyword("static") {
            self.bump();
            true
        } else {
            false
        };

        let mut parts = vec![self.expect_ident().text];
        let mut is_star = false;
        while self.eat(TokenKind::Dot) {
            if self.eat(TokenKind::Star) {
                is_star = true;
                break;
            }
            parts.push(self.expect_ident().text);
        }
        self.eat(TokenKind::Semi);

        ast::ImportDecl {
            is_static,
            is_star,
            path: parts.join("."),
            range: Span::new(kw.range.start, self.prev_end()),
        }
    }

    fn parse_qualified_name(&mut self) -> (String, Span) {
        let first = self.expect_ident();
        let start = first.range.start;
        let mut end = first.range.end;
        let mut parts = vec![first.text];

        while self.at_kind(TokenKind::Dot) && self.nth_is(1, TokenKind::Ident) {
            self.bump();
            let part = self.expect_ident();
            end = part.range.end;
            parts.push(part.text);
        }

        (parts.join("."), Span::new(start, end))
    }

    fn parse_type_decl(&mut self) -> Option<ast::TypeDecl> {
        let start_pos = self.pos;
        let start = self.peek()?.range.start;

        let modifiers = self.parse_modifiers();

        let kind = if self.at_kind(TokenKind::At)
            && self
                .peek_n(1)
                .is_some_and(|t| t.kind == TokenKind::Ident && t.text == "interface")
        {
            self.bump();
            ast::TypeDeclKind::Annotation
        } else {
            match self.peek().map(|t| t.text.as_str()) {
                Some("class") | Some("record") => ast::TypeDeclKind::Class,
                Some("interface") => ast::TypeDeclKind::Interface,
                Some("enum") => ast::TypeDeclKind::Enum,
                _ => {
                    self.pos = start_pos;
                    return None;
                }
            }
        };
        let is_record = self.at_keyword("record");
        self.bump();

        let name = self.expect_ident();
        let type_params = self.parse_type_params();
        if is_record {
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
        }

        let mut extends = Vec::new();
        let mut implements = Vec::new();
        loop {
            if self.at_keyword("extends") {
                self.bump();
                extends.extend(self.parse_type_ref_list());
            } else if self.at_keyword("implements") {
                self.bump();
                implements.extend(self.parse_type_ref_list());
            } else if self.at_keyword("permits") {
                self.bump();
                self.parse_type_ref_list();
            } else {
                break;
            }
        }

        let (members, enum_constants, body_range) = self.parse_type_body(&name.text, kind);

        Some(ast::TypeDecl {
            kind,
            modifiers,
            name: name.text,
            name_range: name.range,
            type_params,
            extends,
            implements,
            enum_constants,
            members,
            range: Span::new(start, body_range.end),
            body_range,
        })
    }

    fn parse_type_ref_list(&mut self) -> Vec<ast::TypeRef> {
        let mut out = Vec::new();
        while let Some(ty) = self.parse_type_ref() {
            out.push(ty);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        out
    }

    fn skip_annotations(&mut self) {
        while self.at_kind(TokenKind::At)
            && !self
                .peek_n(1)
                .is_some_and(|t| t.kind == TokenKind::Ident && t.text == "interface")
        {
            self.bump();
            if self.at_kind(TokenKind::Ident) {
                self.parse_qualified_name();
            }
            if self.at_kind(TokenKind::LParen) {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
            }
        }
    }

    fn parse_modifiers(&mut self) -> ast::Modifiers {
        let mut modifiers = ast::Modifiers::default();
        loop {
            self.skip_annotations();
            let Some(tok) = self.peek() else {
                break;
            };
            if tok.kind != TokenKind::Ident {
                break;
            }
            match tok.text.as_str() {
                "public" => modifiers.is_public = true,
                "protected" => modifiers.is_protected = true,
                "private" => modifiers.is_private = true,
                "static" => {
                    if self.nth_is(1, TokenKind::LBrace) {
                        break;
                    }
                    modifiers.is_static = true;
                }
                "abstract" => modifiers.is_abstract = true,
                "final" => modifiers.is_final = true,
                "default" => modifiers.is_default = true,
                "synchronized" | "native" | "transient" | "volatile" | "sealed" | "strictfp" => {}
                "non" if self.nth_is(1, TokenKind::Minus) => {
                    // `non-sealed`
                    self.bump();
                    self.bump();
                }
                _ => break,
            }
            self.bump();
        }
        modifiers
    }

    fn parse_type_params(&mut self) -> Vec<ast::TypeParam> {
        let mut out = Vec::new();
        if !self.eat(TokenKind::Lt) {
            return out;
        }
        while !self.is_eof() && !self.at_kind(TokenKind::Gt) {
            self.skip_annotations();
            let name = self.expect_ident();
            if name.text.is_empty() {
                self.bump();
                continue;
            }
            let mut bounds = Vec::new();
            if self.at_keyword("extends") {
                self.bump();
                while let Some(bound) = self.parse_type_ref() {
                    bounds.push(bound);
                    if !self.eat(TokenKind::Amp) {
                        break;
                    }
                }
            }
            out.push(ast::TypeParam {
                name: name.text,
                bounds,
                range: Span::new(name.range.start, self.prev_end()),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.eat(TokenKind::Gt);
        out
    }

    fn parse_type_body(
        &mut self,
        type_name: &str,
        kind: ast::TypeDeclKind,
    ) -> (Vec<ast::MemberDecl>, Vec<String>, Span) {
        while !self.is_eof() && !self.at_kind(TokenKind::LBrace) {
            self.bump();
        }
        let body_start = self.peek().map(|t| t.range.start).unwrap_or_else(|| self.prev_end());
        self.eat(TokenKind::LBrace);

        let enum_constants = if kind == ast::TypeDeclKind::Enum {
            self.parse_enum_constants()
        } else {
            Vec::new()
        };

        let mut members = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            if self.eat(TokenKind::Semi) {
                continue;
            }
            let before = self.pos;
            match self.parse_member_decl(type_name) {
                Some(mut decls) => members.append(&mut decls),
                None => {
                    if self.pos == before {
                        self.bump();
                    }
                }
            }
        }
        self.eat(TokenKind::RBrace);

        (members, enum_constants, Span::new(body_start, self.prev_end()))
    }

    fn parse_enum_constants(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            if self.eat(TokenKind::Semi) || self.at_kind(TokenKind::RBrace) || self.is_eof() {
                break;
            }

            self.skip_annotations();
            if !self.at_kind(TokenKind::Ident) {
                self.bump();
                continue;
            }
            out.push(self.expect_ident().text);

            if self.at_kind(TokenKind::LParen) {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
            }
            if self.at_kind(TokenKind::LBrace) {
                self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            }
            self.eat(TokenKind::Comma);
        }
        out
    }

    /// Field declarations with several declarators yield one entry each.
    fn parse_member_decl(&mut self, enclosing_type: &str) -> Option<Vec<ast::MemberDecl>> {
        let start = self.peek()?.range.start;
        let modifiers = self.parse_modifiers();

        if self.at_kind(TokenKind::LBrace) || self.at_keyword("static") {
            let is_static = self.at_keyword("static");
            if is_static {
                self.bump();
            }
            self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            return Some(vec![ast::MemberDecl::Initializer(ast::InitializerDecl {
                is_static,
                range: Span::new(start, self.prev_end()),
            })]);
        }

        if self.at_nested_type_decl() {
            self.pos = self.rewind_to(start);
            return self
                .parse_type_decl()
                .map(|decl| vec![ast::MemberDecl::Type(decl)]);
        }

        let type_params = self.parse_type_params();

        if self.at_kind(TokenKind::Ident) && self.nth_is(1, TokenKind::LParen) {
            let name = self.expect_ident();
            if name.text == enclosing_type {
                let params = self.parse_param_list();
                self.skip_throws_clause();
                self.skip_body_or_semi();
                return Some(vec![ast::MemberDecl::Constructor(ast::ConstructorDecl {
                    modifiers,
                    type_params,
                    name: name.text,
                    name_range: name.range,
                    params,
                    range: Span::new(start, self.prev_end()),
                })]);
            }
            self.pos -= 1;
        }

        let return_ty = self.parse_type_ref()?;
        let name = self.expect_ident();
        if name.text.is_empty() {
            return None;
        }

        if self.at_kind(TokenKind::LParen) {
            let params = self.parse_param_list();
            let mut return_ty = return_ty;
            // Legacy `int foo()[]` array dimensions.
            while self.at_kind(TokenKind::LBracket) && self.nth_is(1, TokenKind::RBracket) {
                self.bump();
                self.bump();
                return_ty = return_ty.array_of();
            }
            self.skip_throws_clause();
            let has_body = self.skip_body_or_semi();
            return Some(vec![ast::MemberDecl::Method(ast::MethodDecl {
                modifiers,
                type_params,
                return_ty,
                name: name.text,
                name_range: name.range,
                params,
                has_body,
                range: Span::new(start, self.prev_end()),
            })]);
        }

        let mut declarators = vec![(name, self.parse_dims(return_ty.clone()))];
        loop {
            self.skip_initializer();
            if !self.eat(TokenKind::Comma) {
                break;
            }
            let name = self.expect_ident();
            let ty = self.parse_dims(return_ty.clone());
            declarators.push((name, ty));
        }
        self.eat(TokenKind::Semi);
        let end = self.prev_end();

        Some(
            declarators
                .into_iter()
                .map(|(name, ty)| {
                    ast::MemberDecl::Field(ast::FieldDecl {
                        modifiers,
                        ty,
                        name: name.text,
                        name_range: name.range,
                        range: Span::new(start, end),
                    })
                })
                .collect(),
        )
    }

    fn at_nested_type_decl(&self) -> bool {
        if self.at_kind(TokenKind::At) {
            return self
                .peek_n(1)
                .is_some_and(|t| t.kind == TokenKind::Ident && t.text == "interface");
        }
        if self.at_keyword("class") || self.at_keyword("interface") || self.at_keyword("enum") {
            return true;
        }
        // `record` is contextual: `record Point(` or `record Box<`.
        self.at_keyword("record")
            && self.nth_is(1, TokenKind::Ident)
            && (self.nth_is(2, TokenKind::LParen) || self.nth_is(2, TokenKind::Lt))
    }

    fn rewind_to(&self, offset: usize) -> usize {
        self.tokens
            .iter()
            .position(|t| t.range.start >= offset)
            .unwrap_or(self.tokens.len())
    }

    fn parse_dims(&mut self, mut ty: ast::TypeRef) -> ast::TypeRef {
        while self.at_kind(TokenKind::LBracket) && self.nth_is(1, TokenKind::RBracket) {
            self.bump();
            self.bump();
            ty = ty.array_of();
        }
        ty
    }

    /// Skips `= ...` up to the next top-level `,` or `;`.
    fn skip_initializer(&mut self) {
        if !self.eat(TokenKind::Eq) {
            return;
        }
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Comma | TokenKind::Semi | TokenKind::RBrace => break,
                TokenKind::LParen => self.skip_balanced(TokenKind::LParen, TokenKind::RParen),
                TokenKind::LBrace => self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace),
                TokenKind::LBracket => self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket),
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn skip_throws_clause(&mut self) {
        if !self.at_keyword("throws") {
            return;
        }
        self.bump();
        self.parse_type_ref_list();
    }

    /// Returns whether a body was present.
    fn skip_body_or_semi(&mut self) -> bool {
        if self.at_keyword("default") {
            // Annotation element default value.
            self.bump();
            while let Some(tok) = self.peek() {
                match tok.kind {
                    TokenKind::Semi | TokenKind::RBrace => break,
                    TokenKind::LParen => self.skip_balanced(TokenKind::LParen, TokenKind::RParen),
                    TokenKind::LBrace => self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace),
                    _ => {
                        self.bump();
                    }
                }
            }
        }
        if self.at_kind(TokenKind::LBrace) {
            self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            return true;
        }
        self.eat(TokenKind::Semi);
        false
    }

    fn parse_type_ref(&mut self) -> Option<ast::TypeRef> {
        self.skip_annotations();
        let first = self.peek()?;
        if first.kind != TokenKind::Ident {
            return None;
        }
        let start = first.range.start;

        let kind = if PRIMITIVES.contains(&first.text.as_str()) {
            let tok = self.expect_ident();
            ast::TypeRefKind::Primitive(tok.text)
        } else if first.text == "void" {
            self.bump();
            ast::TypeRefKind::Void
        } else {
            let mut segments = Vec::new();
            loop {
                let name = self.expect_ident();
                let args = if self.at_kind(TokenKind::Lt) {
                    self.parse_type_args()
                } else {
                    Vec::new()
                };
                segments.push(ast::TypeRefSegment {
                    name: name.text,
                    args,
                });
                if self.at_kind(TokenKind::Dot) && self.nth_is(1, TokenKind::Ident) {
                    self.bump();
                    self.skip_annotations();
                    continue;
                }
                break;
            }
            ast::TypeRefKind::Class(segments)
        };

        let ty = ast::TypeRef {
            kind,
            range: Span::new(start, self.prev_end()),
        };
        Some(self.parse_dims(ty))
    }

    fn parse_type_args(&mut self) -> Vec<ast::TypeArg> {
        let mut args = Vec::new();
        self.eat(TokenKind::Lt);
        while !self.is_eof() && !self.at_kind(TokenKind::Gt) {
            self.skip_annotations();
            if self.eat(TokenKind::Question) {
                let bound = if self.at_keyword("extends") {
                    self.bump();
                    self.parse_type_ref().map(ast::WildcardBound::Extends)
                } else if self.at_keyword("super") {
                    self.bump();
                    self.parse_type_ref().map(ast::WildcardBound::Super)
                } else {
                    None
                };
                args.push(ast::TypeArg::Wildcard(bound));
            } else if let Some(ty) = self.parse_type_ref() {
                args.push(ast::TypeArg::Type(ty));
            } else {
                // Diamond `<>` or garbage.
                break;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.eat(TokenKind::Gt);
        args
    }

    fn parse_param_list(&mut self) -> Vec<ast::ParamDecl> {
        self.eat(TokenKind::LParen);
        let mut params = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
            self.parse_modifiers();
            if let Some(ty) = self.parse_type_ref() {
                let is_varargs = self.at_kind(TokenKind::Dot)
                    && self.nth_is(1, TokenKind::Dot)
                    && self.nth_is(2, TokenKind::Dot);
                let ty = if is_varargs {
                    self.pos += 3;
                    ty.array_of()
                } else {
                    ty
                };
                let name = self.expect_ident();
                // Receiver parameter `Foo this` is not a real parameter.
                if name.text != "this" {
                    let ty = self.parse_dims(ty);
                    let range = Span::new(ty.range.start, self.prev_end());
                    params.push(ast::ParamDecl {
                        ty,
                        name: name.text,
                        name_range: name.range,
                        is_varargs,
                        range,
                    });
                }
            } else {
                self.bump();
            }
            if !self.eat(TokenKind::Comma) && !self.at_kind(TokenKind::RParen) {
                self.bump();
            }
        }
        self.eat(TokenKind::RParen);
        params
    }

    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        if !self.at_kind(open) {
            return;
        }
        self.bump();
        let mut depth = 1usize;
        while !self.is_eof() && depth > 0 {
            match self.peek().map(|t| t.kind) {
                Some(k) if k == open => depth += 1,
                Some(k) if k == close => depth -= 1,
                _ => {}
            }
            self.bump();
        }
    }
}

fn missing_ident(at: usize) -> Token {
    Token {
        kind: TokenKind::Ident,
        text: String::new(),
        range: Span::new(at, at),
    }
}
