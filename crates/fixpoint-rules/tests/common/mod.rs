//! Test fixtures: a tiny host for both dialects
//!
//! The engine never parses. These helpers play the host: they lex a small,
//! well-formed subset of each dialect into a lossless tree and answer symbol
//! queries the way a compiler front-end would.

#![allow(dead_code)]

use fixpoint_core::syntax::{Dialect, Document, GreenNode, SyntaxKind, SyntaxNode, TreeBuilder};
use fixpoint_core::{
    Accessibility, Analyzer, AnalyzerBuilder, EngineConfig, SemanticResolver, SemanticSymbol,
};
use fixpoint_rules::dialect::adapter_for_kind;
use fixpoint_rules::register_builtin;

pub fn brace(source: &str) -> Document {
    Document::new("Fixture.cs", Dialect::Brace, parse_brace(source))
}

pub fn basic(source: &str) -> Document {
    Document::new("Fixture.vb", Dialect::Basic, parse_basic(source))
}

pub fn analyzer() -> Analyzer {
    analyzer_with(EngineConfig::default())
}

pub fn analyzer_with(config: EngineConfig) -> Analyzer {
    let mut builder = AnalyzerBuilder::new().with_config(config);
    register_builtin(&mut builder).unwrap();
    builder.build().unwrap()
}

/// Resolves markers by name and declarations by their written or default
/// accessibility
///
/// A marker named `Missing` does not resolve; `Flags` resolves to the
/// `FlagsAttribute` type; any other `X` resolves to `XAttribute`.
pub struct FixtureResolver;

impl SemanticResolver for FixtureResolver {
    fn resolve_symbol(&self, node: &SyntaxNode) -> Option<SemanticSymbol> {
        if node.kind() == SyntaxKind::Attribute {
            let name = node
                .children_with_tokens()
                .filter_map(|element| element.into_token())
                .find(|token| token.kind() == SyntaxKind::Identifier)?
                .text()
                .to_string();
            return match name.as_str() {
                "Missing" => None,
                "Flags" => {
                    Some(SemanticSymbol::new("Flags").with_containing_type("FlagsAttribute"))
                }
                other => {
                    let attribute = format!("{other}Attribute");
                    Some(SemanticSymbol::new(other).with_containing_type(attribute))
                }
            };
        }

        let dialect = adapter_for_kind(node.kind())?;
        if !dialect.declaration_kinds().contains(&node.kind()) {
            return None;
        }
        let name = dialect.identifier(node)?.text().to_string();
        let written: Vec<SyntaxKind> = node
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .map(|token| token.kind())
            .filter(|kind| kind.is_accessibility_keyword())
            .collect();
        let nested = dialect.container(node).is_some();
        let accessibility = Accessibility::from_keywords(&written).unwrap_or(
            match (dialect.dialect(), nested) {
                (_, false) => Accessibility::Internal,
                (Dialect::Brace, true) => Accessibility::Private,
                (Dialect::Basic, true) => Accessibility::Public,
            },
        );
        Some(SemanticSymbol::new(name).with_accessibility(accessibility))
    }
}

type Token = (SyntaxKind, String);

fn lex(source: &str, keyword: fn(&str) -> Option<SyntaxKind>) -> Vec<Token> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut index = 0;
    while index < chars.len() {
        let start = index;
        let c = chars[index];
        let kind = if c == '\n' || c == '\r' {
            while index < chars.len() && (chars[index] == '\n' || chars[index] == '\r') {
                index += 1;
            }
            SyntaxKind::Newline
        } else if c.is_whitespace() {
            while index < chars.len()
                && chars[index].is_whitespace()
                && !matches!(chars[index], '\n' | '\r')
            {
                index += 1;
            }
            SyntaxKind::Whitespace
        } else if c.is_alphanumeric() || c == '_' {
            while index < chars.len() && (chars[index].is_alphanumeric() || chars[index] == '_') {
                index += 1;
            }
            let word: String = chars[start..index].iter().collect();
            if word.chars().all(|c| c.is_ascii_digit()) {
                SyntaxKind::NumberLiteral
            } else {
                keyword(&word).unwrap_or(SyntaxKind::Identifier)
            }
        } else {
            index += 1;
            match c {
                '[' => SyntaxKind::OpenBracket,
                ']' => SyntaxKind::CloseBracket,
                '(' => SyntaxKind::OpenParen,
                ')' => SyntaxKind::CloseParen,
                '{' => SyntaxKind::OpenBrace,
                '}' => SyntaxKind::CloseBrace,
                '<' => SyntaxKind::LessThan,
                '>' => SyntaxKind::GreaterThan,
                ',' => SyntaxKind::Comma,
                ';' => SyntaxKind::Semicolon,
                '.' => SyntaxKind::Dot,
                ':' => SyntaxKind::Colon,
                '=' => SyntaxKind::Equals,
                _ => SyntaxKind::Error,
            }
        };
        tokens.push((kind, chars[start..index].iter().collect()));
    }
    tokens
}

fn brace_keyword(word: &str) -> Option<SyntaxKind> {
    use SyntaxKind::*;
    Some(match word {
        "public" => PublicKw,
        "private" => PrivateKw,
        "protected" => ProtectedKw,
        "internal" => InternalKw,
        "static" => StaticKw,
        "abstract" => AbstractKw,
        "sealed" => SealedKw,
        "partial" => PartialKw,
        "readonly" => ReadonlyKw,
        "virtual" => VirtualKw,
        "override" => OverrideKw,
        "async" => AsyncKw,
        "namespace" => NamespaceKw,
        "class" => ClassKw,
        "struct" => StructKw,
        "interface" => InterfaceKw,
        "enum" => EnumKw,
        _ => return None,
    })
}

fn basic_keyword(word: &str) -> Option<SyntaxKind> {
    use SyntaxKind::*;
    Some(match word {
        "Public" => PublicKw,
        "Private" => PrivateKw,
        "Protected" => ProtectedKw,
        "Friend" => FriendKw,
        "Shared" => SharedKw,
        "MustInherit" => AbstractKw,
        "NotInheritable" => SealedKw,
        "Partial" => PartialKw,
        "ReadOnly" => ReadonlyKw,
        "Overridable" => VirtualKw,
        "Overrides" => OverrideKw,
        "Async" => AsyncKw,
        "Class" => ClassKw,
        "Structure" => StructureKw,
        "Interface" => InterfaceKw,
        "Module" => ModuleKw,
        "Enum" => EnumKw,
        "Sub" => SubKw,
        "Function" => FunctionKw,
        "End" => EndKw,
        "As" => AsKw,
        _ => return None,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    builder: TreeBuilder,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: TreeBuilder::new(),
        }
    }

    fn kind_at(&self, pos: usize) -> Option<SyntaxKind> {
        self.tokens.get(pos).map(|(kind, _)| *kind)
    }

    fn peek(&self) -> Option<SyntaxKind> {
        self.kind_at(self.pos)
    }

    fn bump(&mut self) {
        if let Some((kind, text)) = self.tokens.get(self.pos) {
            self.builder.token(*kind, text);
            self.pos += 1;
        }
    }

    fn bump_trivia(&mut self) {
        while self.peek().is_some_and(SyntaxKind::is_trivia) {
            self.bump();
        }
    }

    /// Bump a balanced `open ... close` run, optionally wrapped in a node
    fn balanced(&mut self, open: SyntaxKind, close: SyntaxKind, node: Option<SyntaxKind>) {
        if let Some(kind) = node {
            self.builder.start_node(kind);
        }
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
        }
        if node.is_some() {
            self.builder.finish_node();
        }
    }

    fn attribute_list(&mut self, close: SyntaxKind) {
        self.builder.start_node(SyntaxKind::AttributeList);
        self.bump();
        loop {
            self.bump_trivia();
            match self.peek() {
                None => break,
                Some(kind) if kind == close => {
                    self.bump();
                    break;
                }
                Some(SyntaxKind::Identifier) => {
                    self.builder.start_node(SyntaxKind::Attribute);
                    while matches!(self.peek(), Some(SyntaxKind::Identifier | SyntaxKind::Dot)) {
                        self.bump();
                    }
                    if self.peek() == Some(SyntaxKind::OpenParen) {
                        self.balanced(
                            SyntaxKind::OpenParen,
                            SyntaxKind::CloseParen,
                            Some(SyntaxKind::ArgumentList),
                        );
                    }
                    self.builder.finish_node();
                }
                Some(_) => self.bump(),
            }
        }
        self.builder.finish_node();
    }

    fn finish(self) -> GreenNode {
        self.builder.finish()
    }
}

/// Parse a brace-dialect fixture
pub fn parse_brace(source: &str) -> GreenNode {
    let mut parser = Parser::new(lex(source, brace_keyword));
    parser.builder.start_node(SyntaxKind::CompilationUnit);
    brace_members(&mut parser, false);
    while parser.peek().is_some() {
        parser.bump();
    }
    parser.builder.finish_node();
    parser.finish()
}

fn brace_members(parser: &mut Parser, in_enum: bool) {
    loop {
        parser.bump_trivia();
        match parser.peek() {
            None | Some(SyntaxKind::CloseBrace) => return,
            Some(SyntaxKind::Comma) if in_enum => parser.bump(),
            Some(_) if in_enum => {
                parser.builder.start_node(SyntaxKind::EnumMemberDeclaration);
                while parser.peek().is_some_and(|kind| {
                    !kind.is_trivia() && kind != SyntaxKind::Comma && kind != SyntaxKind::CloseBrace
                }) {
                    parser.bump();
                }
                parser.builder.finish_node();
            }
            Some(_) => brace_declaration(parser),
        }
    }
}

/// Declaration kind decided by the first telling token of the header
fn brace_declaration_kind(parser: &Parser) -> SyntaxKind {
    use SyntaxKind::*;
    let mut depth = 0usize;
    let mut pos = parser.pos;
    while let Some(kind) = parser.kind_at(pos) {
        match kind {
            OpenBracket => depth += 1,
            CloseBracket => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            NamespaceKw => return NamespaceDeclaration,
            ClassKw => return ClassDeclaration,
            StructKw => return StructDeclaration,
            InterfaceKw => return InterfaceDeclaration,
            EnumKw => return EnumDeclaration,
            OpenParen => return MethodDeclaration,
            Semicolon | Equals => return FieldDeclaration,
            OpenBrace => return PropertyDeclaration,
            _ => {}
        }
        pos += 1;
    }
    Error
}

fn brace_declaration(parser: &mut Parser) {
    use SyntaxKind::*;
    let kind = brace_declaration_kind(parser);
    parser.builder.start_node(kind);
    let mut in_head = true;
    loop {
        match parser.peek() {
            None => break,
            Some(OpenBracket) if in_head => parser.attribute_list(CloseBracket),
            Some(OpenParen) if kind == MethodDeclaration => {
                parser.balanced(OpenParen, CloseParen, Some(ParameterList));
            }
            Some(Semicolon) => {
                parser.bump();
                break;
            }
            Some(OpenBrace) => {
                match kind {
                    ClassDeclaration | StructDeclaration | InterfaceDeclaration
                    | NamespaceDeclaration => {
                        parser.bump();
                        brace_members(parser, false);
                        parser.bump();
                    }
                    EnumDeclaration => {
                        parser.bump();
                        brace_members(parser, true);
                        parser.bump();
                    }
                    MethodDeclaration => parser.balanced(OpenBrace, CloseBrace, Some(Block)),
                    _ => parser.balanced(OpenBrace, CloseBrace, None),
                }
                break;
            }
            Some(token) => {
                if !token.is_trivia() {
                    in_head = false;
                }
                parser.bump();
            }
        }
    }
    parser.builder.finish_node();
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BasicContext {
    File,
    Type,
    Interface,
    Enum,
    Method,
}

/// Parse a basic-dialect fixture
pub fn parse_basic(source: &str) -> GreenNode {
    let mut parser = Parser::new(lex(source, basic_keyword));
    parser.builder.start_node(SyntaxKind::CompilationUnit);
    basic_lines(&mut parser, BasicContext::File);
    while parser.peek().is_some() {
        parser.bump();
    }
    parser.builder.finish_node();
    parser.finish()
}

fn basic_lines(parser: &mut Parser, context: BasicContext) {
    loop {
        parser.bump_trivia();
        match parser.peek() {
            None | Some(SyntaxKind::EndKw) => return,
            Some(_) => basic_line(parser, context),
        }
    }
}

/// Block and header kinds for the declaration keyword on the current line
fn basic_header(parser: &Parser) -> Option<(SyntaxKind, SyntaxKind)> {
    use SyntaxKind::*;
    let mut depth = 0usize;
    let mut pos = parser.pos;
    while let Some(kind) = parser.kind_at(pos) {
        match kind {
            Newline => return None,
            LessThan => depth += 1,
            GreaterThan => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            ClassKw => return Some((ClassBlock, ClassStatement)),
            StructureKw => return Some((StructureBlock, StructureStatement)),
            InterfaceKw => return Some((InterfaceBlock, InterfaceStatement)),
            ModuleKw => return Some((ModuleBlock, ModuleStatement)),
            EnumKw => return Some((EnumBlock, EnumStatement)),
            SubKw => return Some((MethodBlock, SubStatement)),
            FunctionKw => return Some((MethodBlock, FunctionStatement)),
            _ => {}
        }
        pos += 1;
    }
    None
}

fn basic_line(parser: &mut Parser, context: BasicContext) {
    let Some((block, header)) = basic_header(parser) else {
        let wrap = context == BasicContext::Enum;
        if wrap {
            parser.builder.start_node(SyntaxKind::EnumMemberStatement);
        }
        while parser.peek().is_some_and(|kind| kind != SyntaxKind::Newline) {
            parser.bump();
        }
        if wrap {
            parser.builder.finish_node();
        }
        return;
    };

    // Interface members are bare headers without a body or `End`
    let bodiless = context == BasicContext::Interface && block == SyntaxKind::MethodBlock;
    if !bodiless {
        parser.builder.start_node(block);
    }
    basic_statement(parser, header);
    if bodiless {
        return;
    }

    let inner = match block {
        SyntaxKind::InterfaceBlock => BasicContext::Interface,
        SyntaxKind::EnumBlock => BasicContext::Enum,
        SyntaxKind::MethodBlock => BasicContext::Method,
        _ => BasicContext::Type,
    };
    basic_lines(parser, inner);
    if parser.peek() == Some(SyntaxKind::EndKw) {
        parser.builder.start_node(SyntaxKind::EndBlockStatement);
        while parser.peek().is_some_and(|kind| kind != SyntaxKind::Newline) {
            parser.bump();
        }
        parser.builder.finish_node();
    }
    parser.builder.finish_node();
}

fn basic_statement(parser: &mut Parser, header: SyntaxKind) {
    use SyntaxKind::*;
    parser.builder.start_node(header);
    let mut in_head = true;
    loop {
        match parser.peek() {
            None | Some(Newline) => break,
            Some(LessThan) if in_head => parser.attribute_list(GreaterThan),
            Some(OpenParen) => parser.balanced(OpenParen, CloseParen, Some(ParameterList)),
            Some(token) => {
                if !token.is_trivia() {
                    in_head = false;
                }
                parser.bump();
            }
        }
    }
    parser.builder.finish_node();
}

/// First node of `kind` in preorder
pub fn find(document: &Document, kind: SyntaxKind) -> SyntaxNode {
    document
        .syntax()
        .descendants()
        .find(|node| node.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} in {:?}", document.text()))
}
