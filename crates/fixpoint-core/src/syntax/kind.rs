//! Syntax kinds shared by both front-end dialects
//!
//! Token and node kinds live in one enum so a rowan tree carries either
//! dialect. Kinds that only one dialect produces report it through
//! [`SyntaxKind::dialect`]; shared kinds (trivia, punctuation, attribute lists)
//! return `None`.

use serde::{Deserialize, Serialize};

use super::Dialect;

/// Kind tag of every token and node in a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum SyntaxKind {
    // Trivia
    Whitespace = 0,
    Newline,
    LineComment,
    BlockComment,

    // Punctuation
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    LessThan,
    GreaterThan,
    Comma,
    Semicolon,
    Dot,
    Colon,
    Equals,

    // Literals & identifiers
    Identifier,
    StringLiteral,
    NumberLiteral,

    // Accessibility keywords
    PublicKw,
    PrivateKw,
    ProtectedKw,
    InternalKw,
    FriendKw,

    // Other modifiers
    StaticKw,
    SharedKw,
    AbstractKw,
    SealedKw,
    PartialKw,
    ReadonlyKw,
    VirtualKw,
    OverrideKw,
    AsyncKw,

    // Declaration keywords
    NamespaceKw,
    ClassKw,
    StructKw,
    StructureKw,
    InterfaceKw,
    EnumKw,
    ModuleKw,
    SubKw,
    FunctionKw,
    EndKw,
    AsKw,

    // Shared nodes
    CompilationUnit,
    AttributeList,
    Attribute,
    ArgumentList,
    ParameterList,
    Error,

    // Brace dialect nodes
    NamespaceDeclaration,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumMemberDeclaration,
    MethodDeclaration,
    FieldDeclaration,
    PropertyDeclaration,
    Block,

    // Basic dialect nodes
    ClassBlock,
    ClassStatement,
    StructureBlock,
    StructureStatement,
    InterfaceBlock,
    InterfaceStatement,
    ModuleBlock,
    ModuleStatement,
    EnumBlock,
    EnumStatement,
    EnumMemberStatement,
    MethodBlock,
    SubStatement,
    FunctionStatement,
    EndBlockStatement,
}

impl SyntaxKind {
    /// Every kind in discriminant order
    pub const ALL: &'static [SyntaxKind] = &[
        SyntaxKind::Whitespace,
        SyntaxKind::Newline,
        SyntaxKind::LineComment,
        SyntaxKind::BlockComment,
        SyntaxKind::OpenBracket,
        SyntaxKind::CloseBracket,
        SyntaxKind::OpenParen,
        SyntaxKind::CloseParen,
        SyntaxKind::OpenBrace,
        SyntaxKind::CloseBrace,
        SyntaxKind::LessThan,
        SyntaxKind::GreaterThan,
        SyntaxKind::Comma,
        SyntaxKind::Semicolon,
        SyntaxKind::Dot,
        SyntaxKind::Colon,
        SyntaxKind::Equals,
        SyntaxKind::Identifier,
        SyntaxKind::StringLiteral,
        SyntaxKind::NumberLiteral,
        SyntaxKind::PublicKw,
        SyntaxKind::PrivateKw,
        SyntaxKind::ProtectedKw,
        SyntaxKind::InternalKw,
        SyntaxKind::FriendKw,
        SyntaxKind::StaticKw,
        SyntaxKind::SharedKw,
        SyntaxKind::AbstractKw,
        SyntaxKind::SealedKw,
        SyntaxKind::PartialKw,
        SyntaxKind::ReadonlyKw,
        SyntaxKind::VirtualKw,
        SyntaxKind::OverrideKw,
        SyntaxKind::AsyncKw,
        SyntaxKind::NamespaceKw,
        SyntaxKind::ClassKw,
        SyntaxKind::StructKw,
        SyntaxKind::StructureKw,
        SyntaxKind::InterfaceKw,
        SyntaxKind::EnumKw,
        SyntaxKind::ModuleKw,
        SyntaxKind::SubKw,
        SyntaxKind::FunctionKw,
        SyntaxKind::EndKw,
        SyntaxKind::AsKw,
        SyntaxKind::CompilationUnit,
        SyntaxKind::AttributeList,
        SyntaxKind::Attribute,
        SyntaxKind::ArgumentList,
        SyntaxKind::ParameterList,
        SyntaxKind::Error,
        SyntaxKind::NamespaceDeclaration,
        SyntaxKind::ClassDeclaration,
        SyntaxKind::StructDeclaration,
        SyntaxKind::InterfaceDeclaration,
        SyntaxKind::EnumDeclaration,
        SyntaxKind::EnumMemberDeclaration,
        SyntaxKind::MethodDeclaration,
        SyntaxKind::FieldDeclaration,
        SyntaxKind::PropertyDeclaration,
        SyntaxKind::Block,
        SyntaxKind::ClassBlock,
        SyntaxKind::ClassStatement,
        SyntaxKind::StructureBlock,
        SyntaxKind::StructureStatement,
        SyntaxKind::InterfaceBlock,
        SyntaxKind::InterfaceStatement,
        SyntaxKind::ModuleBlock,
        SyntaxKind::ModuleStatement,
        SyntaxKind::EnumBlock,
        SyntaxKind::EnumStatement,
        SyntaxKind::EnumMemberStatement,
        SyntaxKind::MethodBlock,
        SyntaxKind::SubStatement,
        SyntaxKind::FunctionStatement,
        SyntaxKind::EndBlockStatement,
    ];

    /// Look a kind up by its raw discriminant
    pub fn from_raw(raw: u16) -> Option<SyntaxKind> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Whitespace, line breaks and comments
    pub fn is_trivia(self) -> bool {
        self.is_whitespace() || self.is_comment()
    }

    pub fn is_whitespace(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Newline)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, SyntaxKind::LineComment | SyntaxKind::BlockComment)
    }

    /// Keywords that declare accessibility in either dialect
    pub fn is_accessibility_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::InternalKw
                | SyntaxKind::FriendKw
        )
    }

    pub fn is_modifier_keyword(self) -> bool {
        self.is_accessibility_keyword()
            || matches!(
                self,
                SyntaxKind::StaticKw
                    | SyntaxKind::SharedKw
                    | SyntaxKind::AbstractKw
                    | SyntaxKind::SealedKw
                    | SyntaxKind::PartialKw
                    | SyntaxKind::ReadonlyKw
                    | SyntaxKind::VirtualKw
                    | SyntaxKind::OverrideKw
                    | SyntaxKind::AsyncKw
            )
    }

    /// The dialect that produces this kind, `None` for shared kinds
    pub fn dialect(self) -> Option<Dialect> {
        use SyntaxKind::*;
        match self {
            NamespaceDeclaration | ClassDeclaration | StructDeclaration | InterfaceDeclaration
            | EnumDeclaration | EnumMemberDeclaration | MethodDeclaration | FieldDeclaration
            | PropertyDeclaration | Block | InternalKw | StructKw | StaticKw | SealedKw
            | ReadonlyKw | NamespaceKw => Some(Dialect::Brace),
            ClassBlock | ClassStatement | StructureBlock | StructureStatement | InterfaceBlock
            | InterfaceStatement | ModuleBlock | ModuleStatement | EnumBlock | EnumStatement
            | EnumMemberStatement | MethodBlock | SubStatement | FunctionStatement
            | EndBlockStatement | FriendKw | StructureKw | SharedKw | ModuleKw | SubKw
            | FunctionKw | EndKw | AsKw => Some(Dialect::Basic),
            _ => None,
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}
