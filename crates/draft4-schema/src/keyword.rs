//! # Keyword Table
//!
//! The closed set of draft-4 keywords the compiler gives typed meaning to.
//! Anything not listed here compiles to an opaque constraint.

use std::fmt;

/// A recognized draft-4 keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Maximum,
    ExclusiveMaximum,
    Minimum,
    ExclusiveMinimum,
    MultipleOf,
    MaxLength,
    MinLength,
    Pattern,
    MaxItems,
    MinItems,
    Items,
    AdditionalItems,
    Properties,
    PatternProperties,
    AdditionalProperties,
    Required,
    MaxProperties,
    MinProperties,
    Dependencies,
    AllOf,
    AnyOf,
    OneOf,
    Not,
    Enum,
    Type,
    Ref,
}

impl Keyword {
    /// Every recognized keyword.
    pub const ALL: [Keyword; 26] = [
        Keyword::Maximum,
        Keyword::ExclusiveMaximum,
        Keyword::Minimum,
        Keyword::ExclusiveMinimum,
        Keyword::MultipleOf,
        Keyword::MaxLength,
        Keyword::MinLength,
        Keyword::Pattern,
        Keyword::MaxItems,
        Keyword::MinItems,
        Keyword::Items,
        Keyword::AdditionalItems,
        Keyword::Properties,
        Keyword::PatternProperties,
        Keyword::AdditionalProperties,
        Keyword::Required,
        Keyword::MaxProperties,
        Keyword::MinProperties,
        Keyword::Dependencies,
        Keyword::AllOf,
        Keyword::AnyOf,
        Keyword::OneOf,
        Keyword::Not,
        Keyword::Enum,
        Keyword::Type,
        Keyword::Ref,
    ];

    /// Look up a keyword by its spelling in a schema document.
    pub fn from_name(name: &str) -> Option<Self> {
        let keyword = match name {
            "maximum" => Self::Maximum,
            "exclusiveMaximum" => Self::ExclusiveMaximum,
            "minimum" => Self::Minimum,
            "exclusiveMinimum" => Self::ExclusiveMinimum,
            "multipleOf" => Self::MultipleOf,
            "maxLength" => Self::MaxLength,
            "minLength" => Self::MinLength,
            "pattern" => Self::Pattern,
            "maxItems" => Self::MaxItems,
            "minItems" => Self::MinItems,
            "items" => Self::Items,
            "additionalItems" => Self::AdditionalItems,
            "properties" => Self::Properties,
            "patternProperties" => Self::PatternProperties,
            "additionalProperties" => Self::AdditionalProperties,
            "required" => Self::Required,
            "maxProperties" => Self::MaxProperties,
            "minProperties" => Self::MinProperties,
            "dependencies" => Self::Dependencies,
            "allOf" => Self::AllOf,
            "anyOf" => Self::AnyOf,
            "oneOf" => Self::OneOf,
            "not" => Self::Not,
            "enum" => Self::Enum,
            "type" => Self::Type,
            "$ref" => Self::Ref,
            _ => return None,
        };
        Some(keyword)
    }

    /// The spelling used in schema documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Maximum => "maximum",
            Self::ExclusiveMaximum => "exclusiveMaximum",
            Self::Minimum => "minimum",
            Self::ExclusiveMinimum => "exclusiveMinimum",
            Self::MultipleOf => "multipleOf",
            Self::MaxLength => "maxLength",
            Self::MinLength => "minLength",
            Self::Pattern => "pattern",
            Self::MaxItems => "maxItems",
            Self::MinItems => "minItems",
            Self::Items => "items",
            Self::AdditionalItems => "additionalItems",
            Self::Properties => "properties",
            Self::PatternProperties => "patternProperties",
            Self::AdditionalProperties => "additionalProperties",
            Self::Required => "required",
            Self::MaxProperties => "maxProperties",
            Self::MinProperties => "minProperties",
            Self::Dependencies => "dependencies",
            Self::AllOf => "allOf",
            Self::AnyOf => "anyOf",
            Self::OneOf => "oneOf",
            Self::Not => "not",
            Self::Enum => "enum",
            Self::Type => "type",
            Self::Ref => "$ref",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
