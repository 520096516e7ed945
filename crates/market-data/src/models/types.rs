use std::borrow::Cow;

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// Currency code (ISO 4217) - mostly static
pub type Currency = Cow<'static, str>;

/// Source label stamped on values served from the static fallback literal.
pub const SOURCE_FALLBACK: &str = "fallback";
