//! Fixup results produced by a [`Normalizer`](crate::normalizer::Normalizer).

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use bitflags::bitflags;
use serde::Serialize;
use url::Url;

bitflags! {
    /// Behavior switches forwarded to the normalizer.
    ///
    /// Values match the host browser's fixup interface, so flags received from it can be passed
    /// through with [`FixupFlags::from_bits_truncate`].
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct FixupFlags: u32 {
        const ALLOW_KEYWORD_LOOKUP     = 0b0001;
        const MAKE_ALTERNATE_URI       = 0b0010;
        const REQUIRE_WHITELISTED_HOST = 0b0100;
        const FIX_SCHEME_TYPOS         = 0b1000;
    }
}

/// Best-effort interpretation of address bar text.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FixupInfo {
    /// The text the normalizer was asked to fix up.
    pub original_input: String,

    /// The URI that should be loaded, if one could be formed.
    pub preferred_uri: Option<Url>,

    /// The fixed up URI before any alternate was picked.
    pub fixed_uri: Option<Url>,

    /// Keyword sent to a search provider, if the input was treated as a search.
    pub keyword_as_sent: Option<String>,

    /// The normalizer added or changed the scheme because the input did not carry one.
    pub scheme_was_synthesized: bool,

    /// The normalizer replaced the fixed URI with an alternate one.
    pub created_alternate_uri: bool,
}

impl FixupInfo {
    pub fn new(original_input: impl Into<String>) -> Self {
        Self {
            original_input: original_input.into(),
            preferred_uri: None,
            fixed_uri: None,
            keyword_as_sent: None,
            scheme_was_synthesized: false,
            created_alternate_uri: false,
        }
    }

    /// Set both the fixed and preferred URI.
    pub fn with_uri(mut self, uri: Url, scheme_was_synthesized: bool) -> Self {
        self.fixed_uri = Some(uri.clone());
        self.preferred_uri = Some(uri);
        self.scheme_was_synthesized = scheme_was_synthesized;
        self
    }

    /// Scheme of the preferred URI.
    pub fn preferred_scheme(&self) -> Option<&str> {
        self.preferred_uri.as_ref().map(Url::scheme)
    }
}

/// Normalizer failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixupError {
    /// Nothing but whitespace was entered.
    EmptyInput,

    /// Host is a single label that is not whitelisted.
    HostNotWhitelisted { host: String },

    /// The text could not be turned into a URI.
    InvalidUri { input: String, source: url::ParseError },
}

impl Error for FixupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FixupError::InvalidUri { source, .. } => Some(source),
            FixupError::EmptyInput | FixupError::HostNotWhitelisted { .. } => None,
        }
    }
}

impl Display for FixupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FixupError::EmptyInput => write!(f, "Input is empty"),
            FixupError::HostNotWhitelisted { host } => {
                write!(f, "Host {host:?} is not whitelisted")
            },
            FixupError::InvalidUri { input, source } => {
                write!(f, "Unable to build a URI from {input:?}: {source}")
            },
        }
    }
}
