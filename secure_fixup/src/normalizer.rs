//! The normalizer capability and a minimal default implementation.

use log::trace;
use url::{Host, Url};

use crate::fixup::{FixupError, FixupFlags, FixupInfo};

/// Scheme prepended when the input does not carry one.
pub const DEFAULT_SCHEME: &str = "http";

/// Schemes the default normalizer accepts verbatim.
const KNOWN_SCHEMES: &[&str] = &[
    "about",
    "blob",
    "chrome",
    "data",
    "file",
    "ftp",
    "http",
    "https",
    "javascript",
    "mailto",
    "moz-extension",
    "resource",
    "view-source",
    "ws",
    "wss",
];

/// Turns address bar text into a navigable URI.
pub trait Normalizer {
    /// Fix up `input`, describing how the resulting URI was formed.
    fn fixup_info(&self, input: &str, flags: FixupFlags) -> Result<FixupInfo, FixupError>;

    /// Preferred URI for `input`, or `None` when no URI could be formed.
    fn fixup_uri(&self, input: &str, flags: FixupFlags) -> Option<Url> {
        self.fixup_info(input, flags).ok().and_then(|info| info.preferred_uri)
    }

    /// Copy of `uri` that is safe to show to the user.
    fn exposable_uri(&self, uri: &Url) -> Url {
        let mut exposable = uri.clone();

        // Both fail only for URIs that cannot carry credentials in the first place.
        let _ = exposable.set_password(None);
        let _ = exposable.set_username("");

        exposable
    }
}

impl<N: Normalizer + ?Sized> Normalizer for &N {
    fn fixup_info(&self, input: &str, flags: FixupFlags) -> Result<FixupInfo, FixupError> {
        (**self).fixup_info(input, flags)
    }

    fn fixup_uri(&self, input: &str, flags: FixupFlags) -> Option<Url> {
        (**self).fixup_uri(input, flags)
    }

    fn exposable_uri(&self, uri: &Url) -> Url {
        (**self).exposable_uri(uri)
    }
}

impl<N: Normalizer + ?Sized> Normalizer for Box<N> {
    fn fixup_info(&self, input: &str, flags: FixupFlags) -> Result<FixupInfo, FixupError> {
        (**self).fixup_info(input, flags)
    }

    fn fixup_uri(&self, input: &str, flags: FixupFlags) -> Option<Url> {
        (**self).fixup_uri(input, flags)
    }

    fn exposable_uri(&self, uri: &Url) -> Url {
        (**self).exposable_uri(uri)
    }
}

/// Small stand-in for a browser's fixup engine.
///
/// Explicit, known schemes are kept as typed. Anything else gets [`DEFAULT_SCHEME`] prepended,
/// which includes `host:port` input like `localhost:8080`. There is no keyword search, typo
/// correction or alternate URI generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultNormalizer {
    whitelisted_hosts: Vec<String>,
}

impl Default for DefaultNormalizer {
    fn default() -> Self {
        Self { whitelisted_hosts: vec![String::from("localhost")] }
    }
}

impl DefaultNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single label hosts accepted with [`FixupFlags::REQUIRE_WHITELISTED_HOST`].
    pub fn with_whitelisted_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let whitelisted_hosts = hosts.into_iter().map(|host| host.into().to_ascii_lowercase());
        Self { whitelisted_hosts: whitelisted_hosts.collect() }
    }

    fn is_whitelisted(&self, uri: &Url) -> bool {
        match uri.host() {
            Some(Host::Domain(domain)) => {
                domain.contains('.')
                    || self.whitelisted_hosts.iter().any(|host| host.eq_ignore_ascii_case(domain))
            },
            Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
            None => false,
        }
    }
}

impl Normalizer for DefaultNormalizer {
    fn fixup_info(&self, input: &str, flags: FixupFlags) -> Result<FixupInfo, FixupError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FixupError::EmptyInput);
        }

        let explicit = match scheme_prefix(trimmed) {
            Some(scheme) => {
                KNOWN_SCHEMES.iter().any(|known| known.eq_ignore_ascii_case(scheme))
                    || trimmed[scheme.len()..].starts_with("://")
            },
            None => false,
        };

        let text =
            if explicit { trimmed.to_string() } else { format!("{DEFAULT_SCHEME}://{trimmed}") };
        let uri = Url::parse(&text)
            .map_err(|source| FixupError::InvalidUri { input: input.to_string(), source })?;

        if !explicit
            && flags.contains(FixupFlags::REQUIRE_WHITELISTED_HOST)
            && !self.is_whitelisted(&uri)
        {
            let host = uri.host_str().unwrap_or_default().to_string();
            return Err(FixupError::HostNotWhitelisted { host });
        }

        trace!("Fixed up {input:?} to {uri} (scheme synthesized: {})", !explicit);

        Ok(FixupInfo::new(input).with_uri(uri, !explicit))
    }
}

/// Leading scheme token of `text`, without its colon.
fn scheme_prefix(text: &str) -> Option<&str> {
    let (scheme, _) = text.split_once(':')?;

    let mut bytes = scheme.bytes();
    let valid = bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));

    valid.then_some(scheme)
}
