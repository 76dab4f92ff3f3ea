//! Upgrade synthesized `http` schemes to `https`.
//!
//! A normalizer prepends `http://` whenever the typed text has no scheme. When that happened and
//! the text does not start with anything resembling a scheme, the scheme is rewritten to
//! `https`. Explicit schemes, including an explicit `http`, are never touched.

use std::fmt::{self, Display, Formatter};
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use url::{Host, Url};

use crate::fixup::{FixupError, FixupFlags, FixupInfo};
use crate::normalizer::{DEFAULT_SCHEME, Normalizer};

/// Scheme written over a synthesized [`DEFAULT_SCHEME`].
pub const SECURE_SCHEME: &str = "https";

/// RFC 3986 scheme token followed by its colon.
static SCHEME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z][a-z0-9+.-]*:").expect("scheme token pattern is valid")
});

/// Knobs for the upgrade decision.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct UpgradePolicy {
    /// Keep `http` for `localhost` and loopback addresses.
    pub exempt_local_hosts: bool,
}

/// Outcome of a single upgrade decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No URI could be formed.
    NoPreferredUri,

    /// The scheme was typed by the user.
    SchemeExplicit,

    /// The synthesized scheme is not the default one.
    NotDefaultScheme,

    /// The input starts with something that looks like a scheme.
    SchemeLikePrefix,

    /// Local host exempted by [`UpgradePolicy::exempt_local_hosts`].
    LocalHost,

    /// The scheme was rewritten to [`SECURE_SCHEME`].
    Upgraded,
}

impl Decision {
    pub fn is_upgraded(self) -> bool {
        self == Decision::Upgraded
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Decision::NoPreferredUri => "no preferred URI",
            Decision::SchemeExplicit => "scheme was explicit",
            Decision::NotDefaultScheme => "synthesized scheme is not the default",
            Decision::SchemeLikePrefix => "input starts with a scheme-like token",
            Decision::LocalHost => "local host is exempt",
            Decision::Upgraded => "upgraded",
        };
        f.write_str(reason)
    }
}

/// Upgrade the scheme of `result` if it was synthesized from `raw_input`.
///
/// `raw_input` must be the exact text the normalizer produced `result` from. An absent result
/// is passed through as is.
pub fn decide(raw_input: &str, result: Option<FixupInfo>) -> Option<FixupInfo> {
    result.map(|mut info| {
        upgrade_in_place(raw_input, &mut info, &UpgradePolicy::default());
        info
    })
}

/// Upgrade the preferred URI of `info` in place.
///
/// Only the scheme of [`FixupInfo::preferred_uri`] is ever modified.
pub fn upgrade_in_place(raw_input: &str, info: &mut FixupInfo, policy: &UpgradePolicy) -> Decision {
    let decision = evaluate(raw_input, info, policy);
    if decision != Decision::Upgraded {
        return decision;
    }

    let Some(uri) = info.preferred_uri.as_mut() else {
        return Decision::NoPreferredUri;
    };

    // Never fails between two special schemes, but the URI must stay untouched if it does.
    if uri.set_scheme(SECURE_SCHEME).is_err() {
        warn!("Unable to switch {uri} to {SECURE_SCHEME}");
        return Decision::NotDefaultScheme;
    }

    Decision::Upgraded
}

fn evaluate(raw_input: &str, info: &FixupInfo, policy: &UpgradePolicy) -> Decision {
    let Some(uri) = info.preferred_uri.as_ref() else {
        return Decision::NoPreferredUri;
    };

    if !info.scheme_was_synthesized {
        return Decision::SchemeExplicit;
    }

    if uri.scheme() != DEFAULT_SCHEME {
        return Decision::NotDefaultScheme;
    }

    if SCHEME_TOKEN.is_match(raw_input) {
        return Decision::SchemeLikePrefix;
    }

    if policy.exempt_local_hosts && is_local_host(uri) {
        return Decision::LocalHost;
    }

    Decision::Upgraded
}

fn is_local_host(uri: &Url) -> bool {
    match uri.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(addr)) => addr.is_loopback() || addr.is_unspecified(),
        Some(Host::Ipv6(addr)) => addr.is_loopback(),
        None => false,
    }
}

/// Normalizer decorator preferring `https` when the input had no scheme.
#[derive(Debug, Default, Clone)]
pub struct SchemeUpgradingNormalizer<N> {
    inner: N,
    policy: UpgradePolicy,
}

impl<N: Normalizer> SchemeUpgradingNormalizer<N> {
    pub fn new(inner: N) -> Self {
        Self::with_policy(inner, UpgradePolicy::default())
    }

    pub fn with_policy(inner: N, policy: UpgradePolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &UpgradePolicy {
        &self.policy
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }

    /// Remove the decorator, returning the wrapped normalizer.
    pub fn into_inner(self) -> N {
        self.inner
    }
}

impl<N: Normalizer> Normalizer for SchemeUpgradingNormalizer<N> {
    fn fixup_info(&self, input: &str, flags: FixupFlags) -> Result<FixupInfo, FixupError> {
        let mut info = self.inner.fixup_info(input, flags)?;

        let decision = upgrade_in_place(input, &mut info, &self.policy);
        debug!("Scheme upgrade for {input:?}: {decision}");

        Ok(info)
    }

    fn exposable_uri(&self, uri: &Url) -> Url {
        self.inner.exposable_uri(uri)
    }
}
