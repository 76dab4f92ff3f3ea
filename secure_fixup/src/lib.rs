//! Address bar URI fixup preferring `https` when no scheme was typed.
//!
//! A [`Normalizer`] turns free text into a URI, usually by prepending `http://` when the text
//! has no scheme. Wrapping it in a [`SchemeUpgradingNormalizer`] rewrites exactly that
//! synthesized `http` to `https` and leaves everything else alone:
//!
//! ```
//! use secure_fixup::{DefaultNormalizer, FixupFlags, Normalizer, SchemeUpgradingNormalizer};
//!
//! let normalizer = SchemeUpgradingNormalizer::new(DefaultNormalizer::new());
//!
//! let uri = normalizer.fixup_uri("example.com/docs", FixupFlags::empty()).unwrap();
//! assert_eq!(uri.as_str(), "https://example.com/docs");
//!
//! let uri = normalizer.fixup_uri("http://example.com", FixupFlags::empty()).unwrap();
//! assert_eq!(uri.as_str(), "http://example.com/");
//! ```

pub mod config;
pub mod fixup;
pub mod normalizer;
pub mod upgrade;

pub use crate::fixup::{FixupError, FixupFlags, FixupInfo};
pub use crate::normalizer::{DefaultNormalizer, Normalizer};
pub use crate::upgrade::{Decision, SchemeUpgradingNormalizer, UpgradePolicy, decide};
