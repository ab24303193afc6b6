use anyhow::{bail, format_err, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// dpkg style package version.
///
/// Implements the comparison algorithm of Debian Policy §5.6.12:
/// https://www.debian.org/doc/debian-policy/ch-controlfields.html#version
///
/// Every relational operator derives from the one [`Ord`] impl in `ord.rs`,
/// so versions that render differently may still be equal (`1.0-0` and
/// `1.0`, or `0:1.0` and `1.0`).
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "&str")]
pub struct PkgVersion {
    pub(crate) epoch: u64,
    pub(crate) upstream: String,
    pub(crate) revision: String,
}

impl PkgVersion {
    /// Build a version from a raw version string and a separately supplied
    /// epoch. An empty epoch counts as zero. Everything before the last
    /// hyphen is the upstream version; a string without a hyphen has the
    /// default revision "0".
    pub fn new(version: &str, epoch: &str) -> Result<Self> {
        if version.is_empty() {
            bail!("Empty version string")
        }
        let epoch = match epoch {
            "" => 0,
            e => e
                .parse()
                .map_err(|_| format_err!("Malformed epoch: {}", e))?,
        };
        let (upstream, revision) = match version.rsplit_once('-') {
            Some((upstream, revision)) => (upstream.to_string(), revision.to_string()),
            None => (version.to_string(), "0".to_string()),
        };
        Ok(PkgVersion {
            epoch,
            upstream,
            revision,
        })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn upstream_version(&self) -> &str {
        &self.upstream
    }

    /// The revision part, "0" when the raw string carried none.
    pub fn debian_revision(&self) -> &str {
        &self.revision
    }
}

/// Split a leading `epoch:` off a combined version field.
///
/// `extract_epoch("2:9.8-7ubuntu6")` gives `(Some("2"), "9.8-7ubuntu6")`;
/// a string without a leading `<digits>:` prefix comes back whole.
pub fn extract_epoch(version: &str) -> (Option<&str>, &str) {
    lazy_static! {
        static ref EPOCH_PREFIX: Regex = Regex::new("^([0-9]+):").unwrap();
    }
    match EPOCH_PREFIX.captures(version) {
        Some(caps) => {
            let whole = caps.get(0).unwrap();
            let epoch = caps.get(1).unwrap();
            (Some(epoch.as_str()), &version[whole.end()..])
        }
        None => (None, version),
    }
}

impl TryFrom<&str> for PkgVersion {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self> {
        let (epoch, version) = extract_epoch(s);
        PkgVersion::new(version, epoch.unwrap_or(""))
    }
}

impl fmt::Display for PkgVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.upstream)?;
        if self.revision != "0" {
            write!(f, "-{}", self.revision)?;
        }
        Ok(())
    }
}

impl Serialize for PkgVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
