use super::PkgVersion;
use anyhow::{bail, format_err, Result};
use nom::{branch::alt, bytes::complete::tag, IResult};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A version constraint from a dpkg relationship field, e.g. `>= 2:9.8`.
///
/// dpkg spells strict comparison `<<` and `>>`; plain `<` and `>` are
/// accepted as deprecated spellings of `<=` and `>=`.
#[derive(PartialEq, Eq, Clone, Debug, Deserialize, Default)]
#[serde(try_from = "&str")]
pub struct VersionRequirement {
    // The bool marks the bound as inclusive
    pub lower_bound: Option<(PkgVersion, bool)>,
    pub upper_bound: Option<(PkgVersion, bool)>,
}

impl VersionRequirement {
    pub fn new() -> Self {
        VersionRequirement::default()
    }

    /// Check if this VersionRequirement accepts arbitrary versions
    pub fn is_any(&self) -> bool {
        self.lower_bound.is_none() && self.upper_bound.is_none()
    }

    /// Validate that some PkgVersion can satisfy this requirement
    pub fn valid(&self) -> bool {
        match (&self.lower_bound, &self.upper_bound) {
            (Some(lower), Some(upper)) => match lower.0.cmp(&upper.0) {
                Ordering::Greater => false,
                // must be both inclusive to be valid
                Ordering::Equal => lower.1 && upper.1,
                Ordering::Less => true,
            },
            _ => true,
        }
    }

    /// Check if a PkgVersion satisfies this requirement
    pub fn within(&self, ver: &PkgVersion) -> bool {
        if let Some((bound, inclusive)) = &self.lower_bound {
            if *inclusive {
                if ver < bound {
                    return false;
                }
            } else if ver <= bound {
                return false;
            }
        }

        if let Some((bound, inclusive)) = &self.upper_bound {
            if *inclusive {
                if ver > bound {
                    return false;
                }
            } else if ver >= bound {
                return false;
            }
        }

        true
    }
}

fn relation_op(i: &str) -> IResult<&str, &str> {
    alt((
        tag("<<"),
        tag(">>"),
        tag("<="),
        tag(">="),
        tag("="),
        tag("<"),
        tag(">"),
    ))(i)
}

impl TryFrom<&str> for VersionRequirement {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self> {
        if s == "any" {
            return Ok(VersionRequirement::default());
        }
        let (rest, op) =
            relation_op(s).map_err(|e| format_err!("Malformed version requirement {}: {}", s, e))?;
        let ver = PkgVersion::try_from(rest.trim())?;
        let mut res = VersionRequirement::default();
        match op {
            ">>" => res.lower_bound = Some((ver, false)),
            ">=" | ">" => res.lower_bound = Some((ver, true)),
            "=" => {
                res.lower_bound = Some((ver.clone(), true));
                res.upper_bound = Some((ver, true));
            }
            "<<" => res.upper_bound = Some((ver, false)),
            "<=" | "<" => res.upper_bound = Some((ver, true)),
            _ => unreachable!(),
        }
        if !res.valid() {
            bail!("Failed to parse version requirement: lower bound is greater than upper bound")
        }
        Ok(res)
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_any() {
            return write!(f, "any");
        }
        // An exact pin renders back as =ver
        if let (Some((lower, true)), Some((upper, true))) = (&self.lower_bound, &self.upper_bound) {
            if lower == upper {
                return write!(f, "={}", lower);
            }
        }
        let mut written = false;
        if let Some((bound, inclusive)) = &self.lower_bound {
            write!(f, "{}{}", if *inclusive { ">=" } else { ">>" }, bound)?;
            written = true;
        }
        if let Some((bound, inclusive)) = &self.upper_bound {
            if written {
                write!(f, ", ")?;
            }
            write!(f, "{}{}", if *inclusive { "<=" } else { "<<" }, bound)?;
        }
        Ok(())
    }
}

impl Serialize for VersionRequirement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
