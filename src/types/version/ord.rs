use super::PkgVersion;
use std::cmp::Ordering;

/// The dpkg version comparison: epoch first, then the upstream part, then
/// the revision part.
impl Ord for PkgVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_part(&self.upstream, &other.upstream))
            .then_with(|| compare_part(&self.revision, &other.revision))
    }
}

impl PartialOrd for PkgVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality must agree with Ord, so it goes through cmp instead of a field
// comparison ("1.0" and "1.00" are the same version).
impl PartialEq for PkgVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PkgVersion {}

/// Split a version part into alternating (non-digit run, digit run) pairs.
/// Either run of a pair may be empty, so two parts walked pair-by-pair
/// always line up string-against-string and digits-against-digits.
fn listify(mut s: &str) -> Vec<(&str, &str)> {
    let mut runs = Vec::new();
    while !s.is_empty() {
        let alpha_len = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
        let (alphas, rest) = s.split_at(alpha_len);
        let digit_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, rest) = rest.split_at(digit_len);
        runs.push((alphas, digits));
        s = rest;
    }
    runs
}

/// Rank of a character in the modified lexical order: a tilde sorts before
/// anything (even the end of the part, which ranks 0), letters sort before
/// all non-letters, and the rest go by code point.
fn char_rank(c: char) -> i32 {
    match c {
        '~' => -1,
        c if c.is_ascii_alphabetic() => c as i32,
        c => c as i32 + 256,
    }
}

fn compare_nondigits(a: &str, b: &str) -> Ordering {
    let mut x = a.chars();
    let mut y = b.chars();
    loop {
        match (x.next(), y.next()) {
            (None, None) => return Ordering::Equal,
            (cx, cy) => {
                let rank = cx.map_or(0, char_rank).cmp(&cy.map_or(0, char_rank));
                if rank != Ordering::Equal {
                    return rank;
                }
            }
        }
    }
}

/// Numeric comparison of two digit runs of arbitrary length. An empty run
/// counts as zero.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare one upstream-version or revision part of two versions.
fn compare_part(a: &str, b: &str) -> Ordering {
    let xs = listify(a);
    let ys = listify(b);
    let mut i = 0;
    loop {
        match (xs.get(i), ys.get(i)) {
            (None, None) => return Ordering::Equal,
            // The side with runs left over sorts later, unless it continues
            // with a tilde, which sorts before even the end of the part
            (Some((alphas, _)), None) => {
                return if alphas.starts_with('~') {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }
            (None, Some((alphas, _))) => {
                return if alphas.starts_with('~') {
                    Ordering::Greater
                } else {
                    Ordering::Less
                };
            }
            (Some((xa, xd)), Some((ya, yd))) => {
                let ord = compare_nondigits(xa, ya).then_with(|| compare_digits(xd, yd));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
        i += 1;
    }
}
