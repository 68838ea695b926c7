//! Persisted line formats exchanged between stages.
//!
//! One record per line, whitespace-separated unsigned decimal integers, no header:
//! - canonicalizer: `"<subset> <orbit>"`
//! - constraint counter: `"<coloring> <fringe> <count>"`
//!
//! Readers skip blank lines and report the 1-based line number on failure.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Canonical vertex subset with its number of distinct automorphism images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalRecord {
    pub subset: u64,
    pub orbit: u64,
}

/// Nonzero orientation count for one (boundary coloring, fringe) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SatRecord {
    pub coloring: u32,
    pub fringe: u32,
    pub count: u64,
}

impl fmt::Display for CanonicalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.subset, self.orbit)
    }
}

impl fmt::Display for SatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.coloring, self.fringe, self.count)
    }
}

/// Split a line into exactly `N` unsigned fields.
fn fields<const N: usize>(s: &str) -> std::result::Result<[u64; N], String> {
    let mut out = [0u64; N];
    let mut it = s.split_whitespace();
    for (i, slot) in out.iter_mut().enumerate() {
        let tok = it
            .next()
            .ok_or_else(|| format!("expected {N} fields, found {i}"))?;
        *slot = tok
            .parse()
            .map_err(|e| format!("field {}: {e} ({tok:?})", i + 1))?;
    }
    if it.next().is_some() {
        return Err(format!("expected {N} fields, found more"));
    }
    Ok(out)
}

impl FromStr for CanonicalRecord {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let [subset, orbit] = fields::<2>(s)?;
        Ok(Self { subset, orbit })
    }
}

impl FromStr for SatRecord {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let [coloring, fringe, count] = fields::<3>(s)?;
        let narrow = |x: u64, what: &str| {
            u32::try_from(x).map_err(|_| format!("{what} {x} exceeds 32 bits"))
        };
        Ok(Self {
            coloring: narrow(coloring, "coloring")?,
            fringe: narrow(fringe, "fringe")?,
            count,
        })
    }
}

fn read_lines<T, R>(reader: R) -> Result<Vec<T>>
where
    R: BufRead,
    T: FromStr<Err = String>,
{
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(line.parse().map_err(|e| Error::parse(idx + 1, e))?);
    }
    Ok(out)
}

pub fn read_canonical<R: BufRead>(reader: R) -> Result<Vec<CanonicalRecord>> {
    read_lines(reader)
}

pub fn read_sat<R: BufRead>(reader: R) -> Result<Vec<SatRecord>> {
    read_lines(reader)
}
