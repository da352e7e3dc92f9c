//! Repeat-variable diresidue (RVD) codes.
//!
//! Each base of a binding site is recognised by one TALE repeat whose RVD
//! determines the base it binds: `NI` → A, `HD` → C, `NN`/`NH` → G, `NG` → T.

use crate::config::GuanineCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of strong RVDs a qualified site carries.
pub const MIN_STRONG_RVDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rvd {
    #[serde(rename = "NI")]
    Ni,
    #[serde(rename = "HD")]
    Hd,
    #[serde(rename = "NN")]
    Nn,
    #[serde(rename = "NH")]
    Nh,
    #[serde(rename = "NG")]
    Ng,
}

impl Rvd {
    /// The RVD recognising `base` under the given guanine code.
    ///
    /// `base` must be one of `ACGT`; other bytes map to `NG`, which never
    /// happens for a validated sequence.
    #[inline]
    pub fn for_base(base: u8, guanine: GuanineCode) -> Rvd {
        match base {
            b'A' => Rvd::Ni,
            b'C' => Rvd::Hd,
            b'G' => match guanine {
                GuanineCode::Nh => Rvd::Nh,
                GuanineCode::Nn => Rvd::Nn,
            },
            _ => Rvd::Ng,
        }
    }

    /// `NN` and `HD` bind with higher confidence.
    #[inline]
    pub fn is_strong(self) -> bool {
        matches!(self, Rvd::Nn | Rvd::Hd)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rvd::Ni => "NI",
            Rvd::Hd => "HD",
            Rvd::Nn => "NN",
            Rvd::Nh => "NH",
            Rvd::Ng => "NG",
        }
    }
}

impl fmt::Display for Rvd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate a site into its RVD codes.
pub fn encode(site: &[u8], guanine: GuanineCode) -> Vec<Rvd> {
    site.iter().map(|&b| Rvd::for_base(b, guanine)).collect()
}

/// Number of strong RVDs in `rvds`.
pub fn count_strong(rvds: &[Rvd]) -> usize {
    rvds.iter().filter(|r| r.is_strong()).count()
}

/// Concatenate RVD codes, e.g. `NGHDNI`.
pub fn to_code_string(rvds: &[Rvd]) -> String {
    rvds.iter().map(|r| r.as_str()).collect()
}
