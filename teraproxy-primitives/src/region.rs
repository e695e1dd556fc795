//! Service regions.
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A deployment region. Some packet fields
/// only exist on the wire for certain regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    De,
    Eu,
    Fr,
    Jp,
    Kr,
    Na,
    Ru,
    Se,
    Th,
    Tw,
    Uk,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown region {0:?}")]
pub struct UnknownRegion(pub String);

impl Region {
    pub const ALL: [Region; 11] = [
        Region::De,
        Region::Eu,
        Region::Fr,
        Region::Jp,
        Region::Kr,
        Region::Na,
        Region::Ru,
        Region::Se,
        Region::Th,
        Region::Tw,
        Region::Uk,
    ];

    /// The upper-case tag of this region.
    pub const fn tag(&self) -> &'static str {
        match self {
            Region::De => "DE",
            Region::Eu => "EU",
            Region::Fr => "FR",
            Region::Jp => "JP",
            Region::Kr => "KR",
            Region::Na => "NA",
            Region::Ru => "RU",
            Region::Se => "SE",
            Region::Th => "TH",
            Region::Tw => "TW",
            Region::Uk => "UK",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRegion(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Region, UnknownRegion};

    #[test]
    fn parse_tags() {
        assert_eq!("EU".parse::<Region>(), Ok(Region::Eu));
        assert_eq!("kr".parse::<Region>(), Ok(Region::Kr));
        assert_eq!(
            "XX".parse::<Region>(),
            Err(UnknownRegion("XX".to_owned()))
        );
    }

    #[test]
    fn tags_round_trip() {
        for region in Region::ALL {
            assert_eq!(region.to_string().parse::<Region>(), Ok(region));
        }
    }
}
