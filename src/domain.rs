use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ForgeError;

// Human ribosomal DNA repeat unit; always part of the package and always circular.
pub const RDNA_REPEAT_ID: &str = "U13369.1";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChromosomeId(String);

impl ChromosomeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChromosomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChromosomeId {
    type Err = ForgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let is_valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'));
        if !is_valid {
            return Err(ForgeError::InvalidChromosomeId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NamingConvention {
    Ensembl,
    Ucsc,
}

impl NamingConvention {
    pub fn is_alternate(self) -> bool {
        matches!(self, NamingConvention::Ucsc)
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingConvention::Ensembl => write!(f, "ensembl"),
            NamingConvention::Ucsc => write!(f, "ucsc"),
        }
    }
}

impl FromStr for NamingConvention {
    type Err = ForgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ensembl" => Ok(NamingConvention::Ensembl),
            "ucsc" => Ok(NamingConvention::Ucsc),
            _ => Err(ForgeError::InvalidNamingConvention(value.to_string())),
        }
    }
}

pub fn should_act(force: bool, artifact_exists: bool) -> bool {
    force || !artifact_exists
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_chromosome_id_valid() {
        let id: ChromosomeId = " MT ".parse().unwrap();
        assert_eq!(id.as_str(), "MT");

        let rdna: ChromosomeId = RDNA_REPEAT_ID.parse().unwrap();
        assert_eq!(rdna.as_str(), "U13369.1");
    }

    #[test]
    fn parse_chromosome_id_invalid() {
        let err = "".parse::<ChromosomeId>().unwrap_err();
        assert_matches!(err, ForgeError::InvalidChromosomeId(_));

        let err = "chr 1".parse::<ChromosomeId>().unwrap_err();
        assert_matches!(err, ForgeError::InvalidChromosomeId(_));

        let err = "a/b".parse::<ChromosomeId>().unwrap_err();
        assert_matches!(err, ForgeError::InvalidChromosomeId(_));
    }

    #[test]
    fn parse_naming_convention() {
        assert_eq!(
            "UCSC".parse::<NamingConvention>().unwrap(),
            NamingConvention::Ucsc
        );
        assert_eq!(
            "ensembl".parse::<NamingConvention>().unwrap(),
            NamingConvention::Ensembl
        );
        let err = "ncbi".parse::<NamingConvention>().unwrap_err();
        assert_matches!(err, ForgeError::InvalidNamingConvention(_));
    }

    #[test]
    fn alternate_convention() {
        assert!(NamingConvention::Ucsc.is_alternate());
        assert!(!NamingConvention::Ensembl.is_alternate());
    }

    #[test]
    fn should_act_truth_table() {
        assert!(should_act(false, false));
        assert!(should_act(true, false));
        assert!(should_act(true, true));
        assert!(!should_act(false, true));
    }
}
