use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::domain::{ChromosomeId, NamingConvention};
use crate::error::ForgeError;

/// Static table mapping source-convention chromosome ids to their
/// alternate-convention forms (`"1"` -> `"chr1"`, `"MT"` -> `"chrM"`).
///
/// Lookups of unmapped ids fail with `NamingMapMiss` rather than passing the
/// id through unchanged; `check_coverage` lets callers surface the miss before
/// any network traffic.
#[derive(Debug, Clone)]
pub struct NamingMap {
    entries: HashMap<String, String>,
}

impl NamingMap {
    pub fn load(path: &Path) -> Result<Self, ForgeError> {
        let content = fs::read_to_string(path)
            .map_err(|_| ForgeError::NamingMapRead(path.to_path_buf()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|err| ForgeError::NamingMapParse(err.to_string()))?;
        for (source, alternate) in &entries {
            if source.trim().is_empty() || alternate.trim().is_empty() {
                return Err(ForgeError::NamingMapParse(format!(
                    "empty entry: {source:?} -> {alternate:?}"
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(source, alternate)| (source.into(), alternate.into()))
                .collect(),
        }
    }

    pub fn alternate(&self, id: &ChromosomeId) -> Result<&str, ForgeError> {
        self.entries
            .get(id.as_str())
            .map(String::as_str)
            .ok_or_else(|| ForgeError::NamingMapMiss(id.to_string()))
    }

    pub fn check_coverage<'a, I>(&self, ids: I) -> Result<(), ForgeError>
    where
        I: IntoIterator<Item = &'a ChromosomeId>,
    {
        for id in ids {
            self.alternate(id)?;
        }
        Ok(())
    }
}

/// Translate one id into the requested convention. The source convention is
/// the identity; the alternate convention goes through the map.
pub fn translate(
    id: &ChromosomeId,
    convention: NamingConvention,
    map: Option<&NamingMap>,
) -> Result<ChromosomeId, ForgeError> {
    if !convention.is_alternate() {
        return Ok(id.clone());
    }
    let map = map.ok_or_else(|| {
        ForgeError::ConfigInvalid("naming map required for ucsc naming".to_string())
    })?;
    map.alternate(id)?.parse()
}

pub fn translate_all(
    ids: &[ChromosomeId],
    convention: NamingConvention,
    map: Option<&NamingMap>,
) -> Result<Vec<ChromosomeId>, ForgeError> {
    ids.iter()
        .map(|id| translate(id, convention, map))
        .collect()
}

/// Substitute the leading chromosome token of a FASTA header, preserving any
/// description text. The token must end at whitespace or end-of-header so a
/// map entry for `1` never rewrites a header for `11`.
pub fn rename_header(header: &str, source: &str, alternate: &str) -> String {
    let pattern = Regex::new(&format!(r"^{}($|\s)", regex::escape(source))).unwrap();
    pattern
        .replace(header, format!("{alternate}${{1}}"))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample_map() -> NamingMap {
        NamingMap::from_entries([("1", "chr1"), ("MT", "chrM")])
    }

    #[test]
    fn translate_is_identity_for_source_convention() {
        let id: ChromosomeId = "MT".parse().unwrap();
        let translated = translate(&id, NamingConvention::Ensembl, None).unwrap();
        assert_eq!(translated, id);
    }

    #[test]
    fn translate_maps_alternate_convention() {
        let map = sample_map();
        let id: ChromosomeId = "MT".parse().unwrap();
        let translated = translate(&id, NamingConvention::Ucsc, Some(&map)).unwrap();
        assert_eq!(translated.as_str(), "chrM");
    }

    #[test]
    fn unmapped_id_fails_loudly() {
        let map = sample_map();
        let id: ChromosomeId = "X".parse().unwrap();
        let err = translate(&id, NamingConvention::Ucsc, Some(&map)).unwrap_err();
        assert_matches!(err, ForgeError::NamingMapMiss(_));

        let err = map.check_coverage([&id]).unwrap_err();
        assert_matches!(err, ForgeError::NamingMapMiss(_));
    }

    #[test]
    fn rename_header_preserves_description() {
        assert_eq!(
            rename_header("1 dna:chromosome chromosome:GRCh38:1", "1", "chr1"),
            "chr1 dna:chromosome chromosome:GRCh38:1"
        );
        assert_eq!(rename_header("MT", "MT", "chrM"), "chrM");
    }

    #[test]
    fn rename_header_respects_token_boundary() {
        assert_eq!(rename_header("11 dna:chromosome", "1", "chr1"), "11 dna:chromosome");
        assert_eq!(rename_header("2 dna", "1", "chr1"), "2 dna");
    }

    #[test]
    fn rename_header_escapes_regex_metacharacters() {
        assert_eq!(
            rename_header("U13369.1 rDNA repeat", "U13369.1", "U13369.1"),
            "U13369.1 rDNA repeat"
        );
        // The dot must not match an arbitrary character.
        assert_eq!(rename_header("U13369x1", "U13369.1", "chrR"), "U13369x1");
    }
}
