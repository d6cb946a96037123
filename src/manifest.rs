use std::fmt::Write;

use camino::Utf8Path;
use serde::Serialize;

use crate::config::{ForgeConfig, PackageMeta};
use crate::domain::{ChromosomeId, NamingConvention, RDNA_REPEAT_ID};
use crate::error::ForgeError;
use crate::naming::{NamingMap, translate_all};
use crate::store::SEQ_FILE_SUFFIX;

/// Structured description consumed by the external packaging tool. Derived
/// once per run from configuration and the requested naming convention;
/// never mutated after it is written.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub package: PackageMeta,
    pub seqnames: Vec<String>,
    pub circ_seqs: Vec<String>,
    pub seqs_srcdir: String,
    pub seqfiles_suffix: String,
}

impl Manifest {
    /// Serialize as the DCF-style seed document the packaging tool reads.
    /// The two id lists are literal list expressions.
    pub fn to_seed_document(&self) -> String {
        let mut doc = String::new();
        let mut field = |key: &str, value: &str| {
            let _ = writeln!(doc, "{key}: {value}");
        };

        field("Package", &self.package.name);
        if let Some(title) = &self.package.title {
            field("Title", title);
        }
        field("Version", &self.package.version);
        field("organism", &self.package.organism);
        if let Some(common_name) = &self.package.common_name {
            field("common_name", common_name);
        }
        if let Some(provider) = &self.package.provider {
            field("provider", provider);
        }
        if let Some(provider_version) = &self.package.provider_version {
            field("provider_version", provider_version);
        }
        if let Some(release_date) = &self.package.release_date {
            field("release_date", release_date);
        }
        field("seqnames", &list_expression(&self.seqnames));
        field("circ_seqs", &list_expression(&self.circ_seqs));
        field("seqs_srcdir", &self.seqs_srcdir);
        field("seqfiles_suffix", &self.seqfiles_suffix);
        doc
    }
}

fn list_expression(ids: &[String]) -> String {
    let quoted: Vec<String> = ids.iter().map(|id| format!("\"{id}\"")).collect();
    format!("c({})", quoted.join(", "))
}

pub struct ManifestBuilder;

impl ManifestBuilder {
    /// Translate both id lists into the requested convention, append the rDNA
    /// repeat to each, and copy the package metadata verbatim. Input order is
    /// preserved; it determines the order sequences appear in the package.
    pub fn build(
        config: &ForgeConfig,
        convention: NamingConvention,
        map: Option<&NamingMap>,
        seqs_srcdir: &Utf8Path,
    ) -> Result<Manifest, ForgeError> {
        let mut seqnames = id_strings(translate_all(&config.chromosomes, convention, map)?);
        let mut circ_seqs = id_strings(translate_all(&config.circular, convention, map)?);
        // The rDNA repeat is always present and always circular, and its id is
        // convention-independent.
        seqnames.push(RDNA_REPEAT_ID.to_string());
        circ_seqs.push(RDNA_REPEAT_ID.to_string());

        Ok(Manifest {
            package: config.package.clone(),
            seqnames,
            circ_seqs,
            seqs_srcdir: seqs_srcdir.to_string(),
            seqfiles_suffix: SEQ_FILE_SUFFIX.to_string(),
        })
    }
}

fn id_strings(ids: Vec<ChromosomeId>) -> Vec<String> {
    ids.into_iter().map(|id| id.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;
    use crate::config::{ConfigLoader, RunConfig};

    fn sample_config(chromosomes: &[&str], circular: &[&str]) -> ForgeConfig {
        ConfigLoader::resolve_config(RunConfig {
            package: PackageMeta {
                name: "GenomePkg".to_string(),
                version: "1.0.0".to_string(),
                title: Some("Test genome".to_string()),
                organism: "Homo sapiens".to_string(),
                common_name: None,
                provider: Some("Ensembl".to_string()),
                provider_version: None,
                release_date: None,
            },
            base_url: "https://example.org/dna".to_string(),
            seq_file_pattern: None,
            workdir: None,
            chromosomes: chromosomes.iter().map(|id| id.to_string()).collect(),
            circular: circular.iter().map(|id| id.to_string()).collect(),
        })
        .unwrap()
    }

    #[test]
    fn preserves_order_and_appends_sentinel() {
        let config = sample_config(&["1", "2", "X"], &[]);
        let manifest = ManifestBuilder::build(
            &config,
            NamingConvention::Ensembl,
            None,
            Utf8PathBuf::from("build/seqs").as_path(),
        )
        .unwrap();

        assert_eq!(manifest.seqnames, vec!["1", "2", "X", "U13369.1"]);
        assert_eq!(manifest.circ_seqs, vec!["U13369.1"]);
    }

    #[test]
    fn translates_under_alternate_convention() {
        let config = sample_config(&["1", "MT"], &["MT"]);
        let map = NamingMap::from_entries([("1", "chr1"), ("MT", "chrM")]);
        let manifest = ManifestBuilder::build(
            &config,
            NamingConvention::Ucsc,
            Some(&map),
            Utf8PathBuf::from("build/seqs").as_path(),
        )
        .unwrap();

        assert_eq!(manifest.seqnames, vec!["chr1", "chrM", "U13369.1"]);
        assert_eq!(manifest.circ_seqs, vec!["chrM", "U13369.1"]);
    }

    #[test]
    fn circular_ids_are_a_subset_of_seqnames() {
        let config = sample_config(&["1", "MT"], &["MT"]);
        let manifest = ManifestBuilder::build(
            &config,
            NamingConvention::Ensembl,
            None,
            Utf8PathBuf::from("seqs").as_path(),
        )
        .unwrap();

        for id in &manifest.circ_seqs {
            assert!(manifest.seqnames.contains(id), "{id} missing from seqnames");
        }
    }

    #[test]
    fn seed_document_fields() {
        let config = sample_config(&["1", "MT"], &["MT"]);
        let manifest = ManifestBuilder::build(
            &config,
            NamingConvention::Ensembl,
            None,
            Utf8PathBuf::from("build/seqs").as_path(),
        )
        .unwrap();

        let doc = manifest.to_seed_document();
        assert!(doc.contains("Package: GenomePkg\n"));
        assert!(doc.contains("Title: Test genome\n"));
        assert!(doc.contains("seqnames: c(\"1\", \"MT\", \"U13369.1\")\n"));
        assert!(doc.contains("circ_seqs: c(\"MT\", \"U13369.1\")\n"));
        assert!(doc.contains("seqs_srcdir: build/seqs\n"));
        assert!(doc.contains("seqfiles_suffix: .fa.gz\n"));
        assert!(!doc.contains("release_date"));
    }
}
