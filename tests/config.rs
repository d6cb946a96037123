use std::fs;
use std::path::Path;

use assert_matches::assert_matches;

use seqforge::config::ConfigLoader;
use seqforge::domain::ChromosomeId;
use seqforge::error::ForgeError;

const SAMPLE: &str = r#"{
  "package": {
    "name": "GenomePkg.Hsapiens.Ensembl.GRCh38",
    "version": "1.0.0",
    "title": "Full genome sequences for Homo sapiens",
    "organism": "Homo sapiens",
    "provider": "Ensembl",
    "provider_version": "GRCh38"
  },
  "base_url": "https://ftp.example.org/fasta/homo_sapiens/dna",
  "seq_file_pattern": "Homo_sapiens.GRCh38.dna.chromosome.{id}.fa.gz",
  "workdir": "build",
  "chromosomes": ["1", "2", "X", "MT"],
  "circular": ["MT"]
}"#;

#[test]
fn loads_run_config_from_disk() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("run.json");
    fs::write(&path, SAMPLE).unwrap();

    let config = ConfigLoader::resolve(&path).unwrap();
    assert_eq!(config.package.name, "GenomePkg.Hsapiens.Ensembl.GRCh38");
    assert_eq!(config.workdir, "build");
    assert_eq!(config.chromosomes.len(), 4);
    assert_eq!(config.circular.len(), 1);

    let id: ChromosomeId = "MT".parse().unwrap();
    assert_eq!(
        config.sequence_url(&id),
        "https://ftp.example.org/fasta/homo_sapiens/dna/Homo_sapiens.GRCh38.dna.chromosome.MT.fa.gz"
    );
}

#[test]
fn missing_config_file_fails() {
    let err = ConfigLoader::resolve(Path::new("/nonexistent/run.json")).unwrap_err();
    assert_matches!(err, ForgeError::ConfigRead(_));
}

#[test]
fn malformed_config_fails() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("run.json");
    fs::write(&path, "{not json").unwrap();

    let err = ConfigLoader::resolve(&path).unwrap_err();
    assert_matches!(err, ForgeError::ConfigParse(_));
}

#[test]
fn invalid_chromosome_id_fails() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("run.json");
    fs::write(&path, SAMPLE.replace("\"X\"", "\"chr X\"")).unwrap();

    let err = ConfigLoader::resolve(&path).unwrap_err();
    assert_matches!(err, ForgeError::InvalidChromosomeId(_));
}
