use std::path::{Path, PathBuf};

pub const DEFAULT_KMERS: &str = "21,33,55,77,99,127";

pub const BOWTIE2_INDEX_SUFFIX: &str = "_bowtie2_index";

pub const SAM_SUFFIX: &str = "_bowtie2.sam";
pub const UNSORTED_BAM_SUFFIX: &str = "_bowtie2_unsorted.bam";
pub const SORTED_BAM_SUFFIX: &str = "_bowtie2.bam";

/// Index prefix written by `index` and read by `mapreads`:
/// `{dir}/{name}_bowtie2_index`. bowtie2-build appends its own
/// extensions to this prefix.
pub fn bowtie2_index_prefix(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}{}", name, BOWTIE2_INDEX_SUFFIX))
}
