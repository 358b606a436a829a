use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use itertools::Itertools;
use log::info;

use crate::command::constants::{
    bowtie2_index_prefix, SAM_SUFFIX, SORTED_BAM_SUFFIX, UNSORTED_BAM_SUFFIX,
};
use crate::utils::run_tool;

/// Map reads against an indexed assembly with bowtie2, then convert, sort
/// and index the alignment with samtools.
#[derive(Args)]
pub struct MapReadsCMD {
    /// Directory holding the bowtie2 index files
    #[arg(long = "index-folder")]
    pub index_folder: PathBuf,

    /// R1 paired-end FASTQ file(s)
    #[arg(long = "r1", num_args = 1.., required = true)]
    pub r1: Vec<PathBuf>,

    /// R2 paired-end FASTQ file(s), same count and order as --r1
    #[arg(long = "r2", num_args = 1.., required = true)]
    pub r2: Vec<PathBuf>,

    /// Single-end FASTQ file(s), typically fastp unpaired output
    #[arg(long = "single", num_args = 1..)]
    pub single: Vec<PathBuf>,

    /// Base output directory for the mapping results
    #[arg(long = "output-dir")]
    pub output_dir: PathBuf,

    /// Name of the assembly the reads are mapped against
    #[arg(long = "assembly-name")]
    pub assembly_name: String,

    /// Name of the metagenome being mapped, used in the output file names
    #[arg(long = "metagenome-name")]
    pub metagenome_name: String,

    /// Number of threads (CPUs) for bowtie2 and samtools sort
    #[arg(long = "threads")]
    pub threads: usize,
}

impl MapReadsCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        verify_paired_reads(&self.r1, &self.r2)?;

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;
        info!(
            "Mapping output will be written to: {}",
            self.output_dir.display()
        );

        run_tool("bowtie2", &self.bowtie2_args(), "Bowtie2")?;

        info!(
            "Converting {} to BAM format at {}",
            self.mapping_path(SAM_SUFFIX).display(),
            self.mapping_path(UNSORTED_BAM_SUFFIX).display()
        );
        run_tool("samtools", &self.samtools_view_args(), "samtools")?;

        info!(
            "Sorting {} to {}",
            self.mapping_path(UNSORTED_BAM_SUFFIX).display(),
            self.mapping_path(SORTED_BAM_SUFFIX).display()
        );
        run_tool("samtools", &self.samtools_sort_args(), "samtools")?;

        info!(
            "Indexing BAM file {}",
            self.mapping_path(SORTED_BAM_SUFFIX).display()
        );
        run_tool("samtools", &self.samtools_index_args(), "samtools")
    }

    /// Output path for one stage of the mapping:
    /// `{output_dir}/{metagenome}_to_{assembly}{suffix}`.
    fn mapping_path(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}_to_{}{}",
            self.metagenome_name, self.assembly_name, suffix
        ))
    }

    /// bowtie2 takes one comma-separated token per read category.
    fn bowtie2_args(&self) -> Vec<OsString> {
        let index_prefix = bowtie2_index_prefix(&self.index_folder, &self.assembly_name);

        let mut args: Vec<OsString> = vec!["-x".into(), index_prefix.into()];
        args.push("-1".into());
        args.push(join_reads(&self.r1));
        args.push("-2".into());
        args.push(join_reads(&self.r2));
        if !self.single.is_empty() {
            args.push("-U".into());
            args.push(join_reads(&self.single));
        }
        args.push("-p".into());
        args.push(self.threads.to_string().into());
        args.push("-S".into());
        args.push(self.mapping_path(SAM_SUFFIX).into());
        args
    }

    fn samtools_view_args(&self) -> Vec<OsString> {
        vec![
            "view".into(),
            "-b".into(),
            self.mapping_path(SAM_SUFFIX).into(),
            "-o".into(),
            self.mapping_path(UNSORTED_BAM_SUFFIX).into(),
        ]
    }

    fn samtools_sort_args(&self) -> Vec<OsString> {
        vec![
            "sort".into(),
            "-@".into(),
            self.threads.to_string().into(),
            self.mapping_path(UNSORTED_BAM_SUFFIX).into(),
            "-o".into(),
            self.mapping_path(SORTED_BAM_SUFFIX).into(),
        ]
    }

    fn samtools_index_args(&self) -> Vec<OsString> {
        vec!["index".into(), self.mapping_path(SORTED_BAM_SUFFIX).into()]
    }
}

fn verify_paired_reads(r1: &[PathBuf], r2: &[PathBuf]) -> Result<()> {
    if r1.is_empty() || r2.is_empty() {
        bail!("Paired-end R1 and R2 reads are mandatory");
    }
    if r1.len() != r2.len() {
        bail!("Number of R1 files must match the number of R2 files");
    }
    Ok(())
}

fn join_reads(files: &[PathBuf]) -> OsString {
    files.iter().map(|p| p.to_string_lossy()).join(",").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd() -> MapReadsCMD {
        MapReadsCMD {
            index_folder: PathBuf::from("/idx"),
            r1: vec![PathBuf::from("a_R1.fq"), PathBuf::from("b_R1.fq")],
            r2: vec![PathBuf::from("a_R2.fq"), PathBuf::from("b_R2.fq")],
            single: Vec::new(),
            output_dir: PathBuf::from("out"),
            assembly_name: "sampleA".to_string(),
            metagenome_name: "mgX".to_string(),
            threads: 8,
        }
    }

    #[test]
    fn test_bowtie2_args_target_index_prefix() {
        let args = cmd().bowtie2_args();
        let pos = args.iter().position(|a| a == "-x").unwrap();
        assert_eq!(args[pos + 1], OsString::from("/idx/sampleA_bowtie2_index"));
    }

    #[test]
    fn test_bowtie2_args_comma_join_read_lists() {
        let args = cmd().bowtie2_args();
        let pos = args.iter().position(|a| a == "-1").unwrap();
        assert_eq!(args[pos + 1], OsString::from("a_R1.fq,b_R1.fq"));
        let pos = args.iter().position(|a| a == "-2").unwrap();
        assert_eq!(args[pos + 1], OsString::from("a_R2.fq,b_R2.fq"));
        assert!(!args.contains(&OsString::from("-U")));
    }

    #[test]
    fn test_bowtie2_args_single_reads_joined_under_one_flag() {
        let mut cmd = cmd();
        cmd.single = vec![PathBuf::from("u1.fq"), PathBuf::from("u2.fq")];
        let args = cmd.bowtie2_args();
        let pos = args.iter().position(|a| a == "-U").unwrap();
        assert_eq!(args[pos + 1], OsString::from("u1.fq,u2.fq"));
    }

    #[test]
    fn test_bowtie2_args_sam_output_name() {
        let args = cmd().bowtie2_args();
        let pos = args.iter().position(|a| a == "-S").unwrap();
        assert_eq!(
            args[pos + 1],
            OsString::from("out/mgX_to_sampleA_bowtie2.sam")
        );
    }

    #[test]
    fn test_samtools_view_args() {
        assert_eq!(
            cmd().samtools_view_args(),
            vec![
                OsString::from("view"),
                OsString::from("-b"),
                OsString::from("out/mgX_to_sampleA_bowtie2.sam"),
                OsString::from("-o"),
                OsString::from("out/mgX_to_sampleA_bowtie2_unsorted.bam"),
            ]
        );
    }

    #[test]
    fn test_samtools_sort_args_carry_thread_count() {
        let args = cmd().samtools_sort_args();
        let pos = args.iter().position(|a| a == "-@").unwrap();
        assert_eq!(args[pos + 1], OsString::from("8"));
        assert_eq!(
            args.last().unwrap(),
            &OsString::from("out/mgX_to_sampleA_bowtie2.bam")
        );
    }

    #[test]
    fn test_samtools_index_args() {
        assert_eq!(
            cmd().samtools_index_args(),
            vec![
                OsString::from("index"),
                OsString::from("out/mgX_to_sampleA_bowtie2.bam"),
            ]
        );
    }

    #[test]
    fn test_paired_reads_mismatch_rejected() {
        let mut cmd = cmd();
        cmd.r2.pop();
        assert!(verify_paired_reads(&cmd.r1, &cmd.r2).is_err());
    }
}
