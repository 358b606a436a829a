use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use log::info;

use crate::command::constants::DEFAULT_KMERS;
use crate::utils::run_tool;

/// Assemble a metagenome from short reads with metaSPAdes.
#[derive(Args)]
pub struct AssembleCMD {
    /// R1 paired-end FASTQ file(s)
    #[arg(long = "r1", num_args = 1.., required = true)]
    pub r1: Vec<PathBuf>,

    /// R2 paired-end FASTQ file(s), same count and order as --r1
    #[arg(long = "r2", num_args = 1.., required = true)]
    pub r2: Vec<PathBuf>,

    /// Single-end FASTQ file(s), typically fastp unpaired output
    #[arg(long = "single", num_args = 1..)]
    pub single: Vec<PathBuf>,

    /// Merged FASTQ file(s) from fastp
    #[arg(long = "merged", num_args = 1..)]
    pub merged: Vec<PathBuf>,

    /// Base output directory for the assembly results
    #[arg(long = "output-dir")]
    pub output_dir: PathBuf,

    /// Unique name for this assembly run
    #[arg(long = "assembly-name")]
    pub assembly_name: String,

    /// Number of threads (CPUs) for SPAdes
    #[arg(long = "threads")]
    pub threads: usize,

    /// Maximum RAM in gigabytes for SPAdes (-m flag)
    #[arg(long = "memory")]
    pub memory: Option<usize>,

    /// Comma-separated k-mer values, odd integers between 20 and 150
    #[arg(long = "kmers", default_value = DEFAULT_KMERS)]
    pub kmers: String,
}

impl AssembleCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        verify_paired_reads(&self.r1, &self.r2)?;

        let kmers = validate_kmers(&self.kmers)?;
        info!("Using k-mers: {}", kmers);

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;
        info!(
            "Assembly {}: SPAdes output will be written to {}",
            self.assembly_name,
            self.output_dir.display()
        );
        if let Some(memory) = self.memory {
            info!("Setting SPAdes memory limit to {} GB", memory);
        }

        run_tool("spades.py", &self.spades_args(&kmers), "SPAdes")
    }

    /// Argument vector for spades.py. Always runs in --meta mode.
    fn spades_args(&self, kmers: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--meta".into()];
        args.push("-o".into());
        args.push(self.output_dir.clone().into());
        args.push("-t".into());
        args.push(self.threads.to_string().into());
        if let Some(memory) = self.memory {
            args.push("-m".into());
            args.push(memory.to_string().into());
        }
        args.push("-k".into());
        args.push(kmers.into());

        //First pair uses -1/-2, subsequent pairs the numbered library flags
        for (i, (r1, r2)) in self.r1.iter().zip(self.r2.iter()).enumerate() {
            if i == 0 {
                args.push("-1".into());
                args.push(r1.clone().into());
                args.push("-2".into());
                args.push(r2.clone().into());
            } else {
                args.push(format!("--pe{}-1", i).into());
                args.push(r1.clone().into());
                args.push(format!("--pe{}-2", i).into());
                args.push(r2.clone().into());
            }
        }

        for s in &self.single {
            args.push("-s".into());
            args.push(s.clone().into());
        }
        for m in &self.merged {
            args.push("--merged".into());
            args.push(m.clone().into());
        }
        args
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

/// Check a comma-separated k-mer list. Every value must be an odd integer
/// no larger than 150. An empty string passes through unchanged.
pub fn validate_kmers(kmer_str: &str) -> Result<String> {
    if kmer_str.is_empty() {
        return Ok(String::new());
    }

    let mut validated: Vec<String> = Vec::new();
    for token in kmer_str.split(',') {
        let token = token.trim();
        let k: i64 = match token.parse() {
            Ok(k) => k,
            Err(_) => bail!("Invalid k-mer value '{}': not an integer", token),
        };
        if k > 150 {
            bail!("Invalid k-mer value '{}': out of the allowed range", k);
        }
        if k % 2 == 0 {
            bail!("Invalid k-mer value '{}': must be an odd number", k);
        }
        validated.push(k.to_string());
    }
    Ok(validated.join(","))
}
