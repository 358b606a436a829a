use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use crate::command::constants::bowtie2_index_prefix;
use crate::utils::run_tool;

/// Build a bowtie2 index over a metagenome assembly.
#[derive(Args)]
pub struct IndexCMD {
    /// Assembly FASTA file to index
    #[arg(long = "input-assembly")]
    pub input_assembly: PathBuf,

    /// Name for the index files, usually the assembly name
    #[arg(long = "output-name")]
    pub output_name: String,

    /// Output directory for the index files
    #[arg(long = "output-dir")]
    pub output_dir: PathBuf,
}

impl IndexCMD {
    pub fn try_execute(&mut self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;
        info!(
            "Index output will be written to: {}",
            self.output_dir.display()
        );

        run_tool("bowtie2-build", &self.bowtie2_build_args(), "bowtie2")
    }

    /// bowtie2-build takes the assembly and the index prefix as positionals.
    fn bowtie2_build_args(&self) -> Vec<OsString> {
        let index_prefix = bowtie2_index_prefix(&self.output_dir, &self.output_name);
        vec![self.input_assembly.clone().into(), index_prefix.into()]
    }
}
