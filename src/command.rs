use clap::Subcommand;

// Module declarations (alphabetical)
pub mod assemble;
pub mod constants;
pub mod index;
pub mod mapreads;

pub use assemble::AssembleCMD;
pub use index::IndexCMD;
pub use mapreads::MapReadsCMD;

///////////////////////////////
/// Possible subcommands to parse
#[derive(Subcommand)]
pub enum Commands {
    Assemble(AssembleCMD),
    Index(IndexCMD),
    Mapreads(MapReadsCMD),
}
