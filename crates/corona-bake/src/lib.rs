//! The bake pipeline: stage scheduling and artifact assembly.
//!
//! This crate decides *what* gets computed and *where* it lands; the
//! numeric work itself is behind [`corona_ibl::Kernels`]. A run is
//! described by a [`BakeConfig`] and proceeds through up to five
//! stages: SH decomposition, the raw mip dump, the roughness
//! prefilter, the DFG lookup table, and plain face extraction.

mod config;
mod dfg;
mod error;
mod extract;
mod mip_chain;
mod roughness;
mod sh_stage;
#[cfg(test)]
mod testing;
mod writer;

pub use config::{
    BakeConfig, DEFAULT_PREFILTER_SIZE, DfgConfig, ExtractConfig, ShConfig, ShSink,
};
pub use dfg::bake_dfg;
pub use error::BakeError;
pub use extract::extract_faces;
pub use mip_chain::{build_mip_chain, dump_mip_chain};
pub use roughness::{RoughnessLevel, prefilter, roughness_schedule};
pub use sh_stage::bake_sh;
pub use writer::base_name;
