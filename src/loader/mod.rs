pub mod registry;
pub mod sample_loader;

pub use registry::{SampleDef, SampleName, GUITAR_SAMPLES};
pub use sample_loader::{DirSource, MemorySource, SampleSource};
