mod quote;

pub use quote::{Artifact, Mode};
