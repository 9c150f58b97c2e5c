pub mod verdict;
pub mod run;
pub mod summary;

pub use verdict::*;
pub use run::*;
pub use summary::*;
