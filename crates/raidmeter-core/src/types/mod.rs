mod entry;
mod id;
mod name;
mod sample;
mod timestamp;

pub use entry::*;
pub use id::*;
pub use name::*;
pub use sample::*;
pub use timestamp::*;
