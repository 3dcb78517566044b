mod gtfs;
mod utils;

pub use gtfs::*;
pub use utils::*;
