pub mod gann;
pub mod indicators;
pub mod stage;
pub mod volume;


pub use gann::*;
pub use indicators::*;
pub use stage::*;
pub use volume::*;
