pub mod message;
pub mod movement;
pub mod outcome;
pub mod product;

pub use message::*;
pub use movement::*;
pub use outcome::*;
pub use product::*;
