pub mod portfolio;
pub mod trading;
pub mod wallet;

pub use portfolio::*;
pub use trading::*;
pub use wallet::*;
