/// Account state for the gvtoken program

pub mod core;
pub mod user;

pub use self::core::*;
pub use self::user::*;
