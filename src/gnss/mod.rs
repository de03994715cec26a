pub mod coords;
pub mod fix;
pub mod sentence;
