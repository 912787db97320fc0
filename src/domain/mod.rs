pub mod assumptions;
pub mod irradiance;
pub mod month;

pub use assumptions::*;
pub use irradiance::*;
pub use month::*;
