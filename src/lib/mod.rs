pub mod google;
pub mod token;
pub mod util;
