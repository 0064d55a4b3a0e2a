mod auth;
mod banner;
mod brand;
mod category;
mod coupon;
mod error;
mod order;
mod product;
mod response;
mod settings;
mod stats;
mod user;

pub use auth::*;
pub use banner::*;
pub use brand::*;
pub use category::*;
pub use coupon::*;
pub use error::*;
pub use order::*;
pub use product::*;
pub use response::*;
pub use settings::*;
pub use stats::*;
pub use user::*;
