pub mod controller;
pub mod routes;
pub mod schema;

pub use routes::accessory_routes;
pub use schema::AccessoryInfo;
