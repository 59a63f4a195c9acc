pub mod extract;
pub mod handler;
pub mod lang;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use extract::ValidJson;
pub use lang::Lang;
pub use response::make_response;
pub use routes::with_error_handling;
pub use state::ErrorState;
