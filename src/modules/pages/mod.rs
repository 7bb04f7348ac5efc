pub mod controller;
pub mod router;

pub use router::{init_pages_router, init_unwrapped_router};
