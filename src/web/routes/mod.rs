pub mod backdrop_routes;
pub mod capture_routes;
pub mod content_routes;
pub mod results_routes;
pub mod tag_routes;
