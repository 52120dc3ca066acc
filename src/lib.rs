pub mod engine;
pub mod example;
pub mod feed;
pub mod list_nodes;
pub mod model;
pub mod run;
pub mod schema;
pub mod validate;
pub mod visualize;
