pub mod builders;
pub mod resolver;
pub mod selector;
pub mod services;
