mod content_type;
mod cors;

pub use content_type::json_content_type;
pub use cors::create_permissive_cors_layer;
