mod deals;
mod error_shape;
