pub mod principal;
pub mod validated_json;

pub use principal::Authorized;
pub use validated_json::ValidatedJson;
