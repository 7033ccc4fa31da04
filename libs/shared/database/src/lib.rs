pub mod postgrest;

pub use postgrest::PostgrestClient;
