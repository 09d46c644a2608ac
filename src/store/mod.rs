pub mod duck;
pub mod record;
