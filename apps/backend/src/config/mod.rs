pub mod admin_emails;
pub mod server;
