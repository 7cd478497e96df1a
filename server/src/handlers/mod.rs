pub mod newsletter_handlers;
