//! Template registry adapters.

mod handlebars;

pub use self::handlebars::HandlebarsRegistry;
