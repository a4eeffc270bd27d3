//! # strapi-admin
//!
//! View-model builders for the admin panel. The only resident today is the
//! users list header: a pure function from `(count, add-user callback)` to
//! a declarative props record, rendered elsewhere.

pub mod header;

pub use header::{
    ActionColor, ActionKind, HeaderAction, HeaderProps, HeaderTitle, ListHeaderBuilder,
    MessageFormatter,
};
