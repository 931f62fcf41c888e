//! Typed extraction helpers over [`RequestContext`](crate::context::RequestContext).

pub mod path;
