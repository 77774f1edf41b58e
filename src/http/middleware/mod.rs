//! HTTP middleware.

pub mod layer;

pub use layer::{
    middleware, patch_headers, patch_headers_middleware, PatchHeaders, PatchHeadersLayer,
};
