//! document-renderer: turns a frozen invoice snapshot into a single-page PDF.
//!
//! Rendering is a pure function of the snapshot: no timestamps, random ids, or
//! other ambient state enter the document, so two renders of equal snapshots
//! produce byte-identical output. Content that does not fit the fixed A4
//! layout is rejected with [`checkout_core::AppError::PageOverflow`] rather
//! than silently truncated or flowed onto a second page.

mod artifact;
mod layout;
mod render;

pub use artifact::RenderedArtifact;
pub use render::render;
