//! Pipeline stages for PDF-to-DOCX conversion.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable and the two external capabilities (extraction and
//! DOCX writing) can be swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ normalize ──▶ model ──▶ serialize
//! (path/URL) (lopdf)    (lines)      (paras)   (docx-rs)
//! ```
//!
//! 1. [`input`]:     read a local file or download a URL into memory
//! 2. [`extract`]:   raw bytes → text via a [`extract::TextExtractor`];
//!    runs in `spawn_blocking` because parsing is CPU-bound
//! 3. [`normalize`]: line splitting and per-line cleanup
//! 4. [`model`]:     one paragraph per line; pure and total
//! 5. [`serialize`]: paragraphs → `.docx` via a
//!    [`serialize::DocumentSerializer`]

pub mod extract;
pub mod input;
pub mod model;
pub mod normalize;
pub mod serialize;
