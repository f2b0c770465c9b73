//! `rc-media`: photo capture for Rollcall.
//!
//! A capture downloads the raw photo from the chat transport, re-encodes it
//! on the blocking pool, uploads it to the object store and writes the
//! durable link into the registration's photo cell.  The three external
//! collaborators sit behind traits:
//!
//! | Trait           | Production                | Tests                      |
//! |-----------------|---------------------------|----------------------------|
//! | [`BlobSource`]  | [`HttpBlobSource`]        | [`MemoryBlobSource`]       |
//! | [`ObjectStore`] | [`DirObjectStore`]        | [`MemoryObjectStore`]      |
//! | [`ImageCodec`]  | [`PassthroughCodec`]      | [`PassthroughCodec`]       |

pub mod codec;
pub mod memory;
pub mod pipeline;
pub mod source;
pub mod store;

pub use codec::{ImageCodec, PassthroughCodec};
pub use memory::{MemoryBlobSource, MemoryObjectStore};
pub use pipeline::{object_name, CaptureRequest, MediaPipeline};
pub use source::{BlobSource, HttpBlobSource};
pub use store::{DirObjectStore, ObjectStore};
