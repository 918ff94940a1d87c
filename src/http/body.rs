//! Response body types
//!
//! Every handler returns a boxed body so that in-memory pages and streamed
//! files share one response type.

use futures::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Read size for streamed files
const FILE_CHUNK_SIZE: usize = 64 * 1024;

pub type ResponseBody = BoxBody<Bytes, io::Error>;

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Stream an open file in fixed-size chunks
pub fn from_file(file: File) -> ResponseBody {
    let stream = ReaderStream::with_capacity(file, FILE_CHUNK_SIZE);
    StreamBody::new(stream.map_ok(Frame::data)).boxed()
}
