mod builder;
mod date;
mod encoder;
mod error;
mod flatten;
mod impls;
mod mime;
mod multipart;
mod path;
mod ser;
mod store;
mod transport;
mod value;
pub mod with;

/// Mutable tree builders used by encoding sessions.
pub use builder::{ArrayBuilder, ObjectBuilder, TreeBuilder};
/// Date rendering strategies.
pub use date::{DatePattern, DateStrategy};
/// Encoding sessions, containers and entry points.
pub use encoder::{Encodable, EncodeOptions, Encoder, FormEncoder, IndexedContainer, KeyedContainer, SingleValueContainer, encode_value, to_form_data};
/// Error and result aliases.
pub use error::{ContainerKind, FormError, Result};
/// Tree-to-field flattening.
pub use flatten::{FlatField, flatten, write_form};
/// Encodable helper types.
pub use impls::{Blob, Numeric};
/// MIME detection for local files.
pub use mime::{GuessMime, MimeDetector, OCTET_STREAM};
/// Field path types.
pub use path::{FieldPath, PathStep};
/// `serde::Serialize` bridge.
pub use ser::Serde;
/// Ordered multipart field store.
pub use store::{DEFAULT_BLOB_FILENAME, Entries, FieldValue, FormData, FormDataItem, FormValue, Keys, Values, encode_name};
/// Request handoff to an HTTP transport.
pub use transport::{HttpRequest, HttpResponse, Transport};
/// Encoded value tree.
pub use value::{EncodedValue, Member, Scalar};
