//! Encode structured values as `multipart/form-data` request bodies.

/// Value tree encoding, path flattening, and multipart body generation.
pub mod form;
