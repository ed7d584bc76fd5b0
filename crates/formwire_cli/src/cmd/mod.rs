/// JSON documents as encodable values.
pub mod document;
/// Multipart body encoding command.
pub mod encode;
/// Flattened field listing command.
pub mod fields;
/// Directory MIME listing command.
pub mod mime;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod util;
