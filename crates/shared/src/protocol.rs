//! Wire decoding for the posts collection endpoint.

use crate::domain::Post;

/// Decodes a posts collection body. The endpoint returns a bare JSON array;
/// fields beyond the post shape are ignored.
pub fn decode_post_list(body: &[u8]) -> Result<Vec<Post>, serde_json::Error> {
    serde_json::from_slice(body)
}
